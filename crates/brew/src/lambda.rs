//! Lambda instances.

use std::rc::Rc;

use ahash::AHashMap;

use crate::ast::{FunctionDef, Param};
use crate::value::Value;

/// A single evaluation of a `lambda` expression. Each evaluation allocates a
/// fresh `LambdaRecord`, even for the same source `lambda` literal reached
/// twice (e.g. in a loop) — closure capture happens at construction, not
/// once per definition.
#[derive(Debug, Clone)]
pub(crate) struct LambdaRecord {
    pub def: Rc<FunctionDef>,
    /// Snapshot of every name visible in the enclosing scope at the moment
    /// this lambda was built. Scalars are copied in, `Object`/`Lambda`
    /// values keep their heap handle so the closure shares, rather than
    /// clones, the entity they pointed to.
    pub closure: AHashMap<Rc<str>, Value>,
}

impl LambdaRecord {
    pub fn params(&self) -> &[Param] {
        &self.def.params
    }
}
