//! Top-level function definitions and arity-overload resolution.

use std::rc::Rc;

use ahash::AHashMap;

use crate::ast::FunctionDef;
use crate::exceptions::{BrewException, RunResult};

/// A handle to one arity of a named function. Distinct names, or the same
/// name at distinct arities, get distinct ids — overload resolution never
/// has to re-walk the source, just this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(u32);

/// All top-level function definitions a program declares, indexed for the
/// two lookups the evaluator needs: "call `name` with this many args" and
/// "what does the bare name `name` denote as a value".
#[derive(Debug, Default)]
pub(crate) struct FunctionTable {
    defs: Vec<Rc<FunctionDef>>,
    by_name_arity: AHashMap<Rc<str>, AHashMap<usize, FunctionId>>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: Rc<FunctionDef>) {
        let id = FunctionId(self.defs.len() as u32);
        let name = def.name.clone();
        let arity = def.params.len();
        self.defs.push(def);
        self.by_name_arity.entry(name).or_default().insert(arity, id);
    }

    pub fn get(&self, id: FunctionId) -> &Rc<FunctionDef> {
        &self.defs[id.0 as usize]
    }

    /// Looks up the program's entry point: `main` taking zero arguments.
    pub fn main(&self) -> RunResult<FunctionId> {
        self.by_name_arity
            .get("main")
            .and_then(|arities| arities.get(&0))
            .copied()
            .ok_or_else(|| BrewException::name_error("No main() function was found"))
    }

    /// Direct call-site resolution by name and argument count. `Ok(None)`
    /// means no such name exists at all; `Err` means the name exists at some
    /// arity, just not this one — a direct call site must raise `NameError`
    /// on that rather than falling through to a same-named variable.
    pub fn resolve_call(&self, name: &str, arity: usize) -> RunResult<Option<FunctionId>> {
        match self.by_name_arity.get(name) {
            None => Ok(None),
            Some(arities) => arities.get(&arity).copied().map(Some).ok_or_else(|| {
                BrewException::name_error(format!("{name} is not defined with {arity} argument(s)"))
            }),
        }
    }

    /// Resolves a bare name used where a value is expected — as a variable
    /// read, a ref-arg actual, or a call through a variable. Only legal when
    /// the name denotes exactly one
    /// arity; more than one is a `NameError`, none at all is `Ok(None)` so
    /// the caller can fall through to its own "not defined" error.
    pub fn resolve_as_value(&self, name: &str) -> RunResult<Option<FunctionId>> {
        match self.by_name_arity.get(name) {
            None => Ok(None),
            Some(arities) if arities.len() == 1 => Ok(arities.values().next().copied()),
            Some(_) => Err(BrewException::name_error(format!(
                "{name} is overloaded and cannot be used as a variable"
            ))),
        }
    }
}
