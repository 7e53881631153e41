//! A resolved call target, unifying top-level functions and lambdas for the
//! dispatch logic in `call.rs`.

use crate::exceptions::{BrewException, RunResult};
use crate::function::FunctionId;
use crate::heap::ObjectId;
use crate::value::Value;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Callable {
    Func(FunctionId),
    Lambda(ObjectId),
}

impl Callable {
    /// Resolves a `Value` being invoked — through a variable holding a
    /// `Func`/`Lambda`, or a method looked up on an object — into something
    /// `call.rs` can dispatch on. Anything else is a `TypeError`.
    pub fn from_value(value: &Value, what: &str) -> RunResult<Self> {
        match value {
            Value::Func(id) => Ok(Callable::Func(*id)),
            Value::Lambda(id) => Ok(Callable::Lambda(*id)),
            other => Err(BrewException::type_error(format!(
                "{what} is not callable (found {})",
                other.type_name()
            ))),
        }
    }
}
