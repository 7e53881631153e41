//! Name -> stack-of-bindings store backing a single activation's local
//! scope.
//!
//! A binding is either a direct value slot or a reference that indirects to
//! another name's slot. References never chain: `bind_reference` resolves
//! through any existing indirection at creation time, so reading or writing
//! through a reference is always exactly one extra hop.

use std::rc::Rc;

use ahash::AHashMap;

use crate::exceptions::{BrewException, RunResult};
use crate::value::Value;

#[derive(Debug, Clone)]
enum Binding {
    Direct(Value),
    Ref { target: Rc<str>, index: usize },
}

/// Every name present maps to a non-empty stack; a name whose stack has
/// been popped to empty is removed outright.
#[derive(Debug, Default)]
pub(crate) struct Environment {
    vars: AHashMap<Rc<str>, Vec<Binding>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.get(name).is_some_and(|s| !s.is_empty())
    }

    /// Resolves `name` to its underlying (name, index) slot, following a
    /// reference if the current top binding is one.
    fn resolve(&self, name: &str) -> RunResult<(Rc<str>, usize)> {
        let stack = self
            .vars
            .get(name)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BrewException::name_error(format!("Variable {name} has not been defined")))?;
        match stack.last().expect("checked non-empty above") {
            Binding::Ref { target, index } => Ok((target.clone(), *index)),
            Binding::Direct(_) => {
                let (key, _) = self.vars.get_key_value(name).expect("just looked up");
                Ok((key.clone(), stack.len() - 1))
            }
        }
    }

    pub fn read(&self, name: &str) -> RunResult<Value> {
        let (target, index) = self.resolve(name)?;
        match &self.vars[&target][index] {
            Binding::Direct(value) => Ok(value.clone()),
            Binding::Ref { .. } => unreachable!("references never chain"),
        }
    }

    /// Writes `name`: through a reference if bound as one, otherwise
    /// replacing the current top of its own stack. If `name` has no current
    /// binding at all, this creates a fresh one.
    pub fn write(&mut self, name: &str, value: Value) {
        let existing_top = self.vars.get(name).and_then(|s| s.last()).cloned();
        match existing_top {
            Some(Binding::Ref { target, index }) => {
                let slot = self
                    .vars
                    .get_mut(&target)
                    .expect("reference target must still exist")
                    .get_mut(index)
                    .expect("reference index must be in bounds");
                *slot = Binding::Direct(value);
            }
            Some(Binding::Direct(_)) => {
                let stack = self.vars.get_mut(name).expect("checked above");
                *stack.last_mut().expect("checked above") = Binding::Direct(value);
            }
            None => self.push_direct(name, value),
        }
    }

    /// Pushes a brand-new direct binding for `name`, shadowing any existing
    /// one. Used for parameter binding and `if`/`while` locals.
    pub fn push_direct(&mut self, name: &str, value: Value) {
        self.vars.entry(Rc::from(name)).or_default().push(Binding::Direct(value));
    }

    /// Binds `name` as a reference to `referenced_name`'s current slot,
    /// materializing through any existing indirection so references never
    /// chain.
    pub fn bind_reference(&mut self, name: &str, referenced_name: &str) -> RunResult<()> {
        let (target, index) = self.resolve(referenced_name)?;
        self.vars.entry(Rc::from(name)).or_default().push(Binding::Ref { target, index });
        Ok(())
    }

    /// Pops the most recent binding for `name`, used when a scope that
    /// introduced it exits.
    pub fn pop(&mut self, name: &str) {
        if let Some(stack) = self.vars.get_mut(name) {
            stack.pop();
            if stack.is_empty() {
                self.vars.remove(name);
            }
        }
    }

    /// Snapshots every currently-visible name to its current value — the
    /// closure capture used when a `lambda` expression is evaluated (spec
    /// §4.6.4).
    pub fn visible_bindings(&self) -> AHashMap<Rc<str>, Value> {
        self.vars
            .keys()
            .map(|name| {
                let value = self.read(name).expect("a key present in vars is always readable");
                (name.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let mut env = Environment::new();
        env.push_direct("x", Value::Int(1));
        env.write("x", Value::Int(2));
        assert!(matches!(env.read("x").unwrap(), Value::Int(2)));
    }

    #[test]
    fn reference_writes_through_to_target() {
        let mut env = Environment::new();
        env.push_direct("x", Value::Int(1));
        env.bind_reference("y", "x").unwrap();
        env.write("y", Value::Int(42));
        assert!(matches!(env.read("x").unwrap(), Value::Int(42)));
    }

    #[test]
    fn reference_to_reference_does_not_chain() {
        let mut env = Environment::new();
        env.push_direct("x", Value::Int(1));
        env.bind_reference("y", "x").unwrap();
        env.bind_reference("z", "y").unwrap();
        env.write("z", Value::Int(7));
        assert!(matches!(env.read("x").unwrap(), Value::Int(7)));
        assert!(matches!(env.read("y").unwrap(), Value::Int(7)));
    }

    #[test]
    fn shadowing_push_then_pop_restores_outer() {
        let mut env = Environment::new();
        env.push_direct("x", Value::Int(1));
        env.push_direct("x", Value::Int(2));
        assert!(matches!(env.read("x").unwrap(), Value::Int(2)));
        env.pop("x");
        assert!(matches!(env.read("x").unwrap(), Value::Int(1)));
    }

    #[test]
    fn undefined_variable_is_name_error() {
        let env = Environment::new();
        let err = env.read("missing").unwrap_err();
        assert_eq!(err.kind(), crate::exceptions::ExcType::NameError);
    }
}
