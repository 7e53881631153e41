//! Expression evaluation.

use std::rc::Rc;

use ahash::AHashMap;

use crate::ast::{Expr, FunctionDef, Literal, UnaryOp};
use crate::exceptions::{BrewException, RunResult};
use crate::lambda::LambdaRecord;
use crate::object::ObjectRecord;
use crate::operators;
use crate::run::Interpreter;
use crate::value::Value;

pub(crate) fn eval_expr(interp: &mut Interpreter<'_>, expr: &Expr) -> RunResult<Value> {
    match expr {
        Expr::Literal(lit) => Ok(literal_value(lit)),
        Expr::Var(name) => eval_name(interp, name),
        Expr::Unary { op, operand } => {
            let v = eval_expr(interp, operand)?;
            match op {
                UnaryOp::Not => operators::logical_not(&v),
                UnaryOp::Neg => operators::negate(&v),
            }
        }
        Expr::Binary { op, left, right } => {
            let l = eval_expr(interp, left)?;
            let r = eval_expr(interp, right)?;
            operators::arithmetic(*op, &l, &r)
        }
        Expr::Compare { op, left, right } => {
            let l = eval_expr(interp, left)?;
            let r = eval_expr(interp, right)?;
            operators::compare(*op, &l, &r)
        }
        Expr::Equality { op, left, right } => {
            let l = eval_expr(interp, left)?;
            let r = eval_expr(interp, right)?;
            Ok(operators::equality(*op, &l, &r))
        }
        Expr::Bool { op, left, right } => {
            let l = eval_expr(interp, left)?;
            let r = eval_expr(interp, right)?;
            operators::boolean(*op, &l, &r)
        }
        Expr::Call { name, args } => crate::call::eval_call(interp, name, args),
        Expr::MethodCall { object, method, args } => crate::call::eval_method_call(interp, object, method, args),
        Expr::Lambda(def) => eval_lambda(interp, def),
        Expr::NewObject => {
            log::trace!("allocating a new object");
            Ok(Value::Object(interp.heap.alloc_object(ObjectRecord::new())))
        }
    }
}

pub(crate) fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Int(n) => Value::Int(*n),
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Nil => Value::Nil,
    }
}

/// Reads the value denoted by `name`: a plain local, `this`, the sole arity
/// of an overloaded function used as a value, or a `base.field` path, which
/// recurses on the part before the first `.`.
pub(crate) fn eval_name(interp: &Interpreter<'_>, name: &str) -> RunResult<Value> {
    match name.split_once('.') {
        Some((base, field)) => {
            let base_val = eval_name(interp, base)?;
            match base_val {
                Value::Object(id) => ObjectRecord::get_field(id, field, &interp.heap),
                other => Err(BrewException::type_error(format!(
                    "{base} is not an object (found {})",
                    other.type_name()
                ))),
            }
        }
        None => {
            if interp.env.contains(name) {
                interp.env.read(name)
            } else {
                match interp.functions.resolve_as_value(name)? {
                    Some(func_id) => Ok(Value::Func(func_id)),
                    None => Err(BrewException::name_error(format!("Variable {name} has not been defined"))),
                }
            }
        }
    }
}

/// Writes `value` to the binding/path denoted by `target`: a
/// plain local write creates the binding if absent, a `base.field` path
/// always writes through the base object's own fields, and a bare `this`
/// only rebinds the receiver inside an active method call.
pub(crate) fn assign_name(interp: &mut Interpreter<'_>, target: &str, value: Value) -> RunResult<()> {
    match target.split_once('.') {
        Some((base, field)) => {
            let base_val = eval_name(interp, base)?;
            match base_val {
                Value::Object(id) => ObjectRecord::assign_field(id, field, value, &mut interp.heap),
                other => Err(BrewException::type_error(format!(
                    "{base} is not an object (found {})",
                    other.type_name()
                ))),
            }
        }
        None if target == "this" => {
            if interp.env.contains("this") {
                interp.env.write("this", value);
                Ok(())
            } else {
                Err(BrewException::name_error("this has no receiver outside a method call"))
            }
        }
        None => {
            interp.env.write(target, value);
            Ok(())
        }
    }
}

/// Builds a fresh lambda, capturing a snapshot of every name currently
/// visible in scope. The snapshot shares rather than
/// deep-copies any `Object`/`Lambda` handle it captures — only the
/// container is new, not the heap entities it points at.
fn eval_lambda(interp: &mut Interpreter<'_>, def: &Rc<FunctionDef>) -> RunResult<Value> {
    let closure: AHashMap<Rc<str>, Value> = interp.env.visible_bindings();
    let id = interp.heap.alloc_lambda(LambdaRecord { def: def.clone(), closure });
    Ok(Value::Lambda(id))
}
