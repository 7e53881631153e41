//! Operator semantics and the Int/Bool coercion table.

use crate::ast::{BinOp, BoolOp, CmpOp, EqOp};
use crate::exceptions::{BrewException, RunResult};
use crate::value::Value;

fn int_as_bool(n: i64) -> bool {
    n != 0
}

/// `==`/`!=` value equality: `Int` and `Bool` compare equal
/// across types via the nonzero coercion, `Str` compares by content,
/// `Func`/`Lambda`/`Object` compare by handle identity, and mismatched
/// other pairs are simply unequal rather than a type error.
pub(crate) fn values_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Bool(x), Value::Int(y)) | (Value::Int(y), Value::Bool(x)) => *x == int_as_bool(*y),
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Func(x), Value::Func(y)) => x == y,
        (Value::Lambda(x), Value::Lambda(y)) => x == y,
        (Value::Object(x), Value::Object(y)) => x == y,
        _ => false,
    }
}

pub(crate) fn equality(op: EqOp, left: &Value, right: &Value) -> Value {
    let eq = values_eq(left, right);
    Value::Bool(match op {
        EqOp::Eq => eq,
        EqOp::Ne => !eq,
    })
}

/// Unary `!`: `Bool`/`Int` via truthiness coercion.
pub(crate) fn logical_not(v: &Value) -> RunResult<Value> {
    match v {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        Value::Int(n) => Ok(Value::Bool(!int_as_bool(*n))),
        other => Err(incompatible_unary(other)),
    }
}

/// Unary `neg`: `Int` only — `Bool` is explicitly excluded even
/// though it would coerce for other operators.
pub(crate) fn negate(v: &Value) -> RunResult<Value> {
    match v {
        Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
        other => Err(incompatible_unary(other)),
    }
}

fn incompatible_unary(v: &Value) -> BrewException {
    BrewException::type_error(format!("Incompatible type for unary operation: {}", v.type_name()))
}

/// `+ - * /`. `+` also concatenates `Str + Str`. Overflow wraps rather than
/// panicking, since integer width is left up to the host.
pub(crate) fn arithmetic(op: BinOp, left: &Value, right: &Value) -> RunResult<Value> {
    match (op, left, right) {
        (BinOp::Add, Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
        (BinOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}").into())),
        (BinOp::Sub, Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(*b))),
        (BinOp::Mul, Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
        (BinOp::Div, Value::Int(a), Value::Int(b)) => floor_div(*a, *b).map(Value::Int),
        _ => Err(incompatible_binary(left, right)),
    }
}

/// Floor division, rounding toward negative infinity rather than Rust's
/// default truncation toward zero, matching Python's `//` convention.
fn floor_div(a: i64, b: i64) -> RunResult<i64> {
    if b == 0 {
        return Err(BrewException::type_error("division by zero"));
    }
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// `< <= > >=`: `Int` only.
pub(crate) fn compare(op: CmpOp, left: &Value, right: &Value) -> RunResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Bool(match op {
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
        })),
        _ => Err(incompatible_binary(left, right)),
    }
}

/// `&& ||`: both operands are coerced and evaluated eagerly —
/// there is no short-circuiting, unlike most host languages.
pub(crate) fn boolean(op: BoolOp, left: &Value, right: &Value) -> RunResult<Value> {
    let l = coerce_bool(left)?;
    let r = coerce_bool(right)?;
    Ok(Value::Bool(match op {
        BoolOp::And => l && r,
        BoolOp::Or => l || r,
    }))
}

fn coerce_bool(v: &Value) -> RunResult<bool> {
    v.as_coerced_bool()
        .ok_or_else(|| BrewException::type_error(format!("Incompatible type for boolean operation: {}", v.type_name())))
}

fn incompatible_binary(left: &Value, right: &Value) -> BrewException {
    BrewException::type_error(format!(
        "Incompatible types for operation: {} and {}",
        left.type_name(),
        right.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_bool_equality_coerces() {
        assert!(values_eq(&Value::Int(1), &Value::Bool(true)));
        assert!(values_eq(&Value::Int(0), &Value::Bool(false)));
        assert!(!values_eq(&Value::Int(2), &Value::Bool(true)));
    }

    #[test]
    fn floor_division_rounds_toward_negative_infinity() {
        assert_eq!(floor_div(-7, 2).unwrap(), -4);
        assert_eq!(floor_div(7, 2).unwrap(), 3);
        assert_eq!(floor_div(-7, -2).unwrap(), 3);
    }

    #[test]
    fn boolean_operators_are_eager() {
        // both sides must type-check even though `false && <bad>` would
        // short-circuit in most languages.
        let err = boolean(BoolOp::And, &Value::Bool(false), &Value::Str("x".into())).unwrap_err();
        assert_eq!(err.kind(), crate::exceptions::ExcType::TypeError);
    }
}
