//! Call dispatch: builtins, direct calls, calls through a variable, method
//! calls, and argument binding.

use std::rc::Rc;

use ahash::AHashSet;

use crate::ast::{Expr, Literal, Param, ParamKind};
use crate::callable::Callable;
use crate::exceptions::{BrewException, RunResult};
use crate::expr::{eval_expr, eval_name, literal_value};
use crate::function::FunctionId;
use crate::heap::ObjectId;
use crate::object::ObjectRecord;
use crate::run::Interpreter;
use crate::stmt::{exec_block_plain, Flow};
use crate::value::Value;

/// Distinguishes the call site an `invoke_function` arity mismatch is
/// raised from, since `interpreterv4.py` reports a different error kind for
/// each: a direct call or a call through a variable holding a `Func` value
/// is a `TypeError`, but a method lookup that resolves to a `Function` at
/// the wrong arity is a `NameError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallContext {
    Direct,
    Variable,
    Method,
}

pub(crate) fn eval_call(interp: &mut Interpreter<'_>, name: &str, args: &[Expr]) -> RunResult<Value> {
    if let Some(result) = call_builtin(interp, name, args) {
        return result;
    }
    // `resolve_call` itself raises `NameError` when `name` is a known
    // function at some *other* arity, so that case never falls through to
    // the same-named-variable lookup below.
    if let Some(func_id) = interp.functions.resolve_call(name, args.len())? {
        return invoke_function(interp, func_id, args, None, CallContext::Direct);
    }
    if interp.env.contains(name) {
        let value = interp.env.read(name)?;
        let callable = Callable::from_value(&value, name)?;
        return invoke_callable(interp, callable, args, None, CallContext::Variable);
    }
    Err(BrewException::name_error(format!("Variable {name} has not been defined")))
}

pub(crate) fn eval_method_call(interp: &mut Interpreter<'_>, object: &str, method: &str, args: &[Expr]) -> RunResult<Value> {
    let receiver_id = match eval_name(interp, object)? {
        Value::Object(id) => id,
        other => {
            return Err(BrewException::type_error(format!(
                "{object} is not an object (found {})",
                other.type_name()
            )))
        }
    };
    let field_value = ObjectRecord::get_field(receiver_id, method, &interp.heap)?;
    let callable = Callable::from_value(&field_value, &format!("{object}.{method}"))?;
    invoke_callable(interp, callable, args, Some(receiver_id), CallContext::Method)
}

fn invoke_callable(interp: &mut Interpreter<'_>, callable: Callable, args: &[Expr], this: Option<ObjectId>, context: CallContext) -> RunResult<Value> {
    match callable {
        Callable::Func(id) => invoke_function(interp, id, args, this, context),
        Callable::Lambda(id) => invoke_lambda(interp, id, args, this),
    }
}

pub(crate) fn invoke_function(interp: &mut Interpreter<'_>, func_id: FunctionId, args: &[Expr], this: Option<ObjectId>, context: CallContext) -> RunResult<Value> {
    let def = interp.functions.get(func_id).clone();
    if def.params.len() != args.len() {
        let message = format!("{} expects {} argument(s), got {}", def.name, def.params.len(), args.len());
        return Err(match context {
            CallContext::Method => BrewException::name_error(message),
            CallContext::Direct | CallContext::Variable => BrewException::type_error(message),
        });
    }

    log::trace!("calling {}/{}", def.name, def.params.len());

    let mut pushed: Vec<Rc<str>> = Vec::new();
    if let Some(receiver) = this {
        interp.env.push_direct("this", Value::Object(receiver));
        pushed.push(Rc::from("this"));
    }
    for (param, arg_expr) in def.params.iter().zip(args) {
        bind_argument(interp, param, arg_expr)?;
        pushed.push(param.name.clone());
    }

    let outcome = exec_block_plain(interp, &def.body).map_err(|e| e.push_frame(def.name.clone()));

    for name in pushed.iter().rev() {
        interp.env.pop(name);
    }

    outcome.map(flow_to_value)
}

fn invoke_lambda(interp: &mut Interpreter<'_>, lambda_id: ObjectId, args: &[Expr], this: Option<ObjectId>) -> RunResult<Value> {
    let params: Vec<Param> = interp.heap.lambda(lambda_id).params().to_vec();
    if params.len() != args.len() {
        // Unconditionally a `NameError` regardless of call site —
        // `Lambda.run_lambda` raises the same "unknown lambda" error whether
        // the lambda was invoked directly, through a variable, or as a
        // method, unlike a named function's arity mismatch.
        return Err(BrewException::name_error(format!(
            "lambda expects {} argument(s), got {}",
            params.len(),
            args.len()
        )));
    }

    log::trace!("calling a lambda/{}", params.len());

    let mut pushed: Vec<Rc<str>> = Vec::new();
    let closure_names: Vec<Rc<str>> = {
        let record = interp.heap.lambda(lambda_id);
        let snapshot: Vec<(Rc<str>, Value)> = record.closure.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let names = snapshot.iter().map(|(name, _)| name.clone()).collect();
        for (name, value) in snapshot {
            interp.env.push_direct(&name, value);
        }
        names
    };
    pushed.extend(closure_names.iter().cloned());

    if let Some(receiver) = this {
        interp.env.push_direct("this", Value::Object(receiver));
        pushed.push(Rc::from("this"));
    }

    for (param, arg_expr) in params.iter().zip(args) {
        bind_argument(interp, param, arg_expr)?;
        pushed.push(param.name.clone());
    }

    let param_names: AHashSet<Rc<str>> = params.iter().map(|p| p.name.clone()).collect();
    let body = interp.heap.lambda(lambda_id).def.body.clone();
    let outcome = exec_block_plain(interp, &body);

    // Write back any captured variable the call mutated, so the next call
    // through this same lambda sees it. A variable shadowed
    // by a parameter for this call never gets written back, and `this` is
    // call-site state, not persistent closure state.
    for name in &closure_names {
        if param_names.contains(name) || name.as_ref() == "this" {
            continue;
        }
        if let Ok(value) = interp.env.read(name) {
            interp.heap.lambda_mut(lambda_id).closure.insert(name.clone(), value);
        }
    }

    for name in pushed.iter().rev() {
        interp.env.pop(name);
    }

    outcome.map(flow_to_value)
}

fn flow_to_value(flow: Flow) -> Value {
    match flow {
        Flow::Return(v) => v,
        Flow::Normal => Value::Nil,
    }
}

/// Binds one call argument to its parameter:
/// - A `ref` parameter whose actual is a live variable binds by reference.
/// - A `ref` parameter whose actual is a bare name of a (non-overloaded)
///   function binds that function by value instead.
/// - Everything else evaluates the actual and binds by value, deep-copying
///   an `Object`/`Lambda` result so the callee can't mutate the caller's
///   copy through it.
fn bind_argument(interp: &mut Interpreter<'_>, param: &Param, arg_expr: &Expr) -> RunResult<()> {
    if param.kind == ParamKind::Reference {
        // Only a bare identifier is "a plain variable reference" — a
        // `base.field` path still reaches `Expr::Var` (its raw
        // dotted text lives there too, see `ast.rs`), but it names a field
        // slot, not a stack slot `bind_reference` can indirect to. It falls
        // through to the plain evaluate-by-value path below instead.
        if let Expr::Var(name) = arg_expr {
            if !name.contains('.') {
                if interp.env.contains(name) {
                    interp.env.bind_reference(&param.name, name)?;
                    return Ok(());
                }
                if let Some(func_id) = interp.functions.resolve_as_value(name)? {
                    interp.env.push_direct(&param.name, Value::Func(func_id));
                    return Ok(());
                }
                return Err(BrewException::name_error(format!("Variable {name} has not been defined")));
            }
        }
    }
    let value = eval_expr(interp, arg_expr)?;
    let value = interp.heap.deep_copy_value(&value);
    interp.env.push_direct(&param.name, value);
    Ok(())
}

/// Intercepts `print`, `inputi`, `inputs` before any user-defined function
/// or variable lookup: builtins take priority over user names.
fn call_builtin(interp: &mut Interpreter<'_>, name: &str, args: &[Expr]) -> Option<RunResult<Value>> {
    match name {
        "print" => Some(do_print(interp, args)),
        "inputi" => Some(do_inputi(interp, args)),
        "inputs" => Some(do_inputs(interp, args)),
        _ => None,
    }
}

fn do_print(interp: &mut Interpreter<'_>, args: &[Expr]) -> RunResult<Value> {
    let mut line = String::new();
    for arg in args {
        let value = eval_expr(interp, arg)?;
        line.push_str(&display_value(&value));
    }
    interp.print.print_line(&line);
    Ok(Value::Nil)
}

/// `inputi`/`inputs` take at most one argument, and if present it must be a
/// literal printed as a prompt before the read. A computed
/// prompt expression is rejected with a `TypeError` rather than evaluated —
/// the reference interpreter reads the argument's raw literal payload
/// directly rather than evaluating it as an expression, so anything that
/// isn't already a literal has no defined meaning here.
fn literal_prompt(args: &[Expr]) -> RunResult<Option<String>> {
    match args {
        [] => Ok(None),
        [Expr::Literal(lit)] => Ok(Some(display_value(&literal_value(lit)))),
        [_] => Err(BrewException::type_error("inputi/inputs prompt must be a literal")),
        _ => Err(BrewException::name_error("inputi/inputs takes at most one argument")),
    }
}

fn do_inputi(interp: &mut Interpreter<'_>, args: &[Expr]) -> RunResult<Value> {
    if let Some(prompt) = literal_prompt(args)? {
        interp.print.print_line(&prompt);
    }
    let line = interp.input.read_line()?;
    line.trim()
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|_| BrewException::type_error(format!("inputi expected an integer, got '{line}'")))
}

fn do_inputs(interp: &mut Interpreter<'_>, args: &[Expr]) -> RunResult<Value> {
    if let Some(prompt) = literal_prompt(args)? {
        interp.print.print_line(&prompt);
    }
    let line = interp.input.read_line()?;
    Ok(Value::Str(Rc::from(line)))
}

/// Formats a value for `print`. Printing an `Object`/`Lambda`/
/// `Func` is explicitly unspecified beyond "must not crash" — these render
/// as a fixed placeholder rather than anything identity- or content-derived.
fn display_value(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Str(s) => s.to_string(),
        Value::Func(_) => "function".to_string(),
        Value::Lambda(_) => "lambda".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
