//! Statement execution, block scoping, and control flow.

use std::rc::Rc;

use crate::ast::Stmt;
use crate::exceptions::{BrewException, RunResult};
use crate::expr::{assign_name, eval_expr};
use crate::run::Interpreter;
use crate::value::Value;

/// How a block finished: either it ran off the end, or a `return` is
/// unwinding through it. A `return` with no following statements still has
/// to pop any locals the enclosing blocks introduced.
pub(crate) enum Flow {
    Normal,
    Return(Value),
}

/// Runs a function/lambda body. Locals introduced here live for the rest of
/// the call and are cleaned up by the caller (`call.rs`) when the whole
/// activation's bindings are popped, so this executor does no scope
/// tracking of its own.
pub(crate) fn exec_block_plain(interp: &mut Interpreter<'_>, stmts: &[Stmt]) -> RunResult<Flow> {
    for stmt in stmts {
        match exec_stmt(interp, stmt)? {
            Flow::Normal => continue,
            flow @ Flow::Return(_) => return Ok(flow),
        }
    }
    Ok(Flow::Normal)
}

/// Runs an `if`/`while` body. Any plain-name assignment that introduces a
/// brand-new binding is popped again when this block exits, on every exit
/// path including an early `return` propagating through it.
pub(crate) fn exec_block_scoped(interp: &mut Interpreter<'_>, stmts: &[Stmt]) -> RunResult<Flow> {
    let mut introduced: Vec<Rc<str>> = Vec::new();
    let result = exec_block_scoped_inner(interp, stmts, &mut introduced);
    for name in introduced.iter().rev() {
        interp.env.pop(name);
    }
    result
}

fn exec_block_scoped_inner(interp: &mut Interpreter<'_>, stmts: &[Stmt], introduced: &mut Vec<Rc<str>>) -> RunResult<Flow> {
    for stmt in stmts {
        if let Stmt::Assign { target, .. } = stmt {
            if !target.contains('.') && !interp.env.contains(target) {
                introduced.push(target.clone());
            }
        }
        match exec_stmt(interp, stmt)? {
            Flow::Normal => continue,
            flow @ Flow::Return(_) => return Ok(flow),
        }
    }
    Ok(Flow::Normal)
}

fn exec_stmt(interp: &mut Interpreter<'_>, stmt: &Stmt) -> RunResult<Flow> {
    match stmt {
        Stmt::Assign { target, value } => {
            let v = eval_expr(interp, value)?;
            assign_name(interp, target, v)?;
            Ok(Flow::Normal)
        }
        Stmt::Call(expr) => {
            eval_expr(interp, expr)?;
            Ok(Flow::Normal)
        }
        Stmt::If { cond, then_branch, else_branch } => {
            if truthy(interp, cond)? {
                exec_block_scoped(interp, then_branch)
            } else if let Some(else_branch) = else_branch {
                exec_block_scoped(interp, else_branch)
            } else {
                Ok(Flow::Normal)
            }
        }
        Stmt::While { cond, body } => {
            while truthy(interp, cond)? {
                match exec_block_scoped(interp, body)? {
                    Flow::Normal => continue,
                    flow @ Flow::Return(_) => return Ok(flow),
                }
            }
            Ok(Flow::Normal)
        }
        Stmt::Return(expr) => {
            let value = match expr {
                Some(e) => {
                    let v = eval_expr(interp, e)?;
                    interp.heap.deep_copy_value(&v)
                }
                None => Value::Nil,
            };
            Ok(Flow::Return(value))
        }
    }
}

fn truthy(interp: &mut Interpreter<'_>, cond: &crate::ast::Expr) -> RunResult<bool> {
    let v = eval_expr(interp, cond)?;
    v.as_coerced_bool()
        .ok_or_else(|| BrewException::type_error(format!("Incompatible type for condition: {}", v.type_name())))
}
