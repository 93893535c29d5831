//! Statement execution.
//!
//! Statements return a return-or-error sum: `Ok(None)` to continue,
//! `Ok(Some(message))` for control flow that an enclosing construct
//! consumes (`return` at a call boundary, `break`/`continue` at a loop),
//! and `Err` for every error kind. Nothing unwinds; the call protocol's
//! guaranteed teardown runs in ordinary control flow on both paths.

pub mod assign;
pub mod call;
mod expr;

pub use expr::eval_expr;

use zet_ir::{Block, CatchKind, Ident, Stmt};
use zet_rt::Value;

use crate::errors::{thrown, EvalResult};
use crate::State;

/// Control flow escaping a statement.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlMessage {
    /// `return`, with om for a bare return.
    Return(Value),
    Break,
    Continue,
}

/// Execute the statements of `block` in order until one produces a control
/// message or fails.
pub fn exec_block(state: &mut State, block: &Block) -> EvalResult<Option<ControlMessage>> {
    for stmt in &block.statements {
        if let Some(message) = exec_stmt(state, stmt)? {
            return Ok(Some(message));
        }
    }
    Ok(None)
}

/// Execute one statement.
pub fn exec_stmt(state: &mut State, stmt: &Stmt) -> EvalResult<Option<ControlMessage>> {
    match stmt {
        Stmt::Expression(e) => {
            eval_expr(state, e)?;
            Ok(None)
        }
        Stmt::Assignment { target, value } => {
            // Assignment has copy semantics: the target owns its structure.
            let v = eval_expr(state, value)?.clone_deep();
            assign::assign(state, target, v)?;
            Ok(None)
        }
        Stmt::Return(e) => {
            let payload = match e {
                Some(e) => eval_expr(state, e)?,
                None => Value::Om,
            };
            Ok(Some(ControlMessage::Return(payload)))
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            if eval_expr(state, condition)?.as_bool()? {
                exec_block(state, then_branch)
            } else if let Some(else_branch) = else_branch {
                exec_block(state, else_branch)
            } else {
                Ok(None)
            }
        }
        Stmt::While { condition, body } => exec_while(state, condition, body),
        Stmt::For {
            variable,
            collection,
            body,
        } => exec_for(state, *variable, collection, body),
        Stmt::Break => Ok(Some(ControlMessage::Break)),
        Stmt::Continue => Ok(Some(ControlMessage::Continue)),
        Stmt::TryCatch { attempt, branches } => {
            let outcome = exec_block(state, attempt);
            let error = match outcome {
                Ok(message) => return Ok(message),
                Err(error) => error,
            };
            if error.is_catchable() {
                for branch in branches {
                    let matches = match branch.kind {
                        CatchKind::Any => true,
                        CatchKind::User => error.is_user_thrown(),
                        CatchKind::Language => !error.is_user_thrown(),
                    };
                    if matches {
                        let bound = match error.thrown_payload() {
                            Some(payload) => payload.clone(),
                            None => Value::string(error.message()),
                        };
                        state.put_value(branch.error_var, bound);
                        return exec_block(state, &branch.recovery);
                    }
                }
            }
            Err(error)
        }
        Stmt::Throw(e) => {
            let payload = eval_expr(state, e)?.clone_deep();
            Err(thrown(payload))
        }
        Stmt::Global(id) => {
            state.make_global(*id);
            Ok(None)
        }
    }
}

fn exec_while(
    state: &mut State,
    condition: &zet_ir::Expr,
    body: &Block,
) -> EvalResult<Option<ControlMessage>> {
    while eval_expr(state, condition)?.as_bool()? {
        match exec_block(state, body)? {
            None | Some(ControlMessage::Continue) => {}
            Some(ControlMessage::Break) => break,
            message @ Some(ControlMessage::Return(_)) => return Ok(message),
        }
    }
    Ok(None)
}

/// Iterator block: the body runs in a child scope with read- and
/// write-through, so the iteration variable is local to the iteration while
/// every other store lands in the enclosing scope. Write-through is
/// suspended while the iteration variable itself is bound.
fn exec_for(
    state: &mut State,
    variable: Ident,
    collection: &zet_ir::Expr,
    body: &Block,
) -> EvalResult<Option<ControlMessage>> {
    let collection = eval_expr(state, collection)?;
    let members = iteration_members(&collection)?;

    let outer = state.scope();
    let iterator = outer.new_iterator_child();
    state.set_scope(iterator.clone());

    let mut outcome = Ok(None);
    for member in members {
        iterator.set_write_through(false);
        iterator.store(variable, member.clone_deep());
        iterator.set_write_through(true);

        match exec_block(state, body) {
            Ok(None) | Ok(Some(ControlMessage::Continue)) => {}
            Ok(Some(ControlMessage::Break)) => break,
            message @ Ok(Some(ControlMessage::Return(_))) => {
                outcome = message;
                break;
            }
            error @ Err(_) => {
                outcome = error;
                break;
            }
        }
    }

    state.set_scope(outer);
    outcome
}

/// The members a `for` statement iterates, in iteration order.
fn iteration_members(collection: &Value) -> EvalResult<Vec<Value>> {
    match collection {
        Value::List(items) | Value::Tuple(items) => Ok(items.as_ref().clone()),
        Value::Set(items) => Ok(items.iter().cloned().collect()),
        Value::Map(entries) => Ok(entries
            .iter()
            .map(|(k, v)| Value::list(vec![k.clone(), v.clone()]))
            .collect()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
        other => Err(crate::errors::incompatible_type(format!(
            "'{other}' is not a collection value"
        ))),
    }
}

/// Execute a whole program in the active scope. An error no catch
/// recovered from is reported to the host output channel and returned.
pub fn run_program(state: &mut State, block: &Block) -> EvalResult<Option<ControlMessage>> {
    let outcome = exec_block(state, block);
    if let Err(error) = &outcome {
        state.report_unhandled(error);
    }
    outcome
}
