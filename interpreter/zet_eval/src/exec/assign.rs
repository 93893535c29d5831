//! The assignment path.
//!
//! Assignable expressions are variables, 1-based indexed accesses on a
//! variable, and object members. Assigning to anything else is an
//! undefined-operation error when the user wrote the assignment, and a
//! silent no-op when a read-write write-back meets a literal argument -
//! that distinction lives in [`is_assignable`], which write-back checks
//! before applying an entry.

use std::rc::Rc;

use zet_rt::Value;

use crate::errors::{incompatible_type, undefined_operation, EvalResult};
use crate::exec::eval_expr;
use crate::State;
use zet_ir::Expr;

/// Whether `expr` can receive an assignment at all.
pub fn is_assignable(expr: &Expr) -> bool {
    match expr {
        Expr::Variable(_) | Expr::Member { .. } => true,
        Expr::Call { callee, args } => {
            args.len() == 1 && matches!(callee.as_ref(), Expr::Variable(_))
        }
        _ => false,
    }
}

/// Assign `value` to the l-value `target` in the active scope.
pub fn assign(state: &mut State, target: &Expr, value: Value) -> EvalResult<()> {
    match target {
        Expr::Variable(id) => {
            state.put_value(*id, value);
            Ok(())
        }
        Expr::Call { callee, args } => {
            let Expr::Variable(base) = callee.as_ref() else {
                return Err(not_assignable(target));
            };
            let [index_expr] = args.as_slice() else {
                return Err(not_assignable(target));
            };
            let index = eval_expr(state, index_expr)?;
            let current = state.find_value(*base);
            let updated = set_member_at(current, &index, value)?;
            state.put_value(*base, updated);
            Ok(())
        }
        Expr::Member { target: object, member } => {
            let object = eval_expr(state, object)?;
            match object {
                Value::Object(obj) => {
                    obj.set_member(*member, value);
                    Ok(())
                }
                other => Err(incompatible_type(format!("'{other}' is not an object"))),
            }
        }
        other => Err(not_assignable(other)),
    }
}

fn not_assignable(expr: &Expr) -> crate::errors::EvalError {
    undefined_operation(format!(
        "expression '{}' can not be used as assignment target",
        expr.to_source()
    ))
}

/// Indexed store: lists and tuples grow with om up to the index, map
/// entries are inserted, and assigning om to a map key removes it.
fn set_member_at(container: Value, index: &Value, value: Value) -> EvalResult {
    match container {
        Value::List(mut items) => {
            let i = positive_index(index)?;
            let items_mut = Rc::make_mut(&mut items);
            if items_mut.len() < i {
                items_mut.resize(i, Value::Om);
            }
            items_mut[i - 1] = value;
            Ok(Value::List(items))
        }
        Value::Tuple(mut items) => {
            let i = positive_index(index)?;
            let items_mut = Rc::make_mut(&mut items);
            if items_mut.len() < i {
                items_mut.resize(i, Value::Om);
            }
            items_mut[i - 1] = value;
            Ok(Value::Tuple(items))
        }
        Value::Map(mut entries) => {
            let entries_mut = Rc::make_mut(&mut entries);
            if value.is_om() {
                entries_mut.remove(index);
            } else {
                entries_mut.insert(index.clone(), value);
            }
            Ok(Value::Map(entries))
        }
        other => Err(incompatible_type(format!(
            "'{other}({index})' can not be assigned"
        ))),
    }
}

fn positive_index(index: &Value) -> EvalResult<usize> {
    match index.as_i64() {
        Some(i) if i >= 1 => Ok(i as usize),
        _ => Err(incompatible_type(format!(
            "'{index}' is not a valid index"
        ))),
    }
}
