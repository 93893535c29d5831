//! Expression evaluation.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use zet_ir::{vars, BinaryOp, Expr, Literal, ProcedureKind, UnaryOp};
use zet_rt::{Procedure, Value};

use crate::errors::{incompatible_type, EvalResult};
use crate::exec::call;
use crate::State;

/// Evaluate one expression to a value.
pub fn eval_expr(state: &mut State, expr: &Expr) -> EvalResult {
    match expr {
        Expr::Literal(lit) => Ok(literal_value(lit)),
        Expr::Variable(id) => Ok(state.find_value(*id)),
        Expr::List(items) => {
            let members = eval_all(state, items)?;
            Ok(Value::list(members))
        }
        Expr::Set(items) => {
            let members = eval_all(state, items)?;
            Ok(Value::set(members))
        }
        Expr::Binary { op, left, right } => eval_binary(state, *op, left, right),
        Expr::Unary { op, operand } => {
            let value = eval_expr(state, operand)?;
            match op {
                UnaryOp::Minus => value.negate(),
                UnaryOp::Not => Ok(Value::Bool(!value.as_bool()?)),
            }
        }
        Expr::Call { callee, args } => eval_call(state, expr, callee, args),
        Expr::Member { target, member } => {
            let target = eval_expr(state, target)?;
            match target {
                Value::Object(obj) => Ok(obj.member(*member).unwrap_or(Value::Om)),
                other => Err(incompatible_type(format!("'{other}' is not an object"))),
            }
        }
        Expr::Procedure { kind, params, body } => {
            let procedure = Procedure::new(*kind, params.clone(), Rc::clone(body));
            if *kind == ProcedureKind::Closure {
                // Capture the free variables of the body as currently bound
                // in the defining environment. Names that resolve nowhere
                // stay free.
                let mut captured = FxHashMap::default();
                for id in vars::unbound_in_procedure(params, body) {
                    if let Some(value) = state.lookup_for_capture(id) {
                        captured.insert(id, value.clone_deep());
                    }
                }
                procedure.set_captured(captured);
            }
            Ok(Value::procedure(procedure))
        }
    }
}

fn eval_all(state: &mut State, exprs: &[Expr]) -> EvalResult<Vec<Value>> {
    let mut values = Vec::with_capacity(exprs.len());
    for expr in exprs {
        values.push(eval_expr(state, expr)?);
    }
    Ok(values)
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Om => Value::Om,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(n) => Value::int(*n),
        Literal::Real(r) => Value::real(r.0),
        Literal::Str(s) => Value::string(s.clone()),
    }
}

fn eval_binary(state: &mut State, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult {
    // The boolean connectives short-circuit; everything else evaluates both
    // operands first.
    match op {
        BinaryOp::Conjunction => {
            if !eval_expr(state, left)?.as_bool()? {
                return Ok(Value::Bool(false));
            }
            return Ok(Value::Bool(eval_expr(state, right)?.as_bool()?));
        }
        BinaryOp::Disjunction => {
            if eval_expr(state, left)?.as_bool()? {
                return Ok(Value::Bool(true));
            }
            return Ok(Value::Bool(eval_expr(state, right)?.as_bool()?));
        }
        _ => {}
    }

    let lhs = eval_expr(state, left)?;
    let rhs = eval_expr(state, right)?;
    match op {
        BinaryOp::Sum => lhs.add(&rhs),
        BinaryOp::Difference => lhs.subtract(&rhs),
        BinaryOp::Product => lhs.multiply(&rhs),
        BinaryOp::Quotient => lhs.divide(&rhs),
        BinaryOp::Modulo => lhs.modulo(&rhs),
        BinaryOp::Equals => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::NotEquals => Ok(Value::Bool(lhs != rhs)),
        BinaryOp::LessThan => Ok(Value::Bool(lhs < rhs)),
        BinaryOp::LessOrEqual => Ok(Value::Bool(lhs <= rhs)),
        BinaryOp::GreaterThan => Ok(Value::Bool(lhs > rhs)),
        BinaryOp::GreaterOrEqual => Ok(Value::Bool(lhs >= rhs)),
        BinaryOp::In => Ok(Value::Bool(rhs.contains(&lhs)?)),
        BinaryOp::Conjunction | BinaryOp::Disjunction => unreachable!("handled above"),
    }
}

/// A call expression: procedure call, pre-defined call, or 1-based
/// collection access, decided by what the callee evaluates to.
fn eval_call(state: &mut State, call_expr: &Expr, callee: &Expr, args: &[Expr]) -> EvalResult {
    // Member callees carry their object into the call for method dispatch.
    let (callee_value, bound_object) = match callee {
        Expr::Member { target, member } => {
            let target = eval_expr(state, target)?;
            match target {
                Value::Object(obj) => {
                    let member_value = obj.member(*member).unwrap_or(Value::Om);
                    (member_value, Some(obj))
                }
                other => {
                    return Err(incompatible_type(format!("'{other}' is not an object")));
                }
            }
        }
        other => (eval_expr(state, other)?, None),
    };

    let values = eval_all(state, args)?;

    let result = match &callee_value {
        Value::Procedure(p) => call::call_procedure(state, p, args, values, bound_object),
        Value::Builtin(b) => call::call_builtin(state, *b, args, values),
        container => match values.as_slice() {
            [index] => access_collection(container, index),
            _ => Err(incompatible_type(format!(
                "'{container}' is not a procedure"
            ))),
        },
    };

    // Each failing call contributes one trace frame.
    result.map_err(|mut error| {
        error.add_to_trace(format!("Error in \"{}\":", call_expr.to_source()));
        error
    })
}

/// 1-based member access shared by lists, tuples, strings, maps, and
/// terms. Out-of-range reads yield om.
fn access_collection(container: &Value, index: &Value) -> EvalResult {
    match container {
        Value::Map(entries) => Ok(entries.get(index).cloned().unwrap_or(Value::Om)),
        Value::List(_) | Value::Tuple(_) | Value::Str(_) | Value::Term(_) => {
            let i = index.as_i64().ok_or_else(|| {
                incompatible_type(format!("'{index}' is not a valid index"))
            })?;
            if i < 1 {
                return Err(incompatible_type(format!(
                    "'{index}' is not a valid index"
                )));
            }
            let i = (i - 1) as usize;
            Ok(match container {
                Value::List(items) | Value::Tuple(items) => {
                    items.get(i).cloned().unwrap_or(Value::Om)
                }
                Value::Str(s) => s
                    .chars()
                    .nth(i)
                    .map(|c| Value::string(c.to_string()))
                    .unwrap_or(Value::Om),
                Value::Term(term) => term.arg(i).cloned().unwrap_or(Value::Om),
                _ => unreachable!(),
            })
        }
        other => Err(incompatible_type(format!(
            "'{other}({index})' is undefined"
        ))),
    }
}
