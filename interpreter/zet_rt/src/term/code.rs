//! Statement and expression ⇄ term conversion.
//!
//! Code terms are how procedure bodies travel inside procedure terms and
//! how reified code prints. Statements and operator expressions each carry
//! their own functional character; literal constants appear as plain values
//! among the children.

use std::rc::Rc;

use zet_ir::{
    BinaryOp, Block, CatchBranch, CatchKind, Expr, Ident, Literal, ProcedureKind, Stmt, UnaryOp,
    R64,
};

use super::{tags, Term};
use crate::errors::{malformed_term, term_conversion, EvalResult};
use crate::param::{param_from_term, param_to_term};
use crate::procedure::Procedure;
use crate::value::Value;

// To terms.

/// `^block(statements)`.
pub fn block_to_term(block: &Block) -> Value {
    let stmts = block.statements.iter().map(stmt_to_term).collect();
    Value::term(Term::new_internal(tags::BLOCK, vec![Value::list(stmts)]))
}

/// Term form of one statement. An expression statement is simply its
/// expression's term.
pub fn stmt_to_term(stmt: &Stmt) -> Value {
    match stmt {
        Stmt::Expression(e) => expr_to_term(e),
        Stmt::Assignment { target, value } => Value::term(Term::new_internal(
            tags::ASSIGNMENT,
            vec![expr_to_term(target), expr_to_term(value)],
        )),
        Stmt::Return(None) => Value::term(Term::new_internal(tags::RETURN, vec![])),
        Stmt::Return(Some(e)) => {
            Value::term(Term::new_internal(tags::RETURN, vec![expr_to_term(e)]))
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let mut args = vec![expr_to_term(condition), block_to_term(then_branch)];
            if let Some(else_branch) = else_branch {
                args.push(block_to_term(else_branch));
            }
            Value::term(Term::new_internal(tags::IF, args))
        }
        Stmt::While { condition, body } => Value::term(Term::new_internal(
            tags::WHILE,
            vec![expr_to_term(condition), block_to_term(body)],
        )),
        Stmt::For {
            variable,
            collection,
            body,
        } => Value::term(Term::new_internal(
            tags::FOR,
            vec![
                Value::string(variable.as_str()),
                expr_to_term(collection),
                block_to_term(body),
            ],
        )),
        Stmt::TryCatch { attempt, branches } => {
            let branch_terms = branches.iter().map(branch_to_term).collect();
            Value::term(Term::new_internal(
                tags::TRY_CATCH,
                vec![block_to_term(attempt), Value::list(branch_terms)],
            ))
        }
        Stmt::Throw(e) => Value::term(Term::new_internal(tags::THROW, vec![expr_to_term(e)])),
        Stmt::Break => Value::term(Term::new_internal(tags::BREAK, vec![])),
        Stmt::Continue => Value::term(Term::new_internal(tags::CONTINUE, vec![])),
        Stmt::Global(id) => Value::term(Term::new_internal(
            tags::GLOBAL,
            vec![Value::string(id.as_str())],
        )),
    }
}

fn branch_to_term(branch: &CatchBranch) -> Value {
    let tag = match branch.kind {
        CatchKind::Any => tags::TRY_CATCH_BRANCH,
        CatchKind::User => tags::TRY_CATCH_USR_BRANCH,
        CatchKind::Language => tags::TRY_CATCH_LNG_BRANCH,
    };
    Value::term(Term::new_internal(
        tag,
        vec![
            Value::string(branch.error_var.as_str()),
            block_to_term(&branch.recovery),
        ],
    ))
}

/// Term form of one expression.
pub fn expr_to_term(expr: &Expr) -> Value {
    match expr {
        Expr::Literal(lit) => literal_to_value(lit),
        Expr::Variable(id) => Value::term(Term::new_internal(
            tags::VARIABLE,
            vec![Value::string(id.as_str())],
        )),
        Expr::List(items) => collection_constructor_to_term(tags::LIST_CONSTRUCTOR, items),
        Expr::Set(items) => collection_constructor_to_term(tags::SET_CONSTRUCTOR, items),
        Expr::Binary { op, left, right } => Value::term(Term::new_internal(
            binary_tag(*op),
            vec![expr_to_term(left), expr_to_term(right)],
        )),
        Expr::Unary { op, operand } => {
            let tag = match op {
                UnaryOp::Minus => tags::MINUS,
                UnaryOp::Not => tags::NOT,
            };
            Value::term(Term::new_internal(tag, vec![expr_to_term(operand)]))
        }
        Expr::Call { callee, args } => {
            let arg_terms = args.iter().map(expr_to_term).collect();
            Value::term(Term::new_internal(
                tags::CALL,
                vec![expr_to_term(callee), Value::list(arg_terms)],
            ))
        }
        Expr::Member { target, member } => Value::term(Term::new_internal(
            tags::MEMBER_ACCESS,
            vec![expr_to_term(target), Value::string(member.as_str())],
        )),
        Expr::Procedure { kind, params, body } => {
            procedure_literal_to_term(*kind, params, body)
        }
    }
}

fn collection_constructor_to_term(tag: &'static str, items: &[Expr]) -> Value {
    let item_terms = items.iter().map(expr_to_term).collect();
    Value::term(Term::new_internal(tag, vec![Value::list(item_terms)]))
}

fn literal_to_value(lit: &Literal) -> Value {
    match lit {
        Literal::Om => Value::Om,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(n) => Value::int(*n),
        Literal::Real(r) => Value::real(r.0),
        Literal::Str(s) => Value::string(s.clone()),
    }
}

fn kind_tag(kind: ProcedureKind) -> &'static str {
    match kind {
        ProcedureKind::Procedure => tags::PROCEDURE,
        ProcedureKind::Closure => tags::CLOSURE,
        ProcedureKind::Lambda => tags::LAMBDA,
    }
}

/// `tag(param_list, body)`. Captured bindings are not serialized.
fn procedure_literal_to_term(kind: ProcedureKind, params: &[zet_ir::Param], body: &Block) -> Value {
    let param_terms = params.iter().map(param_to_term).collect();
    Value::term(Term::new_internal(
        kind_tag(kind),
        vec![Value::list(param_terms), block_to_term(body)],
    ))
}

/// Term form of a procedure value.
pub fn procedure_to_term(procedure: &Procedure) -> Value {
    procedure_literal_to_term(procedure.kind(), procedure.params(), procedure.body())
}

fn binary_tag(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Sum => tags::SUM,
        BinaryOp::Difference => tags::DIFFERENCE,
        BinaryOp::Product => tags::PRODUCT,
        BinaryOp::Quotient => tags::QUOTIENT,
        BinaryOp::Modulo => tags::MODULO,
        BinaryOp::Equals => tags::EQUALS,
        BinaryOp::NotEquals => tags::NOT_EQUALS,
        BinaryOp::LessThan => tags::LESS_THAN,
        BinaryOp::LessOrEqual => tags::LESS_OR_EQUAL,
        BinaryOp::GreaterThan => tags::GREATER_THAN,
        BinaryOp::GreaterOrEqual => tags::GREATER_OR_EQUAL,
        BinaryOp::Conjunction => tags::CONJUNCTION,
        BinaryOp::Disjunction => tags::DISJUNCTION,
        BinaryOp::In => tags::IN,
    }
}

fn binary_op_for(tag: &str) -> Option<BinaryOp> {
    Some(match tag {
        tags::SUM => BinaryOp::Sum,
        tags::DIFFERENCE => BinaryOp::Difference,
        tags::PRODUCT => BinaryOp::Product,
        tags::QUOTIENT => BinaryOp::Quotient,
        tags::MODULO => BinaryOp::Modulo,
        tags::EQUALS => BinaryOp::Equals,
        tags::NOT_EQUALS => BinaryOp::NotEquals,
        tags::LESS_THAN => BinaryOp::LessThan,
        tags::LESS_OR_EQUAL => BinaryOp::LessOrEqual,
        tags::GREATER_THAN => BinaryOp::GreaterThan,
        tags::GREATER_OR_EQUAL => BinaryOp::GreaterOrEqual,
        tags::CONJUNCTION => BinaryOp::Conjunction,
        tags::DISJUNCTION => BinaryOp::Disjunction,
        tags::IN => BinaryOp::In,
        _ => return None,
    })
}

// From terms.

/// Inverse of [`block_to_term`].
pub fn block_from_term(value: &Value) -> EvalResult<Block> {
    let Value::Term(term) = value else {
        return Err(malformed_term(tags::BLOCK));
    };
    if term.functional().as_str() != tags::BLOCK {
        return Err(malformed_term(tags::BLOCK));
    }
    let [Value::List(stmts)] = term.args() else {
        return Err(malformed_term(tags::BLOCK));
    };
    let statements = stmts
        .iter()
        .map(stmt_from_term)
        .collect::<EvalResult<Vec<Stmt>>>()?;
    Ok(Block::new(statements))
}

/// Inverse of [`stmt_to_term`]: statement tags dispatch through the
/// registry, anything else is read as an expression statement.
pub fn stmt_from_term(value: &Value) -> EvalResult<Stmt> {
    if let Value::Term(term) = value {
        let tag = term.functional().as_str();
        if let Some(converters) = super::registry::converters_for(tag) {
            if let Some(convert) = converters.stmt {
                return convert(term);
            }
        }
    }
    expr_from_term(value).map(Stmt::Expression)
}

/// Inverse of [`expr_to_term`].
pub fn expr_from_term(value: &Value) -> EvalResult<Expr> {
    match value {
        Value::Om => Ok(Expr::Literal(Literal::Om)),
        Value::Bool(b) => Ok(Expr::Literal(Literal::Bool(*b))),
        Value::Int(_) => {
            let n = value.as_i64().ok_or_else(|| {
                term_conversion(format!("integer literal '{value}' is out of range"))
            })?;
            Ok(Expr::Literal(Literal::Int(n)))
        }
        Value::Real(r) => Ok(Expr::Literal(Literal::Real(R64(*r)))),
        Value::Str(s) => Ok(Expr::Literal(Literal::Str(s.as_ref().clone()))),
        Value::Term(term) => {
            let tag = term.functional().as_str();
            if let Some(converters) = super::registry::converters_for(tag) {
                if let Some(convert) = converters.expr {
                    return convert(term);
                }
            }
            Err(term_conversion(format!(
                "'{term}' does not represent an expression"
            )))
        }
        other => Err(term_conversion(format!(
            "'{other}' does not represent an expression"
        ))),
    }
}

/// Inverse of [`procedure_to_term`] / a procedure literal term.
pub(super) fn procedure_from_term(term: &Term) -> EvalResult<Procedure> {
    let kind = match term.functional().as_str() {
        tags::PROCEDURE => ProcedureKind::Procedure,
        tags::CLOSURE => ProcedureKind::Closure,
        tags::LAMBDA => ProcedureKind::Lambda,
        other => return Err(malformed_term(other)),
    };
    let (params, body) = params_and_body(term)?;
    Ok(Procedure::new(kind, params, body))
}

pub(super) fn procedure_expr_from_term(term: &Term) -> EvalResult<Expr> {
    let procedure = procedure_from_term(term)?;
    Ok(Expr::Procedure {
        kind: procedure.kind(),
        params: procedure.params().to_vec(),
        body: Rc::clone(procedure.body()),
    })
}

fn params_and_body(term: &Term) -> EvalResult<(Vec<zet_ir::Param>, Rc<Block>)> {
    let [Value::List(param_terms), body] = term.args() else {
        return Err(malformed_term(term.functional().as_str()));
    };
    let params = param_terms
        .iter()
        .map(param_from_term)
        .collect::<EvalResult<Vec<_>>>()?;
    Ok((params, Rc::new(block_from_term(body)?)))
}

pub(super) fn assignment_from_term(term: &Term) -> EvalResult<Stmt> {
    match term.args() {
        [target, value] => Ok(Stmt::Assignment {
            target: expr_from_term(target)?,
            value: expr_from_term(value)?,
        }),
        _ => Err(malformed_term(tags::ASSIGNMENT)),
    }
}

pub(super) fn return_from_term(term: &Term) -> EvalResult<Stmt> {
    match term.args() {
        [] => Ok(Stmt::Return(None)),
        [e] => Ok(Stmt::Return(Some(expr_from_term(e)?))),
        _ => Err(malformed_term(tags::RETURN)),
    }
}

pub(super) fn if_from_term(term: &Term) -> EvalResult<Stmt> {
    match term.args() {
        [condition, then_branch] => Ok(Stmt::If {
            condition: expr_from_term(condition)?,
            then_branch: block_from_term(then_branch)?,
            else_branch: None,
        }),
        [condition, then_branch, else_branch] => Ok(Stmt::If {
            condition: expr_from_term(condition)?,
            then_branch: block_from_term(then_branch)?,
            else_branch: Some(block_from_term(else_branch)?),
        }),
        _ => Err(malformed_term(tags::IF)),
    }
}

pub(super) fn while_from_term(term: &Term) -> EvalResult<Stmt> {
    match term.args() {
        [condition, body] => Ok(Stmt::While {
            condition: expr_from_term(condition)?,
            body: block_from_term(body)?,
        }),
        _ => Err(malformed_term(tags::WHILE)),
    }
}

pub(super) fn for_from_term(term: &Term) -> EvalResult<Stmt> {
    match term.args() {
        [Value::Str(variable), collection, body] => Ok(Stmt::For {
            variable: Ident::new(variable),
            collection: expr_from_term(collection)?,
            body: block_from_term(body)?,
        }),
        _ => Err(malformed_term(tags::FOR)),
    }
}

pub(super) fn try_catch_from_term(term: &Term) -> EvalResult<Stmt> {
    let [attempt, Value::List(branch_terms)] = term.args() else {
        return Err(malformed_term(tags::TRY_CATCH));
    };
    let mut branches = Vec::with_capacity(branch_terms.len());
    for branch in branch_terms.iter() {
        branches.push(branch_from_term(branch)?);
    }
    if branches.is_empty() {
        return Err(malformed_term(tags::TRY_CATCH));
    }
    Ok(Stmt::TryCatch {
        attempt: block_from_term(attempt)?,
        branches,
    })
}

fn branch_from_term(value: &Value) -> EvalResult<CatchBranch> {
    let Value::Term(term) = value else {
        return Err(malformed_term(tags::TRY_CATCH_BRANCH));
    };
    let kind = match term.functional().as_str() {
        tags::TRY_CATCH_BRANCH => CatchKind::Any,
        tags::TRY_CATCH_USR_BRANCH => CatchKind::User,
        tags::TRY_CATCH_LNG_BRANCH => CatchKind::Language,
        other => return Err(malformed_term(other)),
    };
    match term.args() {
        [Value::Str(error_var), recovery] => Ok(CatchBranch {
            kind,
            error_var: Ident::new(error_var),
            recovery: block_from_term(recovery)?,
        }),
        _ => Err(malformed_term(term.functional().as_str())),
    }
}

pub(super) fn throw_from_term(term: &Term) -> EvalResult<Stmt> {
    match term.args() {
        [e] => Ok(Stmt::Throw(expr_from_term(e)?)),
        _ => Err(malformed_term(tags::THROW)),
    }
}

pub(super) fn break_from_term(term: &Term) -> EvalResult<Stmt> {
    match term.args() {
        [] => Ok(Stmt::Break),
        _ => Err(malformed_term(tags::BREAK)),
    }
}

pub(super) fn continue_from_term(term: &Term) -> EvalResult<Stmt> {
    match term.args() {
        [] => Ok(Stmt::Continue),
        _ => Err(malformed_term(tags::CONTINUE)),
    }
}

pub(super) fn global_from_term(term: &Term) -> EvalResult<Stmt> {
    match term.args() {
        [Value::Str(name)] => Ok(Stmt::Global(Ident::new(name))),
        _ => Err(malformed_term(tags::GLOBAL)),
    }
}

pub(super) fn variable_from_term(term: &Term) -> EvalResult<Expr> {
    match term.args() {
        [Value::Str(name)] => Ok(Expr::Variable(Ident::new(name))),
        _ => Err(malformed_term(tags::VARIABLE)),
    }
}

pub(super) fn call_from_term(term: &Term) -> EvalResult<Expr> {
    let [callee, Value::List(arg_terms)] = term.args() else {
        return Err(malformed_term(tags::CALL));
    };
    let args = arg_terms
        .iter()
        .map(expr_from_term)
        .collect::<EvalResult<Vec<_>>>()?;
    Ok(Expr::Call {
        callee: Rc::new(expr_from_term(callee)?),
        args,
    })
}

pub(super) fn member_access_from_term(term: &Term) -> EvalResult<Expr> {
    match term.args() {
        [target, Value::Str(member)] => Ok(Expr::Member {
            target: Rc::new(expr_from_term(target)?),
            member: Ident::new(member),
        }),
        _ => Err(malformed_term(tags::MEMBER_ACCESS)),
    }
}

pub(super) fn collection_constructor_from_term(term: &Term) -> EvalResult<Expr> {
    let [Value::List(item_terms)] = term.args() else {
        return Err(malformed_term(term.functional().as_str()));
    };
    let items = item_terms
        .iter()
        .map(expr_from_term)
        .collect::<EvalResult<Vec<_>>>()?;
    match term.functional().as_str() {
        tags::LIST_CONSTRUCTOR => Ok(Expr::List(items)),
        tags::SET_CONSTRUCTOR => Ok(Expr::Set(items)),
        other => Err(malformed_term(other)),
    }
}

pub(super) fn binary_from_term(term: &Term) -> EvalResult<Expr> {
    let tag = term.functional().as_str();
    let op = binary_op_for(tag).ok_or_else(|| malformed_term(tag))?;
    match term.args() {
        [left, right] => Ok(Expr::Binary {
            op,
            left: Rc::new(expr_from_term(left)?),
            right: Rc::new(expr_from_term(right)?),
        }),
        _ => Err(malformed_term(tag)),
    }
}

pub(super) fn unary_from_term(term: &Term) -> EvalResult<Expr> {
    let op = match term.functional().as_str() {
        tags::MINUS => UnaryOp::Minus,
        tags::NOT => UnaryOp::Not,
        other => return Err(malformed_term(other)),
    };
    match term.args() {
        [operand] => Ok(Expr::Unary {
            op,
            operand: Rc::new(expr_from_term(operand)?),
        }),
        _ => Err(malformed_term(term.functional().as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Ident {
        Ident::new(s)
    }

    fn var(s: &str) -> Expr {
        Expr::Variable(ident(s))
    }

    fn int(n: i64) -> Expr {
        Expr::Literal(Literal::Int(n))
    }

    fn expr_round_trip(e: &Expr) {
        assert_eq!(&expr_from_term(&expr_to_term(e)).unwrap(), e);
    }

    #[test]
    fn literals_round_trip() {
        expr_round_trip(&int(42));
        expr_round_trip(&Expr::Literal(Literal::Om));
        expr_round_trip(&Expr::Literal(Literal::Str("s".into())));
        expr_round_trip(&Expr::Literal(Literal::Real(R64(1.5))));
    }

    #[test]
    fn operators_round_trip() {
        expr_round_trip(&Expr::Binary {
            op: BinaryOp::Sum,
            left: Rc::new(var("x")),
            right: Rc::new(int(1)),
        });
        expr_round_trip(&Expr::Unary {
            op: UnaryOp::Not,
            operand: Rc::new(var("b")),
        });
    }

    #[test]
    fn calls_and_constructors_round_trip() {
        expr_round_trip(&Expr::Call {
            callee: Rc::new(var("f")),
            args: vec![int(1), var("y")],
        });
        expr_round_trip(&Expr::List(vec![int(1), int(2)]));
        expr_round_trip(&Expr::Set(vec![var("a")]));
    }

    #[test]
    fn statements_round_trip() {
        let stmts = [
            Stmt::Assignment {
                target: var("x"),
                value: int(1),
            },
            Stmt::Return(None),
            Stmt::Return(Some(int(2))),
            Stmt::While {
                condition: Expr::Literal(Literal::Bool(true)),
                body: Block::new(vec![Stmt::Expression(var("x"))]),
            },
            Stmt::For {
                variable: ident("i"),
                collection: var("xs"),
                body: Block::new(vec![]),
            },
            Stmt::Throw(int(1)),
            Stmt::Global(ident("g")),
            Stmt::TryCatch {
                attempt: Block::new(vec![]),
                branches: vec![CatchBranch {
                    kind: CatchKind::User,
                    error_var: ident("e"),
                    recovery: Block::new(vec![]),
                }],
            },
        ];
        for stmt in &stmts {
            assert_eq!(&stmt_from_term(&stmt_to_term(stmt)).unwrap(), stmt);
        }
    }

    #[test]
    fn bare_and_valued_returns_stay_distinct() {
        let bare = stmt_to_term(&Stmt::Return(None));
        let valued = stmt_to_term(&Stmt::Return(Some(Expr::Literal(Literal::Om))));
        assert_ne!(bare, valued);
    }

    #[test]
    fn wrong_arity_is_malformed() {
        let t = Term::new_internal(tags::ASSIGNMENT, vec![Value::int(1)]);
        assert!(assignment_from_term(&t).is_err());
        let t = Term::new_internal(tags::WHILE, vec![]);
        assert!(while_from_term(&t).is_err());
    }

    #[test]
    fn wrong_child_variant_is_malformed() {
        // ^for with a non-string variable child.
        let t = Term::new_internal(
            tags::FOR,
            vec![Value::int(1), Value::int(2), Value::int(3)],
        );
        assert!(for_from_term(&t).is_err());
    }
}
