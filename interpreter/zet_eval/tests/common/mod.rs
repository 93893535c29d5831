//! Shared helpers for the evaluator's integration tests: tree builders and
//! a buffered execution context.

// Each integration test binary uses its own subset of the helpers.
#![allow(dead_code)]

use std::rc::Rc;

use zet_eval::exec::{exec_block, ControlMessage};
use zet_eval::{EvalResult, State, Value};
use zet_ir::{
    BinaryOp, Block, CatchBranch, CatchKind, Expr, Ident, Literal, Param, ProcedureKind, Stmt,
};

pub fn id(name: &str) -> Ident {
    Ident::new(name)
}

pub fn var(name: &str) -> Expr {
    Expr::Variable(id(name))
}

pub fn int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

pub fn str_lit(s: &str) -> Expr {
    Expr::Literal(Literal::Str(s.to_string()))
}

pub fn list(items: Vec<Expr>) -> Expr {
    Expr::List(items)
}

pub fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Rc::new(left),
        right: Rc::new(right),
    }
}

pub fn plus(left: Expr, right: Expr) -> Expr {
    bin(BinaryOp::Sum, left, right)
}

pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Rc::new(var(name)),
        args,
    }
}

pub fn assign(name: &str, value: Expr) -> Stmt {
    Stmt::Assignment {
        target: var(name),
        value,
    }
}

pub fn assign_to(target: Expr, value: Expr) -> Stmt {
    Stmt::Assignment { target, value }
}

pub fn expr_stmt(e: Expr) -> Stmt {
    Stmt::Expression(e)
}

pub fn ret(e: Expr) -> Stmt {
    Stmt::Return(Some(e))
}

pub fn block(statements: Vec<Stmt>) -> Block {
    Block::new(statements)
}

pub fn procedure_lit(kind: ProcedureKind, params: Vec<Param>, body: Vec<Stmt>) -> Expr {
    Expr::Procedure {
        kind,
        params,
        body: Rc::new(block(body)),
    }
}

pub fn catch_branch(kind: CatchKind, error_var: &str, recovery: Vec<Stmt>) -> CatchBranch {
    CatchBranch {
        kind,
        error_var: id(error_var),
        recovery: block(recovery),
    }
}

/// Execute statements, failing the test on any error or stray control
/// message.
pub fn run(state: &mut State, statements: Vec<Stmt>) {
    let outcome = exec_block(state, &block(statements)).expect("execution failed");
    assert_eq!(outcome, None, "unexpected control message at top level");
}

/// Execute statements, returning the raw outcome.
pub fn try_run(
    state: &mut State,
    statements: Vec<Stmt>,
) -> EvalResult<Option<ControlMessage>> {
    exec_block(state, &block(statements))
}

/// Evaluate one expression.
pub fn eval(state: &mut State, e: Expr) -> Value {
    zet_eval::exec::eval_expr(state, &e).expect("evaluation failed")
}

/// Current value of a variable.
pub fn value_of(state: &mut State, name: &str) -> Value {
    state.find_value(id(name))
}
