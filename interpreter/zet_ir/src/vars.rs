//! Identifier classification over a body.
//!
//! Walks a tree and sorts every identifier it mentions into three lists:
//!
//! - `bound`: defined at the point of use (formal parameters and earlier
//!   assignment targets),
//! - `unbound`: referenced but not bound at the point of use,
//! - `used`: referenced while bound.
//!
//! Order matters: an assignment collects its right-hand side before its
//! target binds, so `n := n + 1` reports `n` as unbound. Closure literals
//! run the classification on their own body and propagate identifiers that
//! stay unbound inside to the surrounding collection, which is how nested
//! closures accumulate their capture sets.

use crate::ast::{Block, Expr, Param, Stmt};
use crate::Ident;

/// Identifier whose presence in a body suppresses constant-folding style
/// optimization in a front-end. It is classified like any other unbound
/// variable but never captured.
pub fn prevent_optimization_dummy() -> Ident {
    Ident::new("@prevent_optimization")
}

/// Record a read of `id` at the current point.
fn note_read(id: Ident, bound: &[Ident], unbound: &mut Vec<Ident>, used: &mut Vec<Ident>) {
    if bound.contains(&id) {
        used.push(id);
    } else {
        unbound.push(id);
    }
}

/// Record a binding of `id` at the current point.
fn note_bound(id: Ident, bound: &mut Vec<Ident>) {
    if !bound.contains(&id) {
        bound.push(id);
    }
}

/// Classify every identifier mentioned in `block`.
pub fn collect_block(
    block: &Block,
    bound: &mut Vec<Ident>,
    unbound: &mut Vec<Ident>,
    used: &mut Vec<Ident>,
) {
    for stmt in &block.statements {
        collect_stmt(stmt, bound, unbound, used);
    }
}

/// Classify every identifier mentioned in `stmt`.
pub fn collect_stmt(
    stmt: &Stmt,
    bound: &mut Vec<Ident>,
    unbound: &mut Vec<Ident>,
    used: &mut Vec<Ident>,
) {
    match stmt {
        Stmt::Expression(e) => collect_expr(e, bound, unbound, used),
        Stmt::Assignment { target, value } => {
            // Right-hand side first: a self-referential assignment reads the
            // pre-assignment binding.
            collect_expr(value, bound, unbound, used);
            collect_assign_target(target, bound, unbound, used);
        }
        Stmt::Return(e) => {
            if let Some(e) = e {
                collect_expr(e, bound, unbound, used);
            }
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            collect_expr(condition, bound, unbound, used);
            collect_block(then_branch, bound, unbound, used);
            if let Some(else_branch) = else_branch {
                collect_block(else_branch, bound, unbound, used);
            }
        }
        Stmt::While { condition, body } => {
            collect_expr(condition, bound, unbound, used);
            collect_block(body, bound, unbound, used);
        }
        Stmt::For {
            variable,
            collection,
            body,
        } => {
            collect_expr(collection, bound, unbound, used);
            note_bound(*variable, bound);
            collect_block(body, bound, unbound, used);
        }
        Stmt::TryCatch { attempt, branches } => {
            collect_block(attempt, bound, unbound, used);
            for branch in branches {
                note_bound(branch.error_var, bound);
                collect_block(&branch.recovery, bound, unbound, used);
            }
        }
        Stmt::Throw(e) => collect_expr(e, bound, unbound, used),
        Stmt::Break | Stmt::Continue => {}
        Stmt::Global(id) => note_bound(*id, bound),
    }
}

/// Classify every identifier mentioned in `expr`.
pub fn collect_expr(
    expr: &Expr,
    bound: &mut Vec<Ident>,
    unbound: &mut Vec<Ident>,
    used: &mut Vec<Ident>,
) {
    match expr {
        Expr::Literal(_) => {}
        Expr::Variable(id) => note_read(*id, bound, unbound, used),
        Expr::List(items) | Expr::Set(items) => {
            for item in items {
                collect_expr(item, bound, unbound, used);
            }
        }
        Expr::Binary { left, right, .. } => {
            collect_expr(left, bound, unbound, used);
            collect_expr(right, bound, unbound, used);
        }
        Expr::Unary { operand, .. } => collect_expr(operand, bound, unbound, used),
        Expr::Call { callee, args } => {
            collect_expr(callee, bound, unbound, used);
            for arg in args {
                collect_expr(arg, bound, unbound, used);
            }
        }
        Expr::Member { target, .. } => collect_expr(target, bound, unbound, used),
        Expr::Procedure { params, body, .. } => {
            collect_procedure(params, body, bound, unbound, used);
        }
    }
}

/// Classify an assignment target: a plain variable binds, any other target
/// reads its constituents.
fn collect_assign_target(
    target: &Expr,
    bound: &mut Vec<Ident>,
    unbound: &mut Vec<Ident>,
    used: &mut Vec<Ident>,
) {
    match target {
        Expr::Variable(id) => note_bound(*id, bound),
        // An indexed store reads its base and indices.
        Expr::Call { callee, args } => {
            collect_expr(callee, bound, unbound, used);
            for arg in args {
                collect_expr(arg, bound, unbound, used);
            }
        }
        Expr::Member { target, .. } => collect_expr(target, bound, unbound, used),
        other => collect_expr(other, bound, unbound, used),
    }
}

/// Classify a procedure literal as seen from the outside.
///
/// The inside is collected on its own lists with the parameters pre-bound.
/// Identifiers left unbound inside either become `used` (when the enclosing
/// context binds them - the closure capture case) or propagate upward as
/// unbound. The optimization dummy never propagates.
fn collect_procedure(
    params: &[Param],
    body: &Block,
    bound: &mut Vec<Ident>,
    unbound: &mut Vec<Ident>,
    used: &mut Vec<Ident>,
) {
    let inner_unbound = unbound_in_procedure(params, body);
    for id in inner_unbound {
        if bound.contains(&id) {
            used.push(id);
        } else {
            unbound.push(id);
        }
    }
}

/// The identifiers a procedure body leaves unbound, deduplicated in first
/// mention order, with the optimization dummy removed. For a closure literal
/// this is exactly its capture-set candidates.
pub fn unbound_in_procedure(params: &[Param], body: &Block) -> Vec<Ident> {
    let mut inner_bound: Vec<Ident> = params.iter().map(|p| p.name).collect();
    let mut inner_unbound = Vec::new();
    let mut inner_used = Vec::new();
    collect_block(body, &mut inner_bound, &mut inner_unbound, &mut inner_used);

    let dummy = prevent_optimization_dummy();
    let mut result: Vec<Ident> = Vec::new();
    for id in inner_unbound {
        if id != dummy && !result.contains(&id) {
            result.push(id);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, Literal, ParamMode};
    use std::rc::Rc;

    fn ident(s: &str) -> Ident {
        Ident::new(s)
    }

    fn var(s: &str) -> Expr {
        Expr::Variable(ident(s))
    }

    fn int(n: i64) -> Expr {
        Expr::Literal(Literal::Int(n))
    }

    fn plus(l: Expr, r: Expr) -> Expr {
        Expr::Binary {
            op: BinaryOp::Sum,
            left: Rc::new(l),
            right: Rc::new(r),
        }
    }

    #[test]
    fn read_before_assignment_is_unbound() {
        // n := n + 1;
        let block = Block::new(vec![Stmt::Assignment {
            target: var("n"),
            value: plus(var("n"), int(1)),
        }]);
        let unbound = unbound_in_procedure(&[], &block);
        assert_eq!(unbound, vec![ident("n")]);
    }

    #[test]
    fn assignment_binds_later_reads() {
        // n := 1; m := n;
        let block = Block::new(vec![
            Stmt::Assignment {
                target: var("n"),
                value: int(1),
            },
            Stmt::Assignment {
                target: var("m"),
                value: var("n"),
            },
        ]);
        assert!(unbound_in_procedure(&[], &block).is_empty());
    }

    #[test]
    fn parameters_are_bound() {
        let block = Block::new(vec![Stmt::Return(Some(var("x")))]);
        let params = [Param {
            name: ident("x"),
            mode: ParamMode::Value,
        }];
        assert!(unbound_in_procedure(&params, &block).is_empty());
    }

    #[test]
    fn dummy_is_dropped_from_capture_candidates() {
        let block = Block::new(vec![Stmt::Expression(Expr::Variable(
            prevent_optimization_dummy(),
        ))]);
        assert!(unbound_in_procedure(&[], &block).is_empty());
    }

    #[test]
    fn nested_closure_propagates_free_variables() {
        // inner body reads `a`; the outer body never binds it, so `a`
        // propagates upward as unbound.
        let inner = Expr::Procedure {
            kind: crate::ast::ProcedureKind::Closure,
            params: vec![],
            body: Rc::new(Block::new(vec![Stmt::Return(Some(var("a")))])),
        };
        let outer = Block::new(vec![Stmt::Return(Some(inner))]);
        assert_eq!(unbound_in_procedure(&[], &outer), vec![ident("a")]);
    }

    #[test]
    fn indexed_assignment_reads_its_base() {
        // xs(1) := 2;
        let block = Block::new(vec![Stmt::Assignment {
            target: Expr::Call {
                callee: Rc::new(var("xs")),
                args: vec![int(1)],
            },
            value: int(2),
        }]);
        assert_eq!(unbound_in_procedure(&[], &block), vec![ident("xs")]);
    }
}
