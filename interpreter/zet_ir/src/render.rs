//! Source-form rendering.
//!
//! Renders trees back into surface syntax with precedence-driven
//! parenthesization. Error traces and procedure display both go through
//! these functions, so the output has to be stable and re-parseable by the
//! front-end.

use crate::ast::{BinaryOp, Block, CatchKind, Expr, Literal, ProcedureKind, Stmt, UnaryOp};

const INDENT: &str = "\t";

fn indent(sb: &mut String, tabs: usize) {
    for _ in 0..tabs {
        sb.push_str(INDENT);
    }
}

impl BinaryOp {
    /// Operator sign as written in source.
    pub fn sign(self) -> &'static str {
        match self {
            BinaryOp::Sum => "+",
            BinaryOp::Difference => "-",
            BinaryOp::Product => "*",
            BinaryOp::Quotient => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterOrEqual => ">=",
            BinaryOp::Conjunction => "&&",
            BinaryOp::Disjunction => "||",
            BinaryOp::In => "in",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Product | BinaryOp::Quotient | BinaryOp::Modulo => 80,
            BinaryOp::Sum | BinaryOp::Difference => 70,
            BinaryOp::In => 60,
            BinaryOp::Equals
            | BinaryOp::NotEquals
            | BinaryOp::LessThan
            | BinaryOp::LessOrEqual
            | BinaryOp::GreaterThan
            | BinaryOp::GreaterOrEqual => 50,
            BinaryOp::Conjunction => 40,
            BinaryOp::Disjunction => 30,
        }
    }
}

fn expr_precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Binary { op, .. } => op.precedence(),
        Expr::Unary { .. } => 90,
        Expr::Procedure { .. } => 20,
        _ => 100,
    }
}

/// Append the source form of `expr`.
pub fn append_expr(sb: &mut String, expr: &Expr) {
    match expr {
        Expr::Literal(lit) => append_literal(sb, lit),
        Expr::Variable(id) => sb.push_str(id.as_str()),
        Expr::List(items) => {
            sb.push('[');
            append_comma_separated(sb, items);
            sb.push(']');
        }
        Expr::Set(items) => {
            sb.push('{');
            append_comma_separated(sb, items);
            sb.push('}');
        }
        Expr::Binary { op, left, right } => {
            // Left-associative: the right child needs brackets already at
            // equal precedence.
            append_child(sb, left, op.precedence(), false);
            sb.push(' ');
            sb.push_str(op.sign());
            sb.push(' ');
            append_child(sb, right, op.precedence(), true);
        }
        Expr::Unary { op, operand } => {
            sb.push_str(match op {
                UnaryOp::Minus => "-",
                UnaryOp::Not => "!",
            });
            append_child(sb, operand, 90, true);
        }
        Expr::Call { callee, args } => {
            append_child(sb, callee, 100, false);
            sb.push('(');
            append_comma_separated(sb, args);
            sb.push(')');
        }
        Expr::Member { target, member } => {
            append_child(sb, target, 100, false);
            sb.push('.');
            sb.push_str(member.as_str());
        }
        Expr::Procedure { kind, params, body } => {
            append_procedure(sb, *kind, params, body, 0);
        }
    }
}

fn append_child(sb: &mut String, child: &Expr, parent_precedence: u8, is_right: bool) {
    let child_precedence = expr_precedence(child);
    let brackets = if is_right {
        child_precedence <= parent_precedence
    } else {
        child_precedence < parent_precedence
    };
    if brackets {
        sb.push('(');
        append_expr(sb, child);
        sb.push(')');
    } else {
        append_expr(sb, child);
    }
}

fn append_comma_separated(sb: &mut String, exprs: &[Expr]) {
    let mut first = true;
    for expr in exprs {
        if !first {
            sb.push_str(", ");
        }
        first = false;
        append_expr(sb, expr);
    }
}

fn append_literal(sb: &mut String, lit: &Literal) {
    match lit {
        Literal::Om => sb.push_str("om"),
        Literal::Bool(true) => sb.push_str("true"),
        Literal::Bool(false) => sb.push_str("false"),
        Literal::Int(n) => sb.push_str(&n.to_string()),
        Literal::Real(r) => append_real(sb, r.0),
        Literal::Str(s) => {
            sb.push('"');
            for c in s.chars() {
                match c {
                    '"' => sb.push_str("\\\""),
                    '\\' => sb.push_str("\\\\"),
                    '\n' => sb.push_str("\\n"),
                    '\t' => sb.push_str("\\t"),
                    other => sb.push(other),
                }
            }
            sb.push('"');
        }
    }
}

/// Reals always render with a decimal point so they re-parse as reals.
pub fn append_real(sb: &mut String, r: f64) {
    if r.is_finite() && r == r.trunc() && r.abs() < 1e15 {
        sb.push_str(&format!("{r:.1}"));
    } else {
        sb.push_str(&r.to_string());
    }
}

/// Append a procedure literal.
///
/// Lambdas with the canonical single-return body use the compact arrow form;
/// anything else renders as a bracketed parameter list and block.
pub fn append_procedure(
    sb: &mut String,
    kind: ProcedureKind,
    params: &[crate::ast::Param],
    body: &Block,
    tabs: usize,
) {
    if kind == ProcedureKind::Lambda {
        if let Some(expr) = lambda_expr(body) {
            if params.len() == 1 {
                sb.push_str(params[0].name.as_str());
            } else {
                sb.push('[');
                append_params(sb, params);
                sb.push(']');
            }
            sb.push_str(" |-> ");
            append_expr(sb, expr);
            return;
        }
    }
    sb.push_str(match kind {
        ProcedureKind::Closure => "closure(",
        _ => "procedure(",
    });
    append_params(sb, params);
    sb.push_str(") ");
    append_block(sb, body, tabs);
}

fn append_params(sb: &mut String, params: &[crate::ast::Param]) {
    let mut first = true;
    for param in params {
        if !first {
            sb.push_str(", ");
        }
        first = false;
        sb.push_str(&param.to_string());
    }
}

/// The single returned expression of a canonical lambda body, if the body
/// has that shape.
pub fn lambda_expr(body: &Block) -> Option<&Expr> {
    match body.statements.as_slice() {
        [Stmt::Return(Some(expr))] => Some(expr),
        _ => None,
    }
}

/// Append `block` as `{ ... }` with its statements indented one level
/// deeper than `tabs`.
pub fn append_block(sb: &mut String, block: &Block, tabs: usize) {
    sb.push('{');
    for stmt in &block.statements {
        sb.push('\n');
        append_stmt(sb, stmt, tabs + 1);
    }
    sb.push('\n');
    indent(sb, tabs);
    sb.push('}');
}

/// Append the source form of `stmt` at indentation depth `tabs`.
pub fn append_stmt(sb: &mut String, stmt: &Stmt, tabs: usize) {
    indent(sb, tabs);
    match stmt {
        Stmt::Expression(e) => {
            append_expr(sb, e);
            sb.push(';');
        }
        Stmt::Assignment { target, value } => {
            append_expr(sb, target);
            sb.push_str(" := ");
            append_expr(sb, value);
            sb.push(';');
        }
        Stmt::Return(None) => sb.push_str("return;"),
        Stmt::Return(Some(e)) => {
            sb.push_str("return ");
            append_expr(sb, e);
            sb.push(';');
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            sb.push_str("if (");
            append_expr(sb, condition);
            sb.push_str(") ");
            append_block(sb, then_branch, tabs);
            if let Some(else_branch) = else_branch {
                sb.push_str(" else ");
                append_block(sb, else_branch, tabs);
            }
        }
        Stmt::While { condition, body } => {
            sb.push_str("while (");
            append_expr(sb, condition);
            sb.push_str(") ");
            append_block(sb, body, tabs);
        }
        Stmt::For {
            variable,
            collection,
            body,
        } => {
            sb.push_str("for (");
            sb.push_str(variable.as_str());
            sb.push_str(" in ");
            append_expr(sb, collection);
            sb.push_str(") ");
            append_block(sb, body, tabs);
        }
        Stmt::TryCatch { attempt, branches } => {
            sb.push_str("try ");
            append_block(sb, attempt, tabs);
            for branch in branches {
                sb.push_str(match branch.kind {
                    CatchKind::Any => " catch (",
                    CatchKind::User => " catchUsr (",
                    CatchKind::Language => " catchLng (",
                });
                sb.push_str(branch.error_var.as_str());
                sb.push_str(") ");
                append_block(sb, &branch.recovery, tabs);
            }
        }
        Stmt::Break => sb.push_str("break;"),
        Stmt::Continue => sb.push_str("continue;"),
        Stmt::Throw(e) => {
            sb.push_str("throw(");
            append_expr(sb, e);
            sb.push_str(");");
        }
        Stmt::Global(id) => {
            sb.push_str("global ");
            sb.push_str(id.as_str());
            sb.push(';');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Param;
    use crate::Ident;
    use std::rc::Rc;

    fn var(s: &str) -> Expr {
        Expr::Variable(Ident::new(s))
    }

    fn int(n: i64) -> Expr {
        Expr::Literal(Literal::Int(n))
    }

    fn bin(op: BinaryOp, l: Expr, r: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Rc::new(l),
            right: Rc::new(r),
        }
    }

    #[test]
    fn precedence_brackets() {
        // (a + b) * c keeps its brackets, a + b * c does not gain any.
        let e = bin(
            BinaryOp::Product,
            bin(BinaryOp::Sum, var("a"), var("b")),
            var("c"),
        );
        assert_eq!(e.to_source(), "(a + b) * c");

        let e = bin(
            BinaryOp::Sum,
            var("a"),
            bin(BinaryOp::Product, var("b"), var("c")),
        );
        assert_eq!(e.to_source(), "a + b * c");
    }

    #[test]
    fn right_child_at_equal_precedence_keeps_brackets() {
        let e = bin(
            BinaryOp::Difference,
            var("a"),
            bin(BinaryOp::Difference, var("b"), var("c")),
        );
        assert_eq!(e.to_source(), "a - (b - c)");
    }

    #[test]
    fn assignment_statement() {
        let stmt = Stmt::Assignment {
            target: var("x"),
            value: int(1),
        };
        assert_eq!(stmt.to_source(0), "x := 1;");
    }

    #[test]
    fn lambda_arrow_form() {
        let body = Block::new(vec![Stmt::Return(Some(bin(
            BinaryOp::Product,
            var("x"),
            int(2),
        )))]);
        let mut sb = String::new();
        append_procedure(
            &mut sb,
            ProcedureKind::Lambda,
            &[Param::by_value(Ident::new("x"))],
            &body,
            0,
        );
        assert_eq!(sb, "x |-> x * 2");
    }

    #[test]
    fn reals_render_with_decimal_point() {
        let mut sb = String::new();
        append_real(&mut sb, 2.0);
        assert_eq!(sb, "2.0");
    }

    #[test]
    fn string_escapes() {
        let e = Expr::Literal(Literal::Str("a\"b".to_string()));
        assert_eq!(e.to_source(), "\"a\\\"b\"");
    }
}
