//! Statement trees.

use std::fmt;

use crate::ast::Expr;
use crate::render;
use crate::Ident;

/// Which errors a catch branch recovers from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CatchKind {
    /// `catch`: user-thrown and language errors alike.
    Any,
    /// `catchUsr`: only errors thrown from user code.
    User,
    /// `catchLng`: only errors raised by the interpreter itself.
    Language,
}

/// One catch branch of a try statement.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CatchBranch {
    pub kind: CatchKind,
    /// Variable the caught error is bound to inside the recovery block.
    pub error_var: Ident,
    pub recovery: Block,
}

/// Statement node.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stmt {
    /// Expression evaluated for its effect.
    Expression(Expr),
    /// `target := value;`
    Assignment { target: Expr, value: Expr },
    /// `return;` / `return e;`
    Return(Option<Expr>),
    If {
        condition: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    While {
        condition: Expr,
        body: Block,
    },
    /// `for (variable in collection) { body }` - the body runs in an
    /// iterator block whose iteration variable is local while every other
    /// store writes through to the enclosing scope.
    For {
        variable: Ident,
        collection: Expr,
        body: Block,
    },
    /// `break;`
    Break,
    /// `continue;`
    Continue,
    TryCatch {
        attempt: Block,
        branches: Vec<CatchBranch>,
    },
    /// `throw(e);`
    Throw(Expr),
    /// `global x;` - promote `x` into the global frame.
    Global(Ident),
}

/// Sequence of statements forming a procedure body or branch.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

impl Block {
    pub fn new(statements: Vec<Stmt>) -> Block {
        Block { statements }
    }

    /// Render to source form at the given indentation depth, with braces.
    pub fn to_source(&self, tabs: usize) -> String {
        let mut out = String::new();
        render::append_block(&mut out, self, tabs);
        out
    }
}

impl Stmt {
    pub fn to_source(&self, tabs: usize) -> String {
        let mut out = String::new();
        render::append_stmt(&mut out, self, tabs);
        out
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source(0))
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source(0))
    }
}
