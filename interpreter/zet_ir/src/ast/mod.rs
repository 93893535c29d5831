//! Syntax trees for the Zet interpreter.
//!
//! The trees are plain data: evaluation, assignment, and term conversion all
//! live in the runtime crates. Every node derives a total order (`Ord`) so
//! that procedure values, which own their bodies, can be compared
//! structurally; variant order follows declaration order and real literals
//! go through [`expr::R64`] to keep the order total.

mod expr;
mod stmt;

pub use expr::{BinaryOp, Expr, Literal, ProcedureKind, R64, UnaryOp};
pub use stmt::{Block, CatchBranch, CatchKind, Stmt};

use std::fmt;

use crate::Ident;

/// How a parameter receives its argument.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamMode {
    /// The parameter receives a deep clone of the argument value.
    Value,
    /// The parameter receives the argument directly and its post-call value
    /// is written back to the caller's corresponding l-value.
    ReadWrite,
}

/// A named procedure parameter and its binding mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: Ident,
    pub mode: ParamMode,
}

impl Param {
    /// A by-value parameter.
    pub fn by_value(name: Ident) -> Param {
        Param {
            name,
            mode: ParamMode::Value,
        }
    }

    /// A read-write parameter (`rw x`).
    pub fn read_write(name: Ident) -> Param {
        Param {
            name,
            mode: ParamMode::ReadWrite,
        }
    }
}

impl PartialOrd for Param {
    fn partial_cmp(&self, other: &Param) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Param {
    fn cmp(&self, other: &Param) -> std::cmp::Ordering {
        // Mode rank first, then name, matching the order used for procedures.
        self.mode
            .cmp(&other.mode)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            ParamMode::Value => write!(f, "{}", self.name),
            ParamMode::ReadWrite => write!(f, "rw {}", self.name),
        }
    }
}
