//! Zet IR - identifiers and syntax trees for the Zet interpreter.
//!
//! This crate holds the data the evaluator walks but contains no evaluation
//! logic itself:
//!
//! - `Ident`: interned identifiers with identity equality
//! - `ast`: statement and expression trees, parameters, operator enums
//! - `vars`: bound/unbound/used classification of identifiers in a body
//! - `render`: source-form rendering backing the `Display` impls

pub mod ast;
mod ident;
pub mod render;
pub mod vars;

pub use ast::{
    BinaryOp, Block, CatchBranch, CatchKind, Expr, Literal, Param, ParamMode, ProcedureKind, R64,
    Stmt, UnaryOp,
};
pub use ident::Ident;
