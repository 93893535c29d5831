//! Zet RT - the runtime value model of the Zet interpreter.
//!
//! This crate owns everything a running program's data consists of:
//!
//! - `Value`: the tagged sum of atoms, containers, terms, procedures,
//!   reified scopes, and objects, with a total deterministic order
//! - `Scope`: the flag-parameterized frame chain searched during lookup
//! - `Procedure`: plain procedures, closures (with captured maps), lambdas
//! - `Term`: the canonical symbolic form, with the functional-character
//!   registry for converting terms back into values and code
//! - `EvalError`: the one error type every evaluation path returns
//!
//! The evaluator crate (`zet_eval`) drives these pieces; the syntax they
//! hang off lives in `zet_ir`.

pub mod builtin;
pub mod errors;
mod object;
pub mod param;
mod procedure;
pub mod print;
mod scope;
pub mod term;
mod value;

pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use object::ObjectValue;
pub use print::{
    buffer_handler, stdout_handler, BufferPrintHandler, PrintHandler, SharedPrintHandler,
    StdoutPrintHandler,
};
pub use procedure::Procedure;
pub use scope::{Lookup, Scope};
pub use term::Term;
pub use value::Value;
