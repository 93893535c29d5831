//! Zet Eval - the tree-walking evaluator of the Zet interpreter.
//!
//! # Architecture
//!
//! - [`State`]: one execution context - the active scope, the global and
//!   initial frames, call-depth tracking, and the output channel
//! - `exec`: statement and expression walking; statements return a
//!   return-or-error sum so `return` needs no unwinding
//! - `exec::call`: the procedure call protocol, including closure capture
//!   realization and read-write write-back
//! - `builtins`: the pre-defined function library and host math routines,
//!   registered at start-up and resolved through the variable-read path
//!
//! Value types come from `zet_rt` and are re-exported for convenience.

pub mod builtins;
pub mod errors;
pub mod exec;
mod stack;
mod state;

pub use stack::ensure_sufficient_stack;
pub use state::State;

// Re-export the runtime value types.
pub use zet_rt::{
    buffer_handler, stdout_handler, BufferPrintHandler, EvalError, EvalErrorKind, EvalResult,
    Lookup, ObjectValue, PrintHandler, Procedure, Scope, SharedPrintHandler, StdoutPrintHandler,
    Term, Value,
};
