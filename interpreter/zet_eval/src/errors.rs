//! Error constructors, re-exported from the runtime crate.
//!
//! A single import point so evaluator code can name every constructor as
//! `crate::errors::*` regardless of where it is defined.

pub use zet_rt::errors::{
    incompatible_type, language_error, malformed_term, stack_overflow, term_conversion, thrown,
    undefined_operation, EvalError, EvalErrorKind, EvalResult,
};
