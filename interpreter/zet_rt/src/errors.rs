//! Evaluation errors.
//!
//! One error type flows through every evaluation path. The kind decides
//! which catch variant of the user language recovers from it: `catchUsr`
//! matches only [`EvalErrorKind::Thrown`], `catchLng` matches every other
//! catchable kind, and stack overflow is exempt from both. The trace
//! accumulates one line per frame on the way up and is rendered when an
//! error reaches the host unhandled.

use std::fmt;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// What went wrong, as far as selective catch is concerned.
#[derive(Clone, Debug)]
pub enum EvalErrorKind {
    /// Operation invoked on a value whose variant does not support it.
    IncompatibleType,
    /// Syntactically valid but semantically invalid conversion, e.g. an
    /// expression that cannot be made assignable.
    UndefinedOperation,
    /// Malformed term encountered during term conversion.
    TermConversion,
    /// Raised explicitly from the user language; carries the thrown value.
    Thrown(Value),
    /// Raised by the interpreter itself (resolution, type, parse errors).
    Language,
    /// Host stack exhaustion, annotated with the depth of the first
    /// overflowing call. Never catchable.
    StackOverflow(usize),
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    kind: EvalErrorKind,
    message: String,
    /// Frame strings accumulated while propagating, innermost first.
    trace: Vec<String>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, message: impl Into<String>) -> EvalError {
        EvalError {
            kind,
            message: message.into(),
            trace: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> &EvalErrorKind {
        &self.kind
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True for errors thrown from user code.
    pub fn is_user_thrown(&self) -> bool {
        matches!(self.kind, EvalErrorKind::Thrown(_))
    }

    /// True for every kind a catch branch may recover from. Stack overflow
    /// is re-raised past every handler.
    pub fn is_catchable(&self) -> bool {
        !matches!(self.kind, EvalErrorKind::StackOverflow(_))
    }

    /// The payload of a user-thrown error.
    pub fn thrown_payload(&self) -> Option<&Value> {
        match &self.kind {
            EvalErrorKind::Thrown(value) => Some(value),
            _ => None,
        }
    }

    /// Push one frame description onto the trace.
    pub fn add_to_trace(&mut self, frame: String) {
        self.trace.push(frame);
    }

    /// Render the message with the accumulated trace, innermost frame first.
    pub fn report(&self) -> String {
        let mut out = self.message.clone();
        for frame in &self.trace {
            out.push('\n');
            out.push_str(frame);
        }
        out
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// Error constructors. Cold: every call site is a failure path.

/// Operation not supported by the value's variant.
#[cold]
pub fn incompatible_type(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::IncompatibleType, message)
}

/// Conversion that is syntactically fine but semantically undefined.
#[cold]
pub fn undefined_operation(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::UndefinedOperation, message)
}

/// Malformed term during `from_term`.
#[cold]
pub fn term_conversion(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::TermConversion, message)
}

/// Malformed term with the conventional message for a bad `tag` body.
#[cold]
pub fn malformed_term(tag: &str) -> EvalError {
    term_conversion(format!("malformed {tag}"))
}

/// Error raised by the interpreter itself.
#[cold]
pub fn language_error(message: impl Into<String>) -> EvalError {
    EvalError::new(EvalErrorKind::Language, message)
}

/// Error thrown from the user language.
#[cold]
pub fn thrown(value: Value) -> EvalError {
    let message = format!("uncaught user exception: {value}");
    EvalError::new(EvalErrorKind::Thrown(value), message)
}

/// Host stack exhaustion at `depth`.
#[cold]
pub fn stack_overflow(depth: usize) -> EvalError {
    EvalError::new(
        EvalErrorKind::StackOverflow(depth),
        format!("stack overflow at call depth {depth}"),
    )
}
