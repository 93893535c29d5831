//! Pre-defined functions.
//!
//! Implementations live in the evaluator crate; this module owns the
//! interface they satisfy and the process-wide registries the variable-read
//! path resolves against. The registries replace reflective class-name
//! discovery: they are populated once at start-up, keyed by the
//! user-visible name, and guarded by a coarse mutex since writes stop after
//! installation.

use std::sync::LazyLock;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use zet_ir::Param;

use crate::errors::EvalResult;
use crate::print::PrintHandler;
use crate::value::Value;

/// A function the interpreter provides to every program.
///
/// Arguments arrive fully evaluated, cloned for by-value parameters. The
/// post-call values of read-write parameters are appended to `write_back`
/// in declaration order; the caller routes them to the argument l-values.
pub trait PreDefinedFunction: Sync {
    /// User-visible name the variable-read path resolves.
    fn name(&self) -> &'static str;

    /// Parameter descriptors, including binding modes.
    fn params(&self) -> &[Param];

    /// Execute with evaluated arguments.
    fn execute(
        &self,
        args: Vec<Value>,
        write_back: &mut Vec<Value>,
        print: &dyn PrintHandler,
    ) -> EvalResult;

    /// True for host math routines, which resolve for lower-case names
    /// only and serialize under their own functional character.
    fn is_math(&self) -> bool {
        false
    }
}

type Registry = Mutex<FxHashMap<&'static str, &'static dyn PreDefinedFunction>>;

static PRE_DEFINED: LazyLock<Registry> = LazyLock::new(|| Mutex::new(FxHashMap::default()));
static MATH: LazyLock<Registry> = LazyLock::new(|| Mutex::new(FxHashMap::default()));

/// Register a pre-defined function. Later registrations win, which lets
/// tests shadow a function.
pub fn register_pre_defined(function: &'static dyn PreDefinedFunction) {
    PRE_DEFINED.lock().insert(function.name(), function);
}

/// Register a host math routine.
pub fn register_math(function: &'static dyn PreDefinedFunction) {
    MATH.lock().insert(function.name(), function);
}

/// Resolve a pre-defined function by name.
pub fn pre_defined(name: &str) -> Option<&'static dyn PreDefinedFunction> {
    PRE_DEFINED.lock().get(name).copied()
}

/// Resolve a host math routine by name.
pub fn math_function(name: &str) -> Option<&'static dyn PreDefinedFunction> {
    MATH.lock().get(name).copied()
}

impl Value {
    /// Wrap a registered function as a value.
    #[inline]
    pub fn builtin(function: &'static dyn PreDefinedFunction) -> Value {
        Value::Builtin(function)
    }
}
