//! The pre-defined function library.
//!
//! Every function is a struct implementing
//! [`zet_rt::builtin::PreDefinedFunction`], registered once at start-up
//! under its user-visible name. The variable-read path resolves against
//! the registries and memoizes the outcome into the initial frame, so a
//! program pays the registry lookup once per name.

mod collections;
mod io;
mod math;
mod values;

use std::sync::Once;

use zet_rt::builtin::{register_math, register_pre_defined, PreDefinedFunction};

static INSTALL: Once = Once::new();

/// Register the whole library. Idempotent; every `State` construction
/// calls it.
pub fn install() {
    INSTALL.call_once(|| {
        register_pre_defined(leak(collections::PdFrom::new()));
        register_pre_defined(leak(collections::PdFromB::new()));
        register_pre_defined(leak(collections::PdFromE::new()));
        register_pre_defined(leak(collections::PdArb::new()));
        register_pre_defined(leak(io::PdPrint::new()));
        register_pre_defined(leak(values::PdAbs::new()));
        register_pre_defined(leak(values::PdIsProcedure::new()));

        for function in math::host_functions() {
            register_math(leak(function));
        }
    });
}

fn leak<F: PreDefinedFunction + 'static>(function: F) -> &'static dyn PreDefinedFunction {
    Box::leak(Box::new(function))
}
