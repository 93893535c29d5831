//! Value inspection helpers.

use zet_ir::{Ident, Param};
use zet_rt::builtin::PreDefinedFunction;
use zet_rt::errors::incompatible_type;
use zet_rt::{EvalResult, PrintHandler, Value};

/// `abs(value)`: absolute value of a number.
pub struct PdAbs {
    params: Vec<Param>,
}

impl PdAbs {
    pub fn new() -> PdAbs {
        PdAbs {
            params: vec![Param::by_value(Ident::new("value"))],
        }
    }
}

impl PreDefinedFunction for PdAbs {
    fn name(&self) -> &'static str {
        "abs"
    }

    fn params(&self) -> &[Param] {
        &self.params
    }

    fn execute(
        &self,
        args: Vec<Value>,
        _write_back: &mut Vec<Value>,
        _print: &dyn PrintHandler,
    ) -> EvalResult {
        match &args[0] {
            Value::Int(n) => Ok(Value::int_big(num_traits::Signed::abs(n.as_ref()))),
            Value::Rational(r) => Ok(Value::rational(num_traits::Signed::abs(r.as_ref()))),
            Value::Real(r) => Ok(Value::real(r.abs())),
            other => Err(incompatible_type(format!("'{other}' is not a number"))),
        }
    }
}

/// `isProcedure(value)`: whether the value is callable.
pub struct PdIsProcedure {
    params: Vec<Param>,
}

impl PdIsProcedure {
    pub fn new() -> PdIsProcedure {
        PdIsProcedure {
            params: vec![Param::by_value(Ident::new("value"))],
        }
    }
}

impl PreDefinedFunction for PdIsProcedure {
    fn name(&self) -> &'static str {
        "isProcedure"
    }

    fn params(&self) -> &[Param] {
        &self.params
    }

    fn execute(
        &self,
        args: Vec<Value>,
        _write_back: &mut Vec<Value>,
        _print: &dyn PrintHandler,
    ) -> EvalResult {
        Ok(Value::Bool(args[0].is_procedure_value()))
    }
}
