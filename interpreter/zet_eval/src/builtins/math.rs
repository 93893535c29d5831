//! Host math routines.
//!
//! One wrapper type adapts a unary `f64` function of the host library to
//! the pre-defined interface. The routines resolve for all-lower-case
//! names only and live in their own registry, so a user variable named
//! `Sin` never collides and `sin` can still be shadowed locally.

use zet_ir::{Ident, Param};
use zet_rt::builtin::PreDefinedFunction;
use zet_rt::errors::incompatible_type;
use zet_rt::{EvalResult, PrintHandler, Value};

/// A unary host math routine exposed to the language.
pub struct MathFunction {
    name: &'static str,
    params: Vec<Param>,
    function: fn(f64) -> f64,
}

impl MathFunction {
    fn new(name: &'static str, function: fn(f64) -> f64) -> MathFunction {
        MathFunction {
            name,
            params: vec![Param::by_value(Ident::new("x"))],
            function,
        }
    }
}

impl PreDefinedFunction for MathFunction {
    fn name(&self) -> &'static str {
        self.name
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
        let x = args[0]
            .to_f64()
            .ok_or_else(|| incompatible_type(format!("'{}' is not a number", args[0])))?;
        Ok(Value::real((self.function)(x)))
    }

    fn is_math(&self) -> bool {
        true
    }
}

/// The full routine table.
pub fn host_functions() -> Vec<MathFunction> {
    let table: &[(&'static str, fn(f64) -> f64)] = &[
        ("sin", f64::sin),
        ("cos", f64::cos),
        ("tan", f64::tan),
        ("asin", f64::asin),
        ("acos", f64::acos),
        ("atan", f64::atan),
        ("sinh", f64::sinh),
        ("cosh", f64::cosh),
        ("tanh", f64::tanh),
        ("exp", f64::exp),
        ("log", f64::ln),
        ("sqrt", f64::sqrt),
        ("cbrt", f64::cbrt),
        ("floor", f64::floor),
        ("ceil", f64::ceil),
        ("round", f64::round),
    ];
    table
        .iter()
        .map(|(name, function)| MathFunction::new(name, *function))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use zet_rt::print::StdoutPrintHandler;

    #[test]
    fn routines_compute_on_the_numeric_tower() {
        let sqrt = MathFunction::new("sqrt", f64::sqrt);
        let mut wb = Vec::new();
        assert_eq!(
            sqrt.execute(vec![Value::int(9)], &mut wb, &StdoutPrintHandler)
                .unwrap(),
            Value::real(3.0)
        );
        assert!(sqrt
            .execute(vec![Value::string("x")], &mut wb, &StdoutPrintHandler)
            .is_err());
    }

    #[test]
    fn table_is_math_flagged() {
        for f in host_functions() {
            assert!(f.is_math());
        }
    }
}
