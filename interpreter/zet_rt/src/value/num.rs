//! Arithmetic over the numeric tower, plus the operator overloads the
//! driver needs on containers and strings.
//!
//! Exactness is preserved as long as possible: integer division yields an
//! exact rational (normalizing back to an integer when it divides evenly),
//! and a real on either side demotes the whole operation to `f64`.

use std::rc::Rc;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::errors::{incompatible_type, undefined_operation, EvalResult};
use crate::value::Value;

impl Value {
    /// Approximate `f64` view of a numeric value.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => n.to_f64(),
            Value::Rational(r) => r.to_f64(),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Rational(_) | Value::Real(_))
    }

    fn is_zero_number(&self) -> bool {
        match self {
            Value::Int(n) => n.is_zero(),
            Value::Rational(r) => r.is_zero(),
            Value::Real(r) => *r == 0.0,
            _ => false,
        }
    }

    /// `self + other`: numeric addition, string concatenation, list/tuple
    /// concatenation, set union.
    pub fn add(&self, other: &Value) -> EvalResult {
        // A string on either side concatenates the printed forms.
        if matches!(self, Value::Str(_)) || matches!(other, Value::Str(_)) {
            return Ok(Value::string(format!(
                "{}{}",
                self.display_unquoted(),
                other.display_unquoted()
            )));
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::int_big(a.as_ref() + b.as_ref())),
            (a, b) if a.is_numeric() && b.is_numeric() => match (rational_of(a), rational_of(b)) {
                (Some(ra), Some(rb)) => Ok(Value::rational(ra + rb)),
                _ => real_binary(a, b, |x, y| x + y),
            },
            (Value::List(a), Value::List(b)) => {
                let mut items = a.as_ref().clone();
                items.extend(b.iter().cloned());
                Ok(Value::list(items))
            }
            (Value::Tuple(a), Value::Tuple(b)) => {
                let mut items = a.as_ref().clone();
                items.extend(b.iter().cloned());
                Ok(Value::tuple(items))
            }
            (Value::Set(a), Value::Set(b)) => {
                let mut items = a.as_ref().clone();
                items.extend(b.iter().cloned());
                Ok(Value::Set(Rc::new(items)))
            }
            (a, b) => Err(incompatible_type(format!("'{a} + {b}' is undefined"))),
        }
    }

    /// `self - other`: numeric subtraction or set difference.
    pub fn subtract(&self, other: &Value) -> EvalResult {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::int_big(a.as_ref() - b.as_ref())),
            (a, b) if a.is_numeric() && b.is_numeric() => match (rational_of(a), rational_of(b)) {
                (Some(ra), Some(rb)) => Ok(Value::rational(ra - rb)),
                _ => real_binary(a, b, |x, y| x - y),
            },
            (Value::Set(a), Value::Set(b)) => {
                let difference = a.iter().filter(|m| !b.contains(*m)).cloned();
                Ok(Value::set(difference))
            }
            (a, b) => Err(incompatible_type(format!("'{a} - {b}' is undefined"))),
        }
    }

    /// `self * other`: numeric multiplication or string repetition.
    pub fn multiply(&self, other: &Value) -> EvalResult {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::int_big(a.as_ref() * b.as_ref())),
            (a, b) if a.is_numeric() && b.is_numeric() => match (rational_of(a), rational_of(b)) {
                (Some(ra), Some(rb)) => Ok(Value::rational(ra * rb)),
                _ => real_binary(a, b, |x, y| x * y),
            },
            (Value::Str(s), Value::Int(n)) => {
                if n.is_negative() {
                    return Err(undefined_operation(format!(
                        "'{self} * {other}' is undefined"
                    )));
                }
                let count = n.to_usize().ok_or_else(|| {
                    undefined_operation(format!("'{self} * {other}' is undefined"))
                })?;
                Ok(Value::string(s.repeat(count)))
            }
            (a, b) => Err(incompatible_type(format!("'{a} * {b}' is undefined"))),
        }
    }

    /// `self / other`: exact division; integer by integer yields a rational.
    pub fn divide(&self, other: &Value) -> EvalResult {
        if !self.is_numeric() || !other.is_numeric() {
            return Err(incompatible_type(format!(
                "'{self} / {other}' is undefined"
            )));
        }
        if other.is_zero_number() {
            return Err(undefined_operation(format!("'{self}/0' is undefined")));
        }
        match (rational_of(self), rational_of(other)) {
            (Some(ra), Some(rb)) => Ok(Value::rational(ra / rb)),
            _ => real_binary(self, other, |x, y| x / y),
        }
    }

    /// `self % other`: integer remainder, sign of the dividend.
    pub fn modulo(&self, other: &Value) -> EvalResult {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => {
                if b.is_zero() {
                    return Err(undefined_operation(format!("'{self} % 0' is undefined")));
                }
                Ok(Value::int_big(a.as_ref() % b.as_ref()))
            }
            (a, b) => Err(incompatible_type(format!("'{a} % {b}' is undefined"))),
        }
    }

    /// `-self`.
    pub fn negate(&self) -> EvalResult {
        match self {
            Value::Int(n) => Ok(Value::int_big(-n.as_ref().clone())),
            Value::Rational(r) => Ok(Value::rational(-r.as_ref().clone())),
            Value::Real(r) => Ok(Value::real(-r)),
            other => Err(incompatible_type(format!("'-{other}' is undefined"))),
        }
    }
}

/// Exact rational view for `Int` and `Rational`; `None` for reals.
fn rational_of(v: &Value) -> Option<BigRational> {
    match v {
        Value::Int(n) => Some(BigRational::from_integer(n.as_ref().clone())),
        Value::Rational(r) => Some(r.as_ref().clone()),
        _ => None,
    }
}

fn real_binary(a: &Value, b: &Value, op: fn(f64, f64) -> f64) -> EvalResult {
    match (a.to_f64(), b.to_f64()) {
        (Some(x), Some(y)) => Ok(Value::real(op(x, y))),
        _ => Err(incompatible_type(format!("'{a}' is not a number"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_addition_stays_exact() {
        let big = Value::int(i64::MAX);
        let sum = big.add(&Value::int(1)).unwrap();
        assert_eq!(
            sum,
            Value::int_big(BigInt::from(i64::MAX) + BigInt::from(1))
        );
    }

    #[test]
    fn division_is_exact_and_normalizes() {
        let half = Value::int(1).divide(&Value::int(2)).unwrap();
        assert_eq!(half, Value::rational(BigRational::new(1.into(), 2.into())));
        let two = Value::int(4).divide(&Value::int(2)).unwrap();
        assert_eq!(two, Value::int(2));
    }

    #[test]
    fn division_by_zero_is_undefined_operation() {
        let err = Value::int(1).divide(&Value::int(0)).unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::errors::EvalErrorKind::UndefinedOperation
        ));
    }

    #[test]
    fn real_demotes_the_operation() {
        let v = Value::int(1).add(&Value::real(0.5)).unwrap();
        assert_eq!(v, Value::real(1.5));
    }

    #[test]
    fn rational_plus_int() {
        let half = Value::rational(BigRational::new(1.into(), 2.into()));
        assert_eq!(
            half.add(&half).unwrap(),
            Value::int(1),
        );
    }

    #[test]
    fn string_concatenation() {
        let v = Value::string("n = ").add(&Value::int(3)).unwrap();
        assert_eq!(v, Value::string("n = 3"));
    }

    #[test]
    fn list_concatenation_and_set_union() {
        let l = Value::list(vec![Value::int(1)])
            .add(&Value::list(vec![Value::int(2)]))
            .unwrap();
        assert_eq!(l, Value::list(vec![Value::int(1), Value::int(2)]));

        let s = Value::set(vec![Value::int(1)])
            .add(&Value::set(vec![Value::int(1), Value::int(2)]))
            .unwrap();
        assert_eq!(s.size().unwrap(), 2);
    }

    #[test]
    fn incompatible_operands_fail() {
        assert!(Value::Bool(true).add(&Value::int(1)).is_err());
        assert!(Value::int(1).modulo(&Value::real(2.0)).is_err());
    }
}
