//! Total ordering over values.
//!
//! Values of different variants order by a fixed variant rank; values of
//! the same variant order structurally, lexicographic on their children.
//! All three numeric variants share one rank and compare by exact numeric
//! value, so `1`, `1/1` and `1.0` are one point in the order.
//!
//! Reals are mapped onto an exact key (`-inf < finite rationals < +inf <
//! nan`) rather than compared bitwise; this keeps the order transitive
//! across mixed int/rational/real comparisons (`-0.0` equals `0`, every
//! nan collapses onto one point).

use std::cmp::Ordering;

use num_rational::BigRational;

use crate::value::Value;

/// Variant rank deciding heterogeneous comparisons.
fn ordering_rank(v: &Value) -> u8 {
    match v {
        Value::Om => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Rational(_) | Value::Real(_) => 2,
        Value::Str(_) => 3,
        Value::List(_) => 4,
        Value::Set(_) => 5,
        Value::Tuple(_) => 6,
        Value::Map(_) => 7,
        Value::Term(_) => 8,
        Value::Procedure(_) => 9,
        Value::Builtin(_) => 10,
        Value::ScopeRef(_) => 11,
        Value::Object(_) => 12,
    }
}

/// Exact comparison key for one number.
enum NumKey {
    NegInf,
    Finite(BigRational),
    PosInf,
    Nan,
}

fn num_key(v: &Value) -> NumKey {
    match v {
        Value::Int(n) => NumKey::Finite(BigRational::from_integer(n.as_ref().clone())),
        Value::Rational(r) => NumKey::Finite(r.as_ref().clone()),
        Value::Real(r) => {
            if r.is_nan() {
                NumKey::Nan
            } else if *r == f64::INFINITY {
                NumKey::PosInf
            } else if *r == f64::NEG_INFINITY {
                NumKey::NegInf
            } else {
                // Finite f64 converts to a rational exactly.
                match BigRational::from_float(*r) {
                    Some(q) => NumKey::Finite(q),
                    None => NumKey::Nan,
                }
            }
        }
        _ => NumKey::Nan,
    }
}

fn num_rank(k: &NumKey) -> u8 {
    match k {
        NumKey::NegInf => 0,
        NumKey::Finite(_) => 1,
        NumKey::PosInf => 2,
        NumKey::Nan => 3,
    }
}

fn compare_numeric(a: &Value, b: &Value) -> Ordering {
    // Fast paths for the homogeneous cases.
    if let (Value::Int(x), Value::Int(y)) = (a, b) {
        return x.cmp(y);
    }
    if let (Value::Real(x), Value::Real(y)) = (a, b) {
        if let Some(ord) = x.partial_cmp(y) {
            return ord;
        }
    }
    let (ka, kb) = (num_key(a), num_key(b));
    match (&ka, &kb) {
        (NumKey::Finite(x), NumKey::Finite(y)) => x.cmp(y),
        _ => num_rank(&ka).cmp(&num_rank(&kb)),
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Value) -> Ordering {
        let (ra, rb) = (ordering_rank(self), ordering_rank(other));
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (Value::Om, Value::Om) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
                a.iter().cmp(b.iter())
            }
            (Value::Set(a), Value::Set(b)) => a.iter().cmp(b.iter()),
            (Value::Map(a), Value::Map(b)) => a.iter().cmp(b.iter()),
            (Value::Term(a), Value::Term(b)) => a.cmp(b),
            (Value::Procedure(a), Value::Procedure(b)) => a.cmp_structural(b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name().cmp(b.name()),
            (Value::ScopeRef(a), Value::ScopeRef(b)) => a.addr().cmp(&b.addr()),
            (Value::Object(a), Value::Object(b)) => a.cmp_structural(b),
            // Same rank, mixed variants: the numeric tower.
            (a, b) => compare_numeric(a, b),
        }
    }
}

impl PartialOrd for Value {
    #[inline]
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    #[inline]
    fn eq(&self, other: &Value) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn variant_ranks_decide_heterogeneous_order() {
        assert!(Value::Om < Value::Bool(false));
        assert!(Value::Bool(true) < Value::int(0));
        assert!(Value::int(999) < Value::string(""));
        assert!(Value::string("z") < Value::list(vec![]));
    }

    #[test]
    fn antisymmetry() {
        let samples = [
            Value::Om,
            Value::Bool(true),
            Value::int(-3),
            Value::rational(BigRational::new(BigInt::from(1), BigInt::from(3))),
            Value::real(2.5),
            Value::string("abc"),
            Value::list(vec![Value::int(1)]),
            Value::set(vec![Value::int(2)]),
        ];
        for a in &samples {
            for b in &samples {
                assert_eq!(a.cmp(b), b.cmp(a).reverse());
                assert_eq!(a.cmp(b) == Ordering::Equal, a == b);
            }
        }
    }

    #[test]
    fn numeric_tower_compares_by_value() {
        assert_eq!(Value::int(1), Value::real(1.0));
        assert!(Value::int(1) < Value::real(1.5));
        assert!(Value::real(0.5) < Value::int(1));
        assert_eq!(
            Value::rational(BigRational::new(BigInt::from(1), BigInt::from(2))),
            Value::real(0.5)
        );
    }

    #[test]
    fn negative_zero_equals_zero() {
        assert_eq!(Value::real(-0.0), Value::real(0.0));
        assert_eq!(Value::real(-0.0), Value::int(0));
    }

    #[test]
    fn nan_is_one_point_above_infinity() {
        assert!(Value::real(f64::INFINITY) < Value::real(f64::NAN));
        assert_eq!(Value::real(f64::NAN), Value::real(-f64::NAN));
        assert!(Value::int(i64::MAX) < Value::real(f64::INFINITY));
        assert!(Value::real(f64::NEG_INFINITY) < Value::int(i64::MIN));
    }

    #[test]
    fn lists_compare_lexicographically() {
        let a = Value::list(vec![Value::int(1), Value::int(2)]);
        let b = Value::list(vec![Value::int(1), Value::int(3)]);
        let c = Value::list(vec![Value::int(1)]);
        assert!(a < b);
        assert!(c < a);
    }
}
