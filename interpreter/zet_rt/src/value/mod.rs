//! Runtime values for the Zet interpreter.
//!
//! `Value` is a tagged sum over atoms (om, booleans, exact integers and
//! rationals, reals, strings), containers (list, set, tuple, map), symbolic
//! terms, procedures, reified live scopes, and objects.
//!
//! # Value semantics
//!
//! Payloads sit behind `Rc`, so handle clones are cheap and mutation goes
//! through `Rc::make_mut` (copy-on-write). The language's copy-out semantics
//! are implemented by [`Value::clone_deep`]: containers clone their members
//! recursively, closures get an independently owned captured map, and
//! immutable values (atoms, plain procedures) alias.
//!
//! # Total order
//!
//! `Ord` is implemented in `cmp.rs` and is total and deterministic: values
//! of different variants order by variant rank, values of the same variant
//! structurally. Sets and maps are `BTreeSet`/`BTreeMap` keyed by that
//! order.

mod cmp;
mod display;
mod num;

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::builtin::PreDefinedFunction;
use crate::errors::{incompatible_type, EvalResult};
use crate::object::ObjectValue;
use crate::procedure::Procedure;
use crate::scope::Scope;
use crate::term::Term;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    /// The undefined value.
    Om,
    Bool(bool),
    /// Arbitrary-precision integer.
    Int(Rc<BigInt>),
    /// Exact non-integral rational; integral results normalize to `Int`.
    Rational(Rc<BigRational>),
    Real(f64),
    Str(Rc<String>),
    List(Rc<Vec<Value>>),
    Set(Rc<BTreeSet<Value>>),
    Tuple(Rc<Vec<Value>>),
    Map(Rc<BTreeMap<Value, Value>>),
    /// Symbolic term.
    Term(Rc<Term>),
    /// User-defined procedure, closure, or lambda.
    Procedure(Rc<Procedure>),
    /// Pre-defined function or host math routine.
    Builtin(&'static dyn PreDefinedFunction),
    /// Live scope, reified as a value.
    ScopeRef(Scope),
    Object(ObjectValue),
}

// Factory methods.

impl Value {
    /// Integer value from a machine integer.
    #[inline]
    pub fn int(n: i64) -> Value {
        Value::Int(Rc::new(BigInt::from(n)))
    }

    /// Integer value from a big integer.
    #[inline]
    pub fn int_big(n: BigInt) -> Value {
        Value::Int(Rc::new(n))
    }

    /// Rational value, normalized: integral rationals become `Int`.
    pub fn rational(r: BigRational) -> Value {
        if r.is_integer() {
            Value::int_big(r.to_integer())
        } else {
            Value::Rational(Rc::new(r))
        }
    }

    /// Real value.
    #[inline]
    pub fn real(r: f64) -> Value {
        Value::Real(r)
    }

    /// String value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Value {
        Value::Str(Rc::new(s.into()))
    }

    /// List value.
    #[inline]
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    /// Set value from any iterable of members.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Value {
        Value::Set(Rc::new(items.into_iter().collect()))
    }

    /// Tuple value.
    #[inline]
    pub fn tuple(items: Vec<Value>) -> Value {
        Value::Tuple(Rc::new(items))
    }

    /// Map value.
    #[inline]
    pub fn map(entries: BTreeMap<Value, Value>) -> Value {
        Value::Map(Rc::new(entries))
    }

    /// Term value.
    #[inline]
    pub fn term(term: Term) -> Value {
        Value::Term(Rc::new(term))
    }

    /// Procedure value.
    #[inline]
    pub fn procedure(procedure: Procedure) -> Value {
        Value::Procedure(Rc::new(procedure))
    }
}

// Classification and conversions.

impl Value {
    /// Variant name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Om => "om",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Rational(_) => "rational",
            Value::Real(_) => "real",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
            Value::Term(_) => "term",
            Value::Procedure(_) => "procedure",
            Value::Builtin(_) => "procedure",
            Value::ScopeRef(_) => "scope",
            Value::Object(_) => "object",
        }
    }

    /// True for the undefined value.
    #[inline]
    pub fn is_om(&self) -> bool {
        matches!(self, Value::Om)
    }

    /// True for callable procedure values, user-defined or pre-defined.
    /// Functions-only scope traversal lets exactly these (and om) through.
    #[inline]
    pub fn is_procedure_value(&self) -> bool {
        matches!(self, Value::Procedure(_) | Value::Builtin(_))
    }

    /// Machine integer view of an `Int`, when it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => num_traits::ToPrimitive::to_i64(n.as_ref()),
            _ => None,
        }
    }

    /// Boolean view; anything but a boolean is an incompatible-type error.
    pub fn as_bool(&self) -> EvalResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(incompatible_type(format!(
                "'{other}' is not a boolean value"
            ))),
        }
    }
}

// Deep cloning.

impl Value {
    /// Structure-owning clone.
    ///
    /// Containers clone members recursively and closures get their own
    /// captured map. Atoms, plain procedures, pre-defined functions, live
    /// scopes, and objects alias: the first three are immutable, and the
    /// last two keep identity deliberately (a live scope *is* its frame; an
    /// object copy is taken where the language semantics demand one).
    pub fn clone_deep(&self) -> Value {
        match self {
            Value::Om
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Rational(_)
            | Value::Real(_)
            | Value::Str(_)
            | Value::Builtin(_)
            | Value::ScopeRef(_) => self.clone(),
            Value::List(items) => {
                Value::list(items.iter().map(Value::clone_deep).collect())
            }
            Value::Set(items) => Value::set(items.iter().map(Value::clone_deep)),
            Value::Tuple(items) => {
                Value::tuple(items.iter().map(Value::clone_deep).collect())
            }
            Value::Map(entries) => Value::map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone_deep(), v.clone_deep()))
                    .collect(),
            ),
            Value::Term(term) => Value::term(term.clone_deep()),
            Value::Procedure(p) => {
                if p.is_closure() {
                    Value::procedure(p.deep_copy())
                } else {
                    // Plain procedures and lambdas are immutable; aliasing
                    // is observationally equal to copying.
                    self.clone()
                }
            }
            Value::Object(obj) => Value::Object(obj.deep_copy()),
        }
    }
}

// Container operations.

impl Value {
    /// Number of members of a container. Fails for every other variant.
    pub fn size(&self) -> EvalResult<usize> {
        match self {
            Value::List(items) | Value::Tuple(items) => Ok(items.len()),
            Value::Set(items) => Ok(items.len()),
            Value::Map(entries) => Ok(entries.len()),
            other => Err(incompatible_type(format!(
                "'{other}' is not a collection value"
            ))),
        }
    }

    /// Remove and return the first member of a container.
    pub fn remove_first(&mut self) -> EvalResult<Value> {
        match self {
            Value::List(items) | Value::Tuple(items) => {
                if items.is_empty() {
                    return Ok(Value::Om);
                }
                Ok(Rc::make_mut(items).remove(0))
            }
            Value::Set(items) => Ok(Rc::make_mut(items).pop_first().unwrap_or(Value::Om)),
            Value::Map(entries) => Ok(match Rc::make_mut(entries).pop_first() {
                Some((k, v)) => Value::list(vec![k, v]),
                None => Value::Om,
            }),
            other => Err(incompatible_type(format!(
                "'{other}' is not a collection value"
            ))),
        }
    }

    /// Remove and return the last member of a container.
    pub fn remove_last(&mut self) -> EvalResult<Value> {
        match self {
            Value::List(items) | Value::Tuple(items) => {
                Ok(Rc::make_mut(items).pop().unwrap_or(Value::Om))
            }
            Value::Set(items) => Ok(Rc::make_mut(items).pop_last().unwrap_or(Value::Om)),
            Value::Map(entries) => Ok(match Rc::make_mut(entries).pop_last() {
                Some((k, v)) => Value::list(vec![k, v]),
                None => Value::Om,
            }),
            other => Err(incompatible_type(format!(
                "'{other}' is not a collection value"
            ))),
        }
    }

    /// Membership test: is `element` a member of this container (or a
    /// substring of this string)?
    pub fn contains(&self, element: &Value) -> EvalResult<bool> {
        match self {
            Value::List(items) | Value::Tuple(items) => {
                Ok(items.iter().any(|m| m == element))
            }
            Value::Set(items) => Ok(items.contains(element)),
            Value::Map(entries) => Ok(entries.contains_key(element)),
            Value::Str(s) => match element {
                Value::Str(needle) => Ok(s.contains(needle.as_str())),
                other => Err(incompatible_type(format!(
                    "'{other}' cannot be searched for in a string"
                ))),
            },
            other => Err(incompatible_type(format!(
                "'{other}' is not a collection value"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rational_normalizes_to_int() {
        let r = BigRational::new(BigInt::from(4), BigInt::from(2));
        assert_eq!(Value::rational(r), Value::int(2));
    }

    #[test]
    fn size_fails_for_atoms() {
        assert!(Value::int(1).size().is_err());
        assert!(Value::string("abc").size().is_err());
        assert_eq!(Value::list(vec![Value::int(1)]).size().unwrap(), 1);
    }

    #[test]
    fn remove_first_and_last() {
        let mut v = Value::list(vec![Value::int(1), Value::int(2), Value::int(3)]);
        assert_eq!(v.remove_first().unwrap(), Value::int(1));
        assert_eq!(v.remove_last().unwrap(), Value::int(3));
        assert_eq!(v.size().unwrap(), 1);
    }

    #[test]
    fn remove_on_empty_yields_om() {
        let mut v = Value::list(vec![]);
        assert_eq!(v.remove_first().unwrap(), Value::Om);
        assert_eq!(v.remove_last().unwrap(), Value::Om);
    }

    #[test]
    fn clone_deep_detaches_containers() {
        let original = Value::list(vec![Value::list(vec![Value::int(1)])]);
        let mut copy = original.clone_deep();
        copy.remove_first().unwrap();
        assert_eq!(original.size().unwrap(), 1);
        assert_eq!(copy.size().unwrap(), 0);
    }

    #[test]
    fn membership() {
        let set = Value::set(vec![Value::int(1), Value::int(2)]);
        assert!(set.contains(&Value::int(2)).unwrap());
        assert!(!set.contains(&Value::int(3)).unwrap());
        let s = Value::string("hello");
        assert!(s.contains(&Value::string("ell")).unwrap());
    }
}
