//! Value ⇄ term conversion.
//!
//! `to_term` is total over values; `from_term` is its inverse up to two
//! documented exceptions: live scopes do not rehydrate, and a round-tripped
//! closure comes back with a present-but-empty captured map (captured
//! bindings are never serialized).

use rustc_hash::FxHashMap;
use zet_ir::Ident;

use super::{code, registry, tags, Term};
use crate::builtin;
use crate::errors::{malformed_term, term_conversion, EvalResult};
use crate::object::ObjectValue;
use crate::scope::Scope;
use crate::value::Value;

impl Value {
    /// Canonical term form of this value.
    ///
    /// Atoms are their own term form; containers convert member-wise.
    /// `global` supplies the global frame a reified scope folds into its
    /// bindings set.
    pub fn to_term(&self, global: &Scope) -> EvalResult<Value> {
        match self {
            Value::Om
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Rational(_)
            | Value::Real(_)
            | Value::Str(_) => Ok(self.clone()),
            Value::List(items) => Ok(Value::list(to_term_all(items, global)?)),
            Value::Tuple(items) => Ok(Value::tuple(to_term_all(items, global)?)),
            Value::Set(items) => {
                let mut members = Vec::with_capacity(items.len());
                for item in items.iter() {
                    members.push(item.to_term(global)?);
                }
                Ok(Value::set(members))
            }
            Value::Map(entries) => {
                let mut converted = std::collections::BTreeMap::new();
                for (k, v) in entries.iter() {
                    converted.insert(k.to_term(global)?, v.to_term(global)?);
                }
                Ok(Value::map(converted))
            }
            Value::Term(term) => {
                let args = to_term_all(term.args(), global)?;
                Ok(Value::term(Term::new_internal(
                    term.functional().as_str(),
                    args,
                )))
            }
            Value::Procedure(p) => Ok(code::procedure_to_term(p)),
            Value::Builtin(b) => {
                let tag = if b.is_math() {
                    tags::MATH_FUNCTION
                } else {
                    tags::PRE_DEFINED_FUNCTION
                };
                Ok(Value::term(Term::new_internal(
                    tag,
                    vec![Value::string(b.name())],
                )))
            }
            Value::ScopeRef(scope) => Ok(Value::term(scope.to_term(global)?)),
            Value::Object(obj) => {
                let mut members = Vec::new();
                for (id, value) in obj.member_entries() {
                    members.push(Value::list(vec![
                        Value::string(id.as_str()),
                        value.to_term(global)?,
                    ]));
                }
                Ok(Value::term(Term::new_internal(
                    tags::OBJECT,
                    vec![Value::set(members)],
                )))
            }
        }
    }

    /// Rebuild a value from its term form.
    ///
    /// Internal tags dispatch through the functional-character registry;
    /// unknown internal tags are term-conversion errors, while user terms
    /// (no `^` prefix) stay terms with their children converted.
    pub fn from_term(value: &Value) -> EvalResult<Value> {
        match value {
            Value::Term(term) => {
                let tag = term.functional().as_str();
                if tag.starts_with('^') {
                    match registry::converters_for(tag) {
                        Some(converters) => match converters.value {
                            Some(convert) => convert(term),
                            None => Err(term_conversion(format!(
                                "'{term}' does not represent a value"
                            ))),
                        },
                        None => Err(term_conversion(format!(
                            "unknown functional character '{tag}'"
                        ))),
                    }
                } else {
                    let mut args = Vec::with_capacity(term.size());
                    for arg in term.args() {
                        args.push(Value::from_term(arg)?);
                    }
                    Ok(Value::term(Term::new_internal(tag, args)))
                }
            }
            Value::List(items) => Ok(Value::list(from_term_all(items)?)),
            Value::Tuple(items) => Ok(Value::tuple(from_term_all(items)?)),
            Value::Set(items) => {
                let mut members = Vec::with_capacity(items.len());
                for item in items.iter() {
                    members.push(Value::from_term(item)?);
                }
                Ok(Value::set(members))
            }
            Value::Map(entries) => {
                let mut converted = std::collections::BTreeMap::new();
                for (k, v) in entries.iter() {
                    converted.insert(Value::from_term(k)?, Value::from_term(v)?);
                }
                Ok(Value::map(converted))
            }
            other => Ok(other.clone()),
        }
    }
}

fn to_term_all(values: &[Value], global: &Scope) -> EvalResult<Vec<Value>> {
    values.iter().map(|v| v.to_term(global)).collect()
}

fn from_term_all(values: &[Value]) -> EvalResult<Vec<Value>> {
    values.iter().map(Value::from_term).collect()
}

// Registry entry points.

/// `^procedure` / `^closure` / `^lambda` as a procedure value.
pub(super) fn procedure_value_from_term(term: &Term) -> EvalResult<Value> {
    code::procedure_from_term(term).map(Value::procedure)
}

/// `^preDefinedFunction(name)`.
pub(super) fn pre_defined_from_term(term: &Term) -> EvalResult<Value> {
    match term.args() {
        [Value::Str(name)] => builtin::pre_defined(name).map(Value::builtin).ok_or_else(|| {
            term_conversion(format!("'{name}' is not a pre-defined function"))
        }),
        _ => Err(malformed_term(tags::PRE_DEFINED_FUNCTION)),
    }
}

/// `^mathFunction(name)`.
pub(super) fn math_function_from_term(term: &Term) -> EvalResult<Value> {
    match term.args() {
        [Value::Str(name)] => builtin::math_function(name)
            .map(Value::builtin)
            .ok_or_else(|| term_conversion(format!("'{name}' is not a math function"))),
        _ => Err(malformed_term(tags::MATH_FUNCTION)),
    }
}

/// `^object(members)`.
pub(super) fn object_from_term(term: &Term) -> EvalResult<Value> {
    let [Value::Set(member_set)] = term.args() else {
        return Err(malformed_term(tags::OBJECT));
    };
    let mut members = FxHashMap::default();
    for entry in member_set.iter() {
        let Value::List(pair) = entry else {
            return Err(malformed_term(tags::OBJECT));
        };
        match pair.as_slice() {
            [Value::Str(name), value] => {
                members.insert(Ident::new(name), Value::from_term(value)?);
            }
            _ => return Err(malformed_term(tags::OBJECT)),
        }
    }
    Ok(Value::Object(ObjectValue::new(members)))
}

/// `^scope` has no inverse: live scopes cannot be rehydrated.
pub(super) fn scope_from_term(_term: &Term) -> EvalResult<Value> {
    Err(term_conversion(
        "a scope term cannot be converted back into a live scope",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(v: &Value) -> Value {
        let global = Scope::new();
        Value::from_term(&v.to_term(&global).unwrap()).unwrap()
    }

    #[test]
    fn atoms_are_their_own_term_form() {
        for v in [
            Value::Om,
            Value::Bool(true),
            Value::int(-5),
            Value::real(1.5),
            Value::string("hi"),
        ] {
            assert_eq!(round_trip(&v), v);
        }
    }

    #[test]
    fn containers_round_trip() {
        let v = Value::list(vec![
            Value::int(1),
            Value::set(vec![Value::int(2), Value::int(3)]),
            Value::tuple(vec![Value::string("a")]),
        ]);
        assert_eq!(round_trip(&v), v);
    }

    #[test]
    fn user_terms_survive_with_converted_children() {
        let t = Value::term(Term::new("f", vec![Value::int(1), Value::int(2)]).unwrap());
        assert_eq!(round_trip(&t), t);
    }

    #[test]
    fn unknown_internal_tag_is_an_error() {
        let t = Value::term(Term::new_internal("^noSuchVariant", vec![]));
        assert!(Value::from_term(&t).is_err());
    }

    #[test]
    fn scope_terms_do_not_rehydrate() {
        let global = Scope::new();
        let scope_value = Value::ScopeRef(Scope::new());
        let term = scope_value.to_term(&global).unwrap();
        assert!(Value::from_term(&term).is_err());
    }

    #[test]
    fn objects_round_trip_structurally() {
        let mut members = FxHashMap::default();
        members.insert(Ident::new("x"), Value::int(1));
        let obj = Value::Object(ObjectValue::new(members));
        assert_eq!(round_trip(&obj), obj);
    }
}
