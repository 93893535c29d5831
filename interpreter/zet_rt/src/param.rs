//! Runtime operations on parameter descriptors.
//!
//! The descriptor itself (`zet_ir::Param`) is syntax; these functions are
//! its runtime contract. For a by-value parameter the caller pre-clones the
//! argument; for a read-write parameter the caller passes the original and
//! collects the post-call value with [`read_back`].

use zet_ir::{Ident, Param, ParamMode};

use crate::errors::{malformed_term, EvalResult};
use crate::scope::Scope;
use crate::term::{tags, Term};
use crate::value::Value;

/// Bind the parameter's name to `value` in `scope`.
pub fn assign_into(param: &Param, scope: &Scope, value: Value) {
    scope.store(param.name, value);
}

/// Current value of the parameter's name in `scope`, om when absent.
pub fn read_back(param: &Param, scope: &Scope) -> Value {
    scope
        .lookup(param.name)
        .map(|hit| hit.value)
        .unwrap_or(Value::Om)
}

/// `^parameter(name)` / `^rwParameter(name)`.
pub fn param_to_term(param: &Param) -> Value {
    let tag = match param.mode {
        ParamMode::Value => tags::PARAMETER,
        ParamMode::ReadWrite => tags::RW_PARAMETER,
    };
    Value::term(Term::new_internal(
        tag,
        vec![Value::string(param.name.as_str())],
    ))
}

/// Inverse of [`param_to_term`].
pub fn param_from_term(value: &Value) -> EvalResult<Param> {
    let Value::Term(term) = value else {
        return Err(malformed_term(tags::PARAMETER));
    };
    let mode = match term.functional().as_str() {
        tags::PARAMETER => ParamMode::Value,
        tags::RW_PARAMETER => ParamMode::ReadWrite,
        _ => return Err(malformed_term(tags::PARAMETER)),
    };
    match term.args() {
        [Value::Str(name)] => Ok(Param {
            name: Ident::new(name),
            mode,
        }),
        _ => Err(malformed_term(term.functional().as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_both_modes() {
        for param in [
            Param::by_value(Ident::new("x")),
            Param::read_write(Ident::new("xs")),
        ] {
            let term = param_to_term(&param);
            assert_eq!(param_from_term(&term).unwrap(), param);
        }
    }

    #[test]
    fn assign_and_read_back() {
        let scope = Scope::new();
        let param = Param::read_write(Ident::new("xs"));
        assign_into(&param, &scope, Value::int(9));
        assert_eq!(read_back(&param, &scope), Value::int(9));
        let absent = Param::by_value(Ident::new("missing"));
        assert_eq!(read_back(&absent, &scope), Value::Om);
    }

    #[test]
    fn malformed_parameter_terms_fail() {
        assert!(param_from_term(&Value::int(1)).is_err());
        let wrong_arity = Value::term(Term::new_internal(tags::PARAMETER, vec![]));
        assert!(param_from_term(&wrong_arity).is_err());
    }
}
