//! Symbolic terms.
//!
//! A term is a functional character applied to child values, written
//! `tag(child1, ..., childk)`. Tags beginning with `^` identify internal
//! variants (procedures, scopes, statements, operators); every other tag is
//! a user term and carries no special meaning. Terms are the canonical
//! symbolic form of any runtime value: they print, compare structurally,
//! and - with the documented scope exception - convert back.

mod code;
mod convert;
mod registry;

use std::fmt;

use zet_ir::Ident;

use crate::errors::{term_conversion, EvalResult};
use crate::value::Value;

pub use code::{
    block_from_term, block_to_term, expr_from_term, expr_to_term, procedure_to_term,
    stmt_from_term, stmt_to_term,
};

/// Functional characters of the internal term variants.
pub mod tags {
    pub const SCOPE: &str = "^scope";
    pub const PROCEDURE: &str = "^procedure";
    pub const CLOSURE: &str = "^closure";
    pub const LAMBDA: &str = "^lambda";
    pub const PARAMETER: &str = "^parameter";
    pub const RW_PARAMETER: &str = "^rwParameter";
    pub const PRE_DEFINED_FUNCTION: &str = "^preDefinedFunction";
    pub const MATH_FUNCTION: &str = "^mathFunction";
    pub const OBJECT: &str = "^object";

    pub const BLOCK: &str = "^block";
    pub const ASSIGNMENT: &str = "^assignment";
    pub const RETURN: &str = "^return";
    pub const IF: &str = "^if";
    pub const WHILE: &str = "^while";
    pub const FOR: &str = "^for";
    pub const TRY_CATCH: &str = "^tryCatch";
    pub const TRY_CATCH_BRANCH: &str = "^tryCatchBranch";
    pub const TRY_CATCH_USR_BRANCH: &str = "^tryCatchUsrBranch";
    pub const TRY_CATCH_LNG_BRANCH: &str = "^tryCatchLngBranch";
    pub const THROW: &str = "^throw";
    pub const BREAK: &str = "^break";
    pub const CONTINUE: &str = "^continue";
    pub const GLOBAL: &str = "^global";

    pub const VARIABLE: &str = "^variable";
    pub const CALL: &str = "^call";
    pub const MEMBER_ACCESS: &str = "^memberAccess";
    pub const LIST_CONSTRUCTOR: &str = "^listConstructor";
    pub const SET_CONSTRUCTOR: &str = "^setConstructor";

    pub const SUM: &str = "^sum";
    pub const DIFFERENCE: &str = "^difference";
    pub const PRODUCT: &str = "^product";
    pub const QUOTIENT: &str = "^quotient";
    pub const MODULO: &str = "^modulo";
    pub const EQUALS: &str = "^equals";
    pub const NOT_EQUALS: &str = "^notEquals";
    pub const LESS_THAN: &str = "^lessThan";
    pub const LESS_OR_EQUAL: &str = "^lessOrEqual";
    pub const GREATER_THAN: &str = "^greaterThan";
    pub const GREATER_OR_EQUAL: &str = "^greaterOrEqual";
    pub const CONJUNCTION: &str = "^conjunction";
    pub const DISJUNCTION: &str = "^disjunction";
    pub const IN: &str = "^in";
    pub const MINUS: &str = "^minus";
    pub const NOT: &str = "^not";
}

/// A functional character applied to child values.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Term {
    functional: Ident,
    args: Vec<Value>,
}

/// Whether `tag` is a well-formed functional character: an optional `^`
/// followed by an identifier.
pub fn is_valid_functional(tag: &str) -> bool {
    let body = tag.strip_prefix('^').unwrap_or(tag);
    let mut chars = body.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Term {
    /// Construct a term, validating the functional character.
    pub fn new(functional: &str, args: Vec<Value>) -> EvalResult<Term> {
        if !is_valid_functional(functional) {
            return Err(term_conversion(format!(
                "'{functional}' is not a valid functional character"
            )));
        }
        Ok(Term::new_internal(functional, args))
    }

    /// Construct a term from a tag known to be well-formed.
    pub(crate) fn new_internal(functional: &str, args: Vec<Value>) -> Term {
        debug_assert!(is_valid_functional(functional));
        Term {
            functional: Ident::new(functional),
            args,
        }
    }

    #[inline]
    pub fn functional(&self) -> Ident {
        self.functional
    }

    #[inline]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Number of children.
    #[inline]
    pub fn size(&self) -> usize {
        self.args.len()
    }

    /// Child at `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Copy with deep-cloned children.
    pub fn clone_deep(&self) -> Term {
        Term {
            functional: self.functional,
            args: self.args.iter().map(Value::clone_deep).collect(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.functional)?;
        let mut first = true;
        for arg in &self.args {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functional_validation() {
        assert!(is_valid_functional("^procedure"));
        assert!(is_valid_functional("f"));
        assert!(is_valid_functional("my_term2"));
        assert!(!is_valid_functional(""));
        assert!(!is_valid_functional("^"));
        assert!(!is_valid_functional("2start"));
        assert!(!is_valid_functional("has space"));
    }

    #[test]
    fn display_is_prefix_functional_form() {
        let t = Term::new("f", vec![Value::int(1), Value::string("a")]).unwrap();
        assert_eq!(t.to_string(), "f(1, \"a\")");
    }

    #[test]
    fn terms_compare_by_functional_then_args() {
        let a = Term::new("f", vec![Value::int(1)]).unwrap();
        let b = Term::new("f", vec![Value::int(2)]).unwrap();
        let c = Term::new("g", vec![Value::int(0)]).unwrap();
        assert!(a < b);
        assert!(b < c);
    }
}
