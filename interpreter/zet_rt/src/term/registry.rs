//! Functional-character registry.
//!
//! Maps each internal functional character to its converters. The catalog
//! below is the full variant list; resolution memoizes into a mutex-guarded
//! map so that repeated conversions of one tag - and repeated misses - cost
//! one lock and one hash lookup. The coarse mutex is deliberate: the map is
//! read-mostly and written only on first encounters, so finer granularity
//! would buy nothing.

use std::sync::LazyLock;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use zet_ir::{Expr, Ident, Stmt};

use super::{code, convert, tags, Term};
use crate::errors::EvalResult;
use crate::value::Value;

/// Converter set for one functional character. A tag may be convertible as
/// a value, as an expression, as a statement, or as several of these:
/// `^closure` is both a procedure value and a procedure literal.
#[derive(Copy, Clone)]
pub struct TermConverters {
    pub value: Option<fn(&Term) -> EvalResult<Value>>,
    pub expr: Option<fn(&Term) -> EvalResult<Expr>>,
    pub stmt: Option<fn(&Term) -> EvalResult<Stmt>>,
}

const fn value_conv(f: fn(&Term) -> EvalResult<Value>) -> TermConverters {
    TermConverters {
        value: Some(f),
        expr: None,
        stmt: None,
    }
}

const fn expr_conv(f: fn(&Term) -> EvalResult<Expr>) -> TermConverters {
    TermConverters {
        value: None,
        expr: Some(f),
        stmt: None,
    }
}

const fn stmt_conv(f: fn(&Term) -> EvalResult<Stmt>) -> TermConverters {
    TermConverters {
        value: None,
        expr: None,
        stmt: Some(f),
    }
}

/// Procedure tags convert both ways: to a value and to a literal.
const fn proc_conv() -> TermConverters {
    TermConverters {
        value: Some(convert::procedure_value_from_term),
        expr: Some(code::procedure_expr_from_term),
        stmt: None,
    }
}

/// The known variant catalog.
static CATALOG: &[(&str, TermConverters)] = &[
    // Values
    (tags::PROCEDURE, proc_conv()),
    (tags::CLOSURE, proc_conv()),
    (tags::LAMBDA, proc_conv()),
    (tags::PRE_DEFINED_FUNCTION, value_conv(convert::pre_defined_from_term)),
    (tags::MATH_FUNCTION, value_conv(convert::math_function_from_term)),
    (tags::OBJECT, value_conv(convert::object_from_term)),
    (tags::SCOPE, value_conv(convert::scope_from_term)),
    // Statements
    (tags::ASSIGNMENT, stmt_conv(code::assignment_from_term)),
    (tags::RETURN, stmt_conv(code::return_from_term)),
    (tags::IF, stmt_conv(code::if_from_term)),
    (tags::WHILE, stmt_conv(code::while_from_term)),
    (tags::FOR, stmt_conv(code::for_from_term)),
    (tags::TRY_CATCH, stmt_conv(code::try_catch_from_term)),
    (tags::THROW, stmt_conv(code::throw_from_term)),
    (tags::BREAK, stmt_conv(code::break_from_term)),
    (tags::CONTINUE, stmt_conv(code::continue_from_term)),
    (tags::GLOBAL, stmt_conv(code::global_from_term)),
    // Expressions
    (tags::VARIABLE, expr_conv(code::variable_from_term)),
    (tags::CALL, expr_conv(code::call_from_term)),
    (tags::MEMBER_ACCESS, expr_conv(code::member_access_from_term)),
    (tags::LIST_CONSTRUCTOR, expr_conv(code::collection_constructor_from_term)),
    (tags::SET_CONSTRUCTOR, expr_conv(code::collection_constructor_from_term)),
    // Operators
    (tags::SUM, expr_conv(code::binary_from_term)),
    (tags::DIFFERENCE, expr_conv(code::binary_from_term)),
    (tags::PRODUCT, expr_conv(code::binary_from_term)),
    (tags::QUOTIENT, expr_conv(code::binary_from_term)),
    (tags::MODULO, expr_conv(code::binary_from_term)),
    (tags::EQUALS, expr_conv(code::binary_from_term)),
    (tags::NOT_EQUALS, expr_conv(code::binary_from_term)),
    (tags::LESS_THAN, expr_conv(code::binary_from_term)),
    (tags::LESS_OR_EQUAL, expr_conv(code::binary_from_term)),
    (tags::GREATER_THAN, expr_conv(code::binary_from_term)),
    (tags::GREATER_OR_EQUAL, expr_conv(code::binary_from_term)),
    (tags::CONJUNCTION, expr_conv(code::binary_from_term)),
    (tags::DISJUNCTION, expr_conv(code::binary_from_term)),
    (tags::IN, expr_conv(code::binary_from_term)),
    (tags::MINUS, expr_conv(code::unary_from_term)),
    (tags::NOT, expr_conv(code::unary_from_term)),
];

static RESOLVED: LazyLock<Mutex<FxHashMap<&'static str, Option<TermConverters>>>> =
    LazyLock::new(|| Mutex::new(FxHashMap::default()));

/// Converters for `tag`, resolved lazily against the catalog and memoized -
/// misses included, so an unknown tag is searched at most once.
pub fn converters_for(tag: &str) -> Option<TermConverters> {
    let mut resolved = RESOLVED.lock();
    if let Some(hit) = resolved.get(tag) {
        return *hit;
    }
    let found = CATALOG
        .iter()
        .find(|(candidate, _)| *candidate == tag)
        .map(|(_, converters)| *converters);
    resolved.insert(Ident::new(tag).as_str(), found);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_resolve() {
        assert!(converters_for(tags::PROCEDURE).is_some());
        assert!(converters_for(tags::ASSIGNMENT).is_some());
        assert!(converters_for(tags::SUM).is_some());
    }

    #[test]
    fn unknown_tags_memoize_as_misses() {
        assert!(converters_for("^noSuchVariant").is_none());
        // Second resolution hits the memo map; still a miss.
        assert!(converters_for("^noSuchVariant").is_none());
    }

    #[test]
    fn procedure_tag_converts_as_value_and_expression() {
        let converters = converters_for(tags::CLOSURE).unwrap();
        assert!(converters.value.is_some());
        assert!(converters.expr.is_some());
        assert!(converters.stmt.is_none());
    }
}
