//! Procedure values.
//!
//! Three kinds share one representation: plain procedures, closures, and
//! lambdas. A closure additionally owns a captured map - the values of its
//! free variables as of definition time, refreshed after each of its own
//! calls. The map is interior-mutable because the refresh happens during
//! the closure's call window while the value itself is shared.
//!
//! Comparison, equality, and hashing all ignore the captured map: two
//! closures with the same parameters and body are the same procedure no
//! matter what state they have accumulated.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use zet_ir::{render, Block, Ident, Param, ProcedureKind};

use crate::value::Value;

/// A user-defined callable: plain procedure, closure, or lambda.
pub struct Procedure {
    kind: ProcedureKind,
    params: Vec<Param>,
    body: Rc<Block>,
    /// Captured free-variable bindings. `Some` exactly for closures, even
    /// when the capture set is empty.
    captured: RefCell<Option<FxHashMap<Ident, Value>>>,
}

impl Procedure {
    /// Create a procedure of the given kind. Closures start with a present
    /// but empty captured map.
    pub fn new(kind: ProcedureKind, params: Vec<Param>, body: Rc<Block>) -> Procedure {
        let captured = match kind {
            ProcedureKind::Closure => Some(FxHashMap::default()),
            _ => None,
        };
        Procedure {
            kind,
            params,
            body,
            captured: RefCell::new(captured),
        }
    }

    #[inline]
    pub fn kind(&self) -> ProcedureKind {
        self.kind
    }

    #[inline]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    #[inline]
    pub fn body(&self) -> &Rc<Block> {
        &self.body
    }

    #[inline]
    pub fn is_closure(&self) -> bool {
        self.kind == ProcedureKind::Closure
    }

    /// Replace the captured map wholesale, as definition-time capture does.
    pub fn set_captured(&self, captured: FxHashMap<Ident, Value>) {
        *self.captured.borrow_mut() = Some(captured);
    }

    /// Snapshot of the captured bindings, released before the call mutates
    /// any scope. `None` for non-closures.
    pub fn captured_entries(&self) -> Option<Vec<(Ident, Value)>> {
        self.captured
            .borrow()
            .as_ref()
            .map(|map| map.iter().map(|(k, v)| (*k, v.clone())).collect())
    }

    /// The captured identifiers, in no particular order.
    pub fn captured_names(&self) -> Vec<Ident> {
        self.captured
            .borrow()
            .as_ref()
            .map(|map| map.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Overwrite the captured values after a call completed normally.
    pub fn refresh_captured(&self, refreshed: FxHashMap<Ident, Value>) {
        if let Some(map) = self.captured.borrow_mut().as_mut() {
            *map = refreshed;
        }
    }

    /// Copy with an independently owned captured map.
    pub fn deep_copy(&self) -> Procedure {
        let captured = self
            .captured
            .borrow()
            .as_ref()
            .map(|map| map.iter().map(|(k, v)| (*k, v.clone_deep())).collect());
        Procedure {
            kind: self.kind,
            params: self.params.clone(),
            body: Rc::clone(&self.body),
            captured: RefCell::new(captured),
        }
    }

    /// Structural comparison: kind rank, parameter count, parameters
    /// pairwise, then body. The captured map does not participate.
    pub fn cmp_structural(&self, other: &Procedure) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.params.len().cmp(&other.params.len()))
            .then_with(|| self.params.cmp(&other.params))
            .then_with(|| self.body.cmp(&other.body))
    }
}

impl Hash for Procedure {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.params.len().hash(state);
        self.body.statements.len().hash(state);
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sb = String::new();
        render::append_procedure(&mut sb, self.kind, &self.params, &self.body, 0);
        f.write_str(&sb)
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zet_ir::{Expr, Literal, Stmt};

    fn sample_body() -> Rc<Block> {
        Rc::new(Block::new(vec![Stmt::Return(Some(Expr::Literal(
            Literal::Int(1),
        )))]))
    }

    #[test]
    fn closures_start_with_an_empty_captured_map() {
        let p = Procedure::new(ProcedureKind::Closure, vec![], sample_body());
        assert_eq!(p.captured_entries(), Some(vec![]));
        let plain = Procedure::new(ProcedureKind::Procedure, vec![], sample_body());
        assert_eq!(plain.captured_entries(), None);
    }

    #[test]
    fn comparison_ignores_captured_state() {
        let a = Procedure::new(ProcedureKind::Closure, vec![], sample_body());
        let b = Procedure::new(ProcedureKind::Closure, vec![], sample_body());
        let mut captured = FxHashMap::default();
        captured.insert(Ident::new("n"), Value::int(42));
        a.set_captured(captured);
        assert_eq!(a.cmp_structural(&b), Ordering::Equal);
    }

    #[test]
    fn deep_copy_owns_its_captured_map() {
        let a = Procedure::new(ProcedureKind::Closure, vec![], sample_body());
        let mut captured = FxHashMap::default();
        captured.insert(Ident::new("n"), Value::int(1));
        a.set_captured(captured);

        let b = a.deep_copy();
        let mut refreshed = FxHashMap::default();
        refreshed.insert(Ident::new("n"), Value::int(2));
        b.refresh_captured(refreshed);

        let original = a.captured_entries().unwrap();
        assert_eq!(original, vec![(Ident::new("n"), Value::int(1))]);
    }

    #[test]
    fn kind_then_arity_orders_procedures() {
        let plain = Procedure::new(ProcedureKind::Procedure, vec![], sample_body());
        let closure = Procedure::new(ProcedureKind::Closure, vec![], sample_body());
        assert_eq!(plain.cmp_structural(&closure), Ordering::Less);

        let one_param = Procedure::new(
            ProcedureKind::Procedure,
            vec![Param::by_value(Ident::new("x"))],
            sample_body(),
        );
        assert_eq!(plain.cmp_structural(&one_param), Ordering::Less);
    }
}
