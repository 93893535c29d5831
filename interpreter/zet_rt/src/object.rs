//! Object values.
//!
//! An object is a shared member map. Handles alias, so member updates made
//! through one handle are visible through every other; passing an object by
//! value (or assigning it) goes through `deep_copy`, which snapshots the
//! members and breaks the sharing. Comparison is structural over the
//! members so objects survive the term round-trip.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use zet_ir::Ident;

use crate::value::Value;

/// Member-mapped object with shared handles.
#[derive(Clone)]
pub struct ObjectValue {
    members: Rc<RefCell<FxHashMap<Ident, Value>>>,
}

impl ObjectValue {
    pub fn new(members: FxHashMap<Ident, Value>) -> ObjectValue {
        ObjectValue {
            members: Rc::new(RefCell::new(members)),
        }
    }

    /// Current value of a member.
    pub fn member(&self, id: Ident) -> Option<Value> {
        self.members.borrow().get(&id).cloned()
    }

    /// Bind or rebind a member.
    pub fn set_member(&self, id: Ident, value: Value) {
        self.members.borrow_mut().insert(id, value);
    }

    /// Member snapshot in name order.
    pub fn member_entries(&self) -> Vec<(Ident, Value)> {
        let mut entries: Vec<(Ident, Value)> = self
            .members
            .borrow()
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Detached copy whose members are deep clones.
    pub fn deep_copy(&self) -> ObjectValue {
        let members = self
            .members
            .borrow()
            .iter()
            .map(|(k, v)| (*k, v.clone_deep()))
            .collect();
        ObjectValue::new(members)
    }

    /// Structural member-wise comparison.
    pub fn cmp_structural(&self, other: &ObjectValue) -> Ordering {
        if Rc::ptr_eq(&self.members, &other.members) {
            return Ordering::Equal;
        }
        self.member_entries().cmp(&other.member_entries())
    }
}

impl fmt::Display for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("object(")?;
        let mut first = true;
        for (id, value) in self.member_entries() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{id} := {value}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_share_members() {
        let a = ObjectValue::new(FxHashMap::default());
        let b = a.clone();
        a.set_member(Ident::new("x"), Value::int(1));
        assert_eq!(b.member(Ident::new("x")), Some(Value::int(1)));
    }

    #[test]
    fn deep_copy_detaches() {
        let a = ObjectValue::new(FxHashMap::default());
        a.set_member(Ident::new("x"), Value::int(1));
        let b = a.deep_copy();
        b.set_member(Ident::new("x"), Value::int(2));
        assert_eq!(a.member(Ident::new("x")), Some(Value::int(1)));
    }

    #[test]
    fn comparison_is_structural() {
        let a = ObjectValue::new(FxHashMap::default());
        a.set_member(Ident::new("x"), Value::int(1));
        let b = a.deep_copy();
        assert_eq!(a.cmp_structural(&b), Ordering::Equal);
        b.set_member(Ident::new("x"), Value::int(2));
        assert_ne!(a.cmp_structural(&b), Ordering::Equal);
    }
}
