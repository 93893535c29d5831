//! Variable scopes.
//!
//! A scope is one frame of bindings plus a parent link; the chain of parent
//! links is searched on lookup and is always acyclic. Instead of an
//! inheritance hierarchy of scope kinds, one record carries three flag bits
//! and `lookup`/`store` branch on them:
//!
//! - `restrict_to_functions`: ascents into the parent only surface values
//!   that are procedures or om. Calls link their callee scope to the caller
//!   this way, so the callee resolves the caller's procedures but never its
//!   data variables.
//! - `read_through`: values found in an ancestor are returned as-is, without
//!   the copy-out clone.
//! - `write_through`: stores for identifiers not bound locally descend to
//!   the nearest ancestor that accepts them. Together with `read_through`
//!   this is the iterator-block behavior: the iteration variable stays
//!   local while every other update lands in the enclosing scope.
//!
//! # Handles
//!
//! `Scope` is a cheap reference-counted handle (`Rc<RefCell<_>>`); cloning
//! a handle aliases the frame. Frames are single-threaded by design.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use zet_ir::Ident;

use crate::errors::EvalResult;
use crate::term::Term;
use crate::value::Value;

/// One frame of the scope chain.
struct Frame {
    bindings: FxHashMap<Ident, Value>,
    parent: Option<Scope>,
    restrict_to_functions: bool,
    read_through: bool,
    write_through: bool,
}

/// Handle to a scope frame.
#[derive(Clone)]
pub struct Scope(Rc<RefCell<Frame>>);

/// Result of a chain lookup.
#[derive(Clone, Debug)]
pub struct Lookup {
    pub value: Value,
    /// The binding was found in an ancestor frame, not the current one.
    pub from_ancestor: bool,
    /// The returned value is a copy-out clone the caller may cache into the
    /// current frame. Never set under `read_through`.
    pub cloned: bool,
}

impl Scope {
    /// Fresh root frame with no parent and no flags.
    pub fn new() -> Scope {
        Scope(Rc::new(RefCell::new(Frame {
            bindings: FxHashMap::default(),
            parent: None,
            restrict_to_functions: false,
            read_through: false,
            write_through: false,
        })))
    }

    fn child_with(&self, restrict_to_functions: bool, through: bool) -> Scope {
        Scope(Rc::new(RefCell::new(Frame {
            bindings: FxHashMap::default(),
            parent: Some(self.clone()),
            restrict_to_functions,
            read_through: through,
            write_through: through,
        })))
    }

    /// Plain nested frame.
    pub fn new_child(&self) -> Scope {
        self.child_with(false, false)
    }

    /// Frame a call links to its caller: ancestor lookups only surface
    /// procedures and om.
    pub fn new_functions_only_child(&self) -> Scope {
        self.child_with(true, false)
    }

    /// Iterator-block frame: reads pass through uncached and writes for
    /// identifiers not bound locally land in the enclosing scope.
    pub fn new_iterator_child(&self) -> Scope {
        self.child_with(false, true)
    }

    /// Toggle write-through; iterator constructs suspend it while binding
    /// the iteration variable.
    pub fn set_write_through(&self, write_through: bool) {
        self.0.borrow_mut().write_through = write_through;
    }

    /// Frame identity.
    #[inline]
    pub fn same_frame(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable per-run frame address, for the deterministic order on reified
    /// scope values.
    #[inline]
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Value bound in this frame itself, ignoring the chain.
    pub fn lookup_local(&self, id: Ident) -> Option<Value> {
        self.0.borrow().bindings.get(&id).cloned()
    }

    /// Bind `id` in this frame, ignoring the chain and every flag.
    pub fn cache(&self, id: Ident, value: Value) {
        self.0.borrow_mut().bindings.insert(id, value);
    }

    /// Search this frame, then the parent chain.
    ///
    /// An ancestor hit comes back deep-cloned (copy-out value semantics)
    /// unless this frame reads through. A functions-only frame lets only
    /// procedures and om pass and caches procedure hits locally, so the
    /// next call-time resolution is O(1).
    pub fn lookup(&self, id: Ident) -> Option<Lookup> {
        let locally_bound = self.0.borrow().bindings.contains_key(&id);
        let (value, is_clone) = self.locate(id)?;
        Some(Lookup {
            value,
            from_ancestor: !locally_bound,
            cloned: is_clone,
        })
    }

    fn locate(&self, id: Ident) -> Option<(Value, bool)> {
        let (parent, restrict, read_through) = {
            let frame = self.0.borrow();
            if let Some(v) = frame.bindings.get(&id) {
                return Some((v.clone(), false));
            }
            (
                frame.parent.clone()?,
                frame.restrict_to_functions,
                frame.read_through,
            )
        };

        let (value, is_clone) = parent.locate(id)?;
        if restrict && !(value.is_om() || value.is_procedure_value()) {
            // Non-function caller data is invisible past this frame.
            return None;
        }
        if is_clone || read_through {
            if restrict {
                self.cache(id, value.clone());
            }
            return Some((value, is_clone));
        }
        let cloned = value.clone_deep();
        if restrict {
            self.cache(id, cloned.clone());
        }
        Some((cloned, true))
    }

    /// Store `id`, honoring write-through.
    ///
    /// Without write-through, or when `id` is already bound here, the store
    /// is local. Otherwise it descends to the nearest ancestor that takes
    /// it; a functions-only frame only passes procedure values on, and a
    /// store that no frame accepts is dropped.
    pub fn store(&self, id: Ident, value: Value) {
        let parent = {
            let mut frame = self.0.borrow_mut();
            if !frame.write_through || frame.bindings.contains_key(&id) {
                frame.bindings.insert(id, value);
                return;
            }
            if frame.restrict_to_functions && !value.is_procedure_value() {
                return;
            }
            match frame.parent.clone() {
                Some(parent) => parent,
                None => {
                    frame.bindings.insert(id, value);
                    return;
                }
            }
        };
        parent.store(id, value);
    }

    /// Rebind `id` where it is already bound between this frame (inclusive)
    /// and `boundary` (exclusive); bind it here when it is bound nowhere in
    /// that range. Realizes a closure's captured view at call entry without
    /// ever writing into the caller's own frames.
    pub fn assign_uncloned_up_to(&self, boundary: &Scope, id: Ident, value: Value) {
        if !self.try_rebind_up_to(boundary, id, &value) {
            self.cache(id, value);
        }
    }

    fn try_rebind_up_to(&self, boundary: &Scope, id: Ident, value: &Value) -> bool {
        if self.same_frame(boundary) {
            return false;
        }
        let parent = {
            let mut frame = self.0.borrow_mut();
            if let Some(slot) = frame.bindings.get_mut(&id) {
                *slot = value.clone();
                return true;
            }
            match frame.parent.clone() {
                Some(parent) => parent,
                None => return false,
            }
        };
        parent.try_rebind_up_to(boundary, id, value)
    }

    /// Rebind `id` wherever it is already bound in the chain, stopping
    /// before `fence`. Reports whether a binding was found; never creates
    /// one.
    pub fn assign_existing(&self, fence: &Scope, id: Ident, value: Value) -> bool {
        self.try_rebind_up_to(fence, id, &value)
    }

    /// Side-effect-free chain lookup stopping before `fence`.
    ///
    /// Honors `restrict_to_functions` like `lookup` but never clones deep
    /// and never caches. Closure definition probes the active chain this
    /// way: the fence keeps memoized pre-defined resolutions in the root
    /// frame out of capture sets.
    pub fn probe_below(&self, fence: &Scope, id: Ident) -> Option<Value> {
        if self.same_frame(fence) {
            return None;
        }
        let (parent, restrict) = {
            let frame = self.0.borrow();
            if let Some(v) = frame.bindings.get(&id) {
                return Some(v.clone());
            }
            (frame.parent.clone()?, frame.restrict_to_functions)
        };
        let value = parent.probe_below(fence, id)?;
        if restrict && !(value.is_om() || value.is_procedure_value()) {
            return None;
        }
        Some(value)
    }

    /// All bindings reachable from this frame, deepest ancestor first so
    /// nearer frames override. A functions-only link restricts what its
    /// ancestors contribute, mirroring what `lookup` could actually see.
    pub fn collect_all_bindings(
        &self,
        out: &mut FxHashMap<Ident, Value>,
        restrict_to_functions: bool,
    ) {
        let frame = self.0.borrow();
        if let Some(parent) = &frame.parent {
            parent.collect_all_bindings(out, frame.restrict_to_functions);
        }
        for (id, value) in &frame.bindings {
            if !restrict_to_functions || value.is_procedure_value() {
                out.insert(*id, value.clone());
            }
        }
    }

    /// Reify this scope: `^scope(bindings)` where `bindings` is the set of
    /// `[name, term]` pairs reachable from this frame or bound globally.
    /// The inverse direction does not exist; live scopes cannot be
    /// rehydrated from terms.
    pub fn to_term(&self, global: &Scope) -> EvalResult<Term> {
        let mut all = FxHashMap::default();
        self.collect_all_bindings(&mut all, false);
        global.collect_all_bindings(&mut all, false);

        let mut bindings = Vec::with_capacity(all.len());
        for (id, value) in &all {
            bindings.push(Value::list(vec![
                Value::string(id.as_str()),
                value.to_term(global)?,
            ]));
        }
        Ok(Term::new_internal(
            crate::term::tags::SCOPE,
            vec![Value::set(bindings)],
        ))
    }
}

impl Default for Scope {
    fn default() -> Scope {
        Scope::new()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scope({:#x})", self.addr())
    }
}
