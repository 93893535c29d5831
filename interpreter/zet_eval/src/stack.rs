//! Host stack management for deep recursion.
//!
//! Body evaluation recurses on the Rust stack, so deeply nested user code
//! would otherwise exhaust it long before the interpreter's own call-depth
//! ceiling triggers. Each procedure call checks the remaining headroom and
//! grows the stack in segments when it runs low; the call-depth ceiling in
//! [`crate::State`] stays the semantic overflow signal.

/// Red zone that must remain free before entering a body.
const RED_ZONE: usize = 128 * 1024;

/// Segment size allocated when the red zone is reached.
const GROW_BY: usize = 2 * 1024 * 1024;

/// Run `f`, growing the host stack first if headroom is low.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROW_BY, f)
}
