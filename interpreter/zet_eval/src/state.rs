//! Execution state.
//!
//! One `State` is one execution context: the active scope, the global
//! frame, the initial frame, call-depth bookkeeping, and the output
//! channel. Contexts never share these; only the interner, the
//! functional-character registry, and the pre-defined registries are
//! process-wide.
//!
//! # The two special frames
//!
//! The *global* frame holds identifiers promoted with `global`; it is not
//! part of any scope chain and is consulted first on both read and write.
//! The *initial* frame roots every scope chain. Pre-defined function
//! resolutions - hits and the om sentinel for misses - are memoized into
//! it, so they are found by plain chain lookup from every present and
//! future scope and the reflective search never repeats.

use zet_ir::Ident;
use zet_rt::{builtin, EvalError, PrintHandler, Scope, SharedPrintHandler, Value};

use crate::errors::{stack_overflow, EvalResult};

/// Default ceiling on the user-language call depth.
const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// One execution context of the interpreter.
pub struct State {
    current: Scope,
    global: Scope,
    initial: Scope,
    call_stack_depth: usize,
    max_call_depth: usize,
    first_overflow_depth: Option<usize>,
    print: SharedPrintHandler,
}

impl State {
    /// Fresh context printing to stdout.
    pub fn new() -> State {
        State::with_print(zet_rt::stdout_handler())
    }

    /// Fresh context with a custom output channel.
    pub fn with_print(print: SharedPrintHandler) -> State {
        crate::builtins::install();
        let initial = Scope::new();
        State {
            current: initial.new_child(),
            global: Scope::new(),
            initial,
            call_stack_depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            first_overflow_depth: None,
            print,
        }
    }

    /// Lower or raise the call-depth ceiling.
    pub fn set_max_call_depth(&mut self, max: usize) {
        self.max_call_depth = max;
    }

    /// Handle to the active scope.
    pub fn scope(&self) -> Scope {
        self.current.clone()
    }

    /// Make `scope` the active scope.
    pub fn set_scope(&mut self, scope: Scope) {
        self.current = scope;
    }

    /// Handle to the global frame.
    pub fn global_scope(&self) -> Scope {
        self.global.clone()
    }

    /// Handle to the initial frame rooting every chain.
    pub fn initial_scope(&self) -> Scope {
        self.initial.clone()
    }

    /// The output channel.
    pub fn print_handler(&self) -> &dyn PrintHandler {
        self.print.as_ref()
    }

    /// Current user-language call depth.
    pub fn call_stack_depth(&self) -> usize {
        self.call_stack_depth
    }

    /// Depth of the first call that overflowed, if any call did.
    pub fn first_overflow_depth(&self) -> Option<usize> {
        self.first_overflow_depth
    }

    /// Enter a call: bump the depth, raising the catch-exempt overflow
    /// error - and recording the offending depth, first overflow wins -
    /// when the ceiling is breached.
    pub fn enter_call(&mut self) -> EvalResult<()> {
        self.call_stack_depth += 1;
        if self.call_stack_depth > self.max_call_depth {
            let depth = self.call_stack_depth;
            self.call_stack_depth -= 1;
            if self.first_overflow_depth.is_none() {
                self.first_overflow_depth = Some(depth);
            }
            tracing::debug!(depth, "call stack overflow");
            return Err(stack_overflow(depth));
        }
        Ok(())
    }

    /// Leave a call entered with [`State::enter_call`].
    pub fn exit_call(&mut self) {
        self.call_stack_depth = self.call_stack_depth.saturating_sub(1);
    }

    /// The variable-read path.
    ///
    /// Globals first, then the active chain; a chain hit that was cloned
    /// out of an ancestor is cached into the current frame. Identifiers
    /// bound nowhere fall back to the pre-defined registry, then - for
    /// lower-case names - to the host math routines, and the outcome
    /// (including om for a miss) is memoized into the initial frame.
    pub fn find_value(&mut self, id: Ident) -> Value {
        if let Some(v) = self.global.lookup_local(id) {
            return v;
        }
        if let Some(hit) = self.current.lookup(id) {
            if hit.cloned {
                self.current.cache(id, hit.value.clone());
            }
            return hit.value;
        }

        let resolved = builtin::pre_defined(id.as_str())
            .or_else(|| {
                if is_lower_case(id.as_str()) {
                    builtin::math_function(id.as_str())
                } else {
                    None
                }
            })
            .map(Value::builtin)
            .unwrap_or(Value::Om);
        tracing::trace!(name = id.as_str(), resolved = %resolved, "memoizing resolution");
        self.initial.cache(id, resolved.clone());
        resolved
    }

    /// Chain-only lookup used when a closure literal collects its capture
    /// set: no pre-defined fallback, no memoization, and nothing from the
    /// initial frame - names that resolve only there are free, not
    /// captured.
    pub fn lookup_for_capture(&self, id: Ident) -> Option<Value> {
        if let Some(v) = self.global.lookup_local(id) {
            return Some(v);
        }
        self.current.probe_below(&self.initial, id)
    }

    /// The assignment path: a store for an identifier promoted to the
    /// global frame updates the global binding, everything else goes to
    /// the active scope.
    pub fn put_value(&mut self, id: Ident, value: Value) {
        if self.global.lookup_local(id).is_some() {
            self.global.store(id, value);
        } else {
            self.current.store(id, value);
        }
    }

    /// Ensure `id` exists in the global frame, as om when new. Subsequent
    /// stores of `id` then land globally.
    pub fn make_global(&mut self, id: Ident) {
        if self.global.lookup_local(id).is_none() {
            self.global.store(id, Value::Om);
        }
    }

    /// Report an error that no catch recovered from to the host output
    /// channel, with its accumulated trace.
    pub fn report_unhandled(&self, error: &EvalError) {
        self.print.write(&format!("Error: {}\n", error.report()));
    }
}

impl Default for State {
    fn default() -> State {
        State::new()
    }
}

fn is_lower_case(name: &str) -> bool {
    !name.chars().any(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Ident {
        Ident::new(s)
    }

    #[test]
    fn unknown_identifiers_resolve_to_om_and_memoize() {
        let mut state = State::new();
        assert_eq!(state.find_value(id("no_such_name")), Value::Om);
        // The sentinel went into the initial frame, so the next lookup is a
        // plain chain hit.
        assert_eq!(
            state.initial_scope().lookup_local(id("no_such_name")),
            Some(Value::Om)
        );
        assert_eq!(state.find_value(id("no_such_name")), Value::Om);
    }

    #[test]
    fn pre_defined_functions_resolve_and_memoize() {
        let mut state = State::new();
        let from = state.find_value(id("from"));
        assert!(from.is_procedure_value());
        assert!(state.initial_scope().lookup_local(id("from")).is_some());
    }

    #[test]
    fn math_functions_resolve_for_lower_case_names_only() {
        let mut state = State::new();
        assert!(state.find_value(id("sqrt")).is_procedure_value());
        assert_eq!(state.find_value(id("Sqrt")), Value::Om);
    }

    #[test]
    fn make_global_routes_later_stores() {
        let mut state = State::new();
        state.make_global(id("g"));
        assert_eq!(state.global_scope().lookup_local(id("g")), Some(Value::Om));
        state.put_value(id("g"), Value::int(1));
        assert_eq!(
            state.global_scope().lookup_local(id("g")),
            Some(Value::int(1))
        );
        // Globals win on the read path too.
        assert_eq!(state.find_value(id("g")), Value::int(1));
    }

    #[test]
    fn depth_ceiling_raises_and_records_first_overflow() {
        let mut state = State::new();
        state.set_max_call_depth(2);
        state.enter_call().unwrap();
        state.enter_call().unwrap();
        let err = state.enter_call().unwrap_err();
        assert!(!err.is_catchable());
        assert_eq!(state.first_overflow_depth(), Some(3));
        state.exit_call();
        state.exit_call();
        assert_eq!(state.call_stack_depth(), 0);
    }

    #[test]
    fn capture_lookup_ignores_memoized_resolutions() {
        let mut state = State::new();
        // Memoize a miss and a pre-defined hit into the initial frame.
        state.find_value(id("ghost"));
        state.find_value(id("from"));
        assert_eq!(state.lookup_for_capture(id("ghost")), None);
        assert_eq!(state.lookup_for_capture(id("from")), None);
        // A real binding in the chain is found.
        state.scope().store(id("n"), Value::int(0));
        assert_eq!(state.lookup_for_capture(id("n")), Some(Value::int(0)));
    }
}
