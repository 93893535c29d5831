//! The procedure call protocol.
//!
//! Every call, user-defined or pre-defined, runs the same outer shape:
//! bump the call depth, remember the caller scope, do the work, then - on
//! success and error alike - restore the caller scope, apply any
//! read-write write-back, and drop the depth. The teardown runs in
//! straight-line code after the fallible part, so every exit path passes
//! through it.
//!
//! For a user-defined procedure the fallible part is:
//!
//! 1. link a functions-only child of the caller as the callee scope (and,
//!    for method dispatch, preload the receiver's members and `this`),
//! 2. for a closure, realize the captured view: each captured binding is
//!    assigned into the callee chain, never into the caller's own frames,
//! 3. bind parameters - by-value parameters get a deep clone, read-write
//!    parameters the original - and release the argument values,
//! 4. run the body with stack headroom ensured,
//! 5. on normal completion, collect read-write post-values into the
//!    write-back agent and refresh the closure's captured map from the
//!    callee, synchronizing any still-live defining bindings.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use zet_ir::{Expr, Ident, Param, ParamMode};
use zet_rt::builtin::PreDefinedFunction;
use zet_rt::{param, ObjectValue, Procedure, Scope, Value};

use crate::errors::{language_error, EvalResult};
use crate::exec::{assign, exec_block, ControlMessage};
use crate::{stack, State};

/// Queue of `{l-value expression, post value}` pairs applied to the caller
/// scope after it is restored. Entries whose expression is not assignable
/// are dropped silently: that argument was copy-in only.
#[derive(Default)]
pub struct WriteBackAgent {
    entries: Vec<(Expr, Value)>,
}

impl WriteBackAgent {
    pub fn new() -> WriteBackAgent {
        WriteBackAgent::default()
    }

    /// Queue `post` for the l-value derived from `expr`.
    pub fn add(&mut self, expr: Expr, post: Value) {
        self.entries.push((expr, post));
    }

    /// Apply every entry to the active scope through the ordinary
    /// assignment machinery. Assignment failures are swallowed; write-back
    /// is best effort by design.
    pub fn apply(self, state: &mut State) {
        for (expr, post) in self.entries {
            if assign::is_assignable(&expr) {
                let _ = assign::assign(state, &expr, post);
            }
        }
    }
}

/// Call a user-defined procedure.
///
/// `arg_exprs` are the original argument expressions (the write-back
/// l-values), `values` their evaluated results, index-aligned.
#[tracing::instrument(level = "debug", skip_all)]
pub fn call_procedure(
    state: &mut State,
    procedure: &Rc<Procedure>,
    arg_exprs: &[Expr],
    values: Vec<Value>,
    bound_object: Option<ObjectValue>,
) -> EvalResult {
    check_arity(procedure.params().len(), values.len(), || {
        procedure.to_string()
    })?;

    state.enter_call()?;
    let caller = state.scope();
    let (result, write_back) =
        run_call(state, &caller, procedure, arg_exprs, values, bound_object);

    // Guaranteed teardown: restore, write back, then drop the depth.
    state.set_scope(caller);
    if let Some(agent) = write_back {
        agent.apply(state);
    }
    state.exit_call();
    result
}

fn run_call(
    state: &mut State,
    caller: &Scope,
    procedure: &Rc<Procedure>,
    arg_exprs: &[Expr],
    values: Vec<Value>,
    bound_object: Option<ObjectValue>,
) -> (EvalResult, Option<WriteBackAgent>) {
    let callee = caller.new_functions_only_child();
    if let Some(receiver) = &bound_object {
        // Method dispatch: the receiver's members and `this` are visible
        // in the callee frame.
        for (id, member) in receiver.member_entries() {
            callee.cache(id, member);
        }
        callee.cache(Ident::new("this"), Value::Object(receiver.clone()));
    }
    state.set_scope(callee.clone());

    // Realize the captured view exactly at call entry. A captured name
    // still bound (to a defined value) and visible in the caller chain is
    // live: its current value wins over the stored one, so outer writes
    // between calls are observed. The probe honors functions-only links,
    // which keeps unrelated callers' data out.
    if let Some(captured) = procedure.captured_entries() {
        let initial = state.initial_scope();
        for (id, stored) in captured {
            let value = match caller.probe_below(&initial, id) {
                Some(live) if !live.is_om() => live,
                _ => stored,
            };
            callee.assign_uncloned_up_to(caller, id, value);
        }
    }

    let params = procedure.params();
    let mut rw_indices = Vec::new();
    for (i, (p, value)) in params.iter().zip(values.into_iter()).enumerate() {
        match p.mode {
            ParamMode::Value => param::assign_into(p, &callee, value.clone_deep()),
            ParamMode::ReadWrite => {
                param::assign_into(p, &callee, value);
                rw_indices.push(i);
            }
        }
    }
    // The argument values are consumed; nothing outlives the bindings.

    let body_outcome =
        stack::ensure_sufficient_stack(|| exec_block(state, procedure.body()));
    let message = match body_outcome {
        Ok(message) => message,
        Err(error) => return (Err(error), None),
    };

    // Collect read-write post-values for the caller.
    let mut write_back = None;
    if !rw_indices.is_empty() {
        let mut agent = WriteBackAgent::new();
        for &i in &rw_indices {
            let post = param::read_back(&params[i], &callee);
            agent.add(arg_exprs[i].clone(), post);
        }
        write_back = Some(agent);
    }

    // Refresh the closure's captured map from the callee, and keep any
    // still-live defining binding in sync with it.
    if procedure.is_closure() {
        let initial = state.initial_scope();
        let mut refreshed = FxHashMap::default();
        for id in procedure.captured_names() {
            let post = state.find_value(id);
            caller.assign_existing(&initial, id, post.clone());
            refreshed.insert(id, post);
        }
        procedure.refresh_captured(refreshed);
    }

    let result = match message {
        Some(ControlMessage::Return(payload)) => payload,
        _ => Value::Om,
    };
    (Ok(result), write_back)
}

/// Call a pre-defined function. It runs in the caller's scope; write-back
/// pairs its declared read-write parameters, in declaration order, with
/// the values the function appended.
#[tracing::instrument(level = "debug", skip_all, fields(name = builtin.name()))]
pub fn call_builtin(
    state: &mut State,
    builtin: &'static dyn PreDefinedFunction,
    arg_exprs: &[Expr],
    values: Vec<Value>,
) -> EvalResult {
    let params: &[Param] = builtin.params();
    check_arity(params.len(), values.len(), || builtin.name().to_string())?;

    state.enter_call()?;

    let mut args = Vec::with_capacity(values.len());
    let mut rw_exprs = Vec::new();
    for (i, (p, value)) in params.iter().zip(values.into_iter()).enumerate() {
        match p.mode {
            ParamMode::Value => args.push(value.clone_deep()),
            ParamMode::ReadWrite => {
                rw_exprs.push(&arg_exprs[i]);
                args.push(value);
            }
        }
    }

    let mut write_back_values = Vec::new();
    let result = builtin.execute(args, &mut write_back_values, state.print_handler());

    if result.is_ok() {
        let mut agent = WriteBackAgent::new();
        for (expr, post) in rw_exprs.into_iter().zip(write_back_values) {
            agent.add(expr.clone(), post);
        }
        agent.apply(state);
    }
    state.exit_call();
    result
}

fn check_arity(
    expected: usize,
    got: usize,
    describe: impl FnOnce() -> String,
) -> EvalResult<()> {
    if expected != got {
        return Err(language_error(format!(
            "'{}' is defined with {expected} instead of {got} parameters",
            describe()
        )));
    }
    Ok(())
}
