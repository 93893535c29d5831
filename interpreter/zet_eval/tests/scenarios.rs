//! End-to-end scenarios exercising the closure, scope, and term contracts
//! together.

mod common;

use common::*;
use zet_eval::{State, Value};
use zet_ir::{BinaryOp, CatchKind, Param, ProcedureKind, Stmt};

/// A counter closure increments its captured variable across calls, and
/// the defining scope's binding tracks it.
#[test]
fn counter_closure_counts_and_updates_outer() {
    let mut state = State::new();
    run(
        &mut state,
        vec![
            assign("n", int(0)),
            assign(
                "mkc",
                procedure_lit(
                    ProcedureKind::Closure,
                    vec![],
                    vec![
                        assign("n", plus(var("n"), int(1))),
                        ret(var("n")),
                    ],
                ),
            ),
        ],
    );

    assert_eq!(eval(&mut state, call("mkc", vec![])), Value::int(1));
    assert_eq!(eval(&mut state, call("mkc", vec![])), Value::int(2));
    assert_eq!(eval(&mut state, call("mkc", vec![])), Value::int(3));
    assert_eq!(value_of(&mut state, "n"), Value::int(3));
}

/// Closures returned from separate calls of a factory own separate
/// captured maps and outlive their defining scope.
#[test]
fn factory_closures_count_independently() {
    let mut state = State::new();
    run(
        &mut state,
        vec![assign(
            "mk",
            procedure_lit(
                ProcedureKind::Procedure,
                vec![],
                vec![
                    assign("n", int(0)),
                    assign(
                        "c",
                        procedure_lit(
                            ProcedureKind::Closure,
                            vec![],
                            vec![
                                assign("n", plus(var("n"), int(1))),
                                ret(var("n")),
                            ],
                        ),
                    ),
                    ret(var("c")),
                ],
            ),
        )],
    );
    run(
        &mut state,
        vec![
            assign("c1", call("mk", vec![])),
            assign("c2", call("mk", vec![])),
        ],
    );

    assert_eq!(eval(&mut state, call("c1", vec![])), Value::int(1));
    assert_eq!(eval(&mut state, call("c1", vec![])), Value::int(2));
    assert_eq!(eval(&mut state, call("c2", vec![])), Value::int(1));
    assert_eq!(eval(&mut state, call("c1", vec![])), Value::int(3));
}

/// Iterator blocks keep the iteration variable local while updates to
/// enclosing variables write through.
#[test]
fn iterator_block_write_through() {
    let mut state = State::new();
    run(
        &mut state,
        vec![
            assign("s", int(0)),
            Stmt::For {
                variable: id("i"),
                collection: list(vec![int(1), int(2), int(3)]),
                body: block(vec![assign("s", plus(var("s"), var("i")))]),
            },
        ],
    );
    assert_eq!(value_of(&mut state, "s"), Value::int(6));
    // The iteration variable never leaked into the enclosing scope.
    assert_eq!(value_of(&mut state, "i"), Value::Om);
}

/// An outer binding of the iteration variable's name survives the loop.
#[test]
fn iterator_variable_shadows_outer_binding() {
    let mut state = State::new();
    run(
        &mut state,
        vec![
            assign("i", int(99)),
            Stmt::For {
                variable: id("i"),
                collection: list(vec![int(1), int(2)]),
                body: block(vec![]),
            },
        ],
    );
    assert_eq!(value_of(&mut state, "i"), Value::int(99));
}

/// A read-write parameter that is only read leaves the caller's value
/// untouched; one that is reassigned writes through.
#[test]
fn read_write_parameter_write_back() {
    let mut state = State::new();
    run(
        &mut state,
        vec![
            assign(
                "first",
                procedure_lit(
                    ProcedureKind::Procedure,
                    vec![Param::read_write(id("xs"))],
                    vec![ret(call("xs", vec![int(1)]))],
                ),
            ),
            assign("xs", list(vec![int(10), int(20), int(30)])),
        ],
    );

    assert_eq!(
        eval(&mut state, call("first", vec![var("xs")])),
        Value::int(10)
    );
    assert_eq!(
        value_of(&mut state, "xs"),
        Value::list(vec![Value::int(10), Value::int(20), Value::int(30)])
    );

    run(
        &mut state,
        vec![
            assign(
                "extend",
                procedure_lit(
                    ProcedureKind::Procedure,
                    vec![Param::read_write(id("xs"))],
                    vec![
                        assign_to(var("xs"), plus(var("xs"), list(vec![int(99)]))),
                        Stmt::Return(None),
                    ],
                ),
            ),
            expr_stmt(call("extend", vec![var("xs")])),
        ],
    );
    assert_eq!(
        value_of(&mut state, "xs"),
        Value::list(vec![
            Value::int(10),
            Value::int(20),
            Value::int(30),
            Value::int(99)
        ])
    );
}

/// A read-write argument that is a literal is copy-in only: the call
/// succeeds and nothing is written back.
#[test]
fn read_write_literal_argument_is_copy_in_only() {
    let mut state = State::new();
    run(
        &mut state,
        vec![assign(
            "extend",
            procedure_lit(
                ProcedureKind::Procedure,
                vec![Param::read_write(id("xs"))],
                vec![
                    assign_to(var("xs"), plus(var("xs"), list(vec![int(99)]))),
                    ret(var("xs")),
                ],
            ),
        )],
    );
    let result = eval(
        &mut state,
        call("extend", vec![list(vec![int(1), int(2)])]),
    );
    assert_eq!(
        result,
        Value::list(vec![Value::int(1), Value::int(2), Value::int(99)])
    );
}

/// Functions-only linking: the callee sees the caller's procedures but a
/// caller data binding resolves to om.
#[test]
fn functions_only_scope_linking() {
    let mut state = State::new();
    run(
        &mut state,
        vec![
            assign("v", int(42)),
            assign(
                "helper",
                procedure_lit(ProcedureKind::Procedure, vec![], vec![ret(int(7))]),
            ),
            assign(
                "read_v",
                procedure_lit(ProcedureKind::Procedure, vec![], vec![ret(var("v"))]),
            ),
            assign(
                "call_helper",
                procedure_lit(
                    ProcedureKind::Procedure,
                    vec![],
                    vec![ret(call("helper", vec![]))],
                ),
            ),
        ],
    );
    // v is shadowed to om inside the call; helper resolves fine.
    assert_eq!(eval(&mut state, call("read_v", vec![])), Value::Om);
    assert_eq!(eval(&mut state, call("call_helper", vec![])), Value::int(7));
    // The caller's own view of v is untouched.
    assert_eq!(value_of(&mut state, "v"), Value::int(42));
}

/// Procedures round-trip through their term form and the round-tripped
/// procedure behaves identically, write-back included.
#[test]
fn procedure_term_round_trip() {
    let mut state = State::new();
    run(
        &mut state,
        vec![assign(
            "p",
            procedure_lit(
                ProcedureKind::Procedure,
                vec![Param::by_value(id("x")), Param::read_write(id("y"))],
                vec![
                    assign_to(var("y"), plus(var("x"), int(1))),
                    ret(var("y")),
                ],
            ),
        )],
    );

    let p = value_of(&mut state, "p");
    let term = p.to_term(&state.global_scope()).unwrap();
    let q = Value::from_term(&term).unwrap();
    assert_eq!(p, q);

    state.put_value(id("q"), q);
    run(&mut state, vec![assign("y1", int(0)), assign("y2", int(0))]);
    let r1 = eval(&mut state, call("p", vec![int(5), var("y1")]));
    let r2 = eval(&mut state, call("q", vec![int(5), var("y2")]));
    assert_eq!(r1, r2);
    assert_eq!(value_of(&mut state, "y1"), Value::int(6));
    assert_eq!(value_of(&mut state, "y2"), Value::int(6));
}

/// `catchUsr` takes user-thrown errors, `catchLng` language errors.
#[test]
fn catch_selectivity() {
    let mut state = State::new();
    run(
        &mut state,
        vec![
            assign("r", int(0)),
            Stmt::TryCatch {
                attempt: block(vec![Stmt::Throw(str_lit("u"))]),
                branches: vec![
                    catch_branch(CatchKind::User, "e", vec![assign("r", int(1))]),
                    catch_branch(CatchKind::Language, "e", vec![assign("r", int(2))]),
                ],
            },
        ],
    );
    assert_eq!(value_of(&mut state, "r"), Value::int(1));
    // The thrown payload was bound in the user branch.
    assert_eq!(value_of(&mut state, "e"), Value::string("u"));

    run(
        &mut state,
        vec![Stmt::TryCatch {
            attempt: block(vec![assign(
                "x",
                bin(BinaryOp::Quotient, int(1), int(0)),
            )]),
            branches: vec![
                catch_branch(CatchKind::User, "e", vec![assign("r", int(3))]),
                catch_branch(CatchKind::Language, "e", vec![assign("r", int(4))]),
            ],
        }],
    );
    assert_eq!(value_of(&mut state, "r"), Value::int(4));
}

/// A plain `catch` takes both kinds.
#[test]
fn catch_any_takes_both_kinds() {
    let mut state = State::new();
    run(
        &mut state,
        vec![
            Stmt::TryCatch {
                attempt: block(vec![Stmt::Throw(int(1))]),
                branches: vec![catch_branch(CatchKind::Any, "e", vec![assign("a", int(1))])],
            },
            Stmt::TryCatch {
                attempt: block(vec![expr_stmt(bin(BinaryOp::Quotient, int(1), int(0)))]),
                branches: vec![catch_branch(CatchKind::Any, "e", vec![assign("b", int(2))])],
            },
        ],
    );
    assert_eq!(value_of(&mut state, "a"), Value::int(1));
    assert_eq!(value_of(&mut state, "b"), Value::int(2));
}

/// `global` promotion: a store inside a nested call updates the global
/// binding, observable after the call returns.
#[test]
fn global_promotion_is_visible_through_calls() {
    let mut state = State::new();
    run(
        &mut state,
        vec![
            Stmt::Global(id("counter")),
            assign(
                "bump",
                procedure_lit(
                    ProcedureKind::Procedure,
                    vec![],
                    vec![assign("counter", int(99)), Stmt::Return(None)],
                ),
            ),
            expr_stmt(call("bump", vec![])),
        ],
    );
    assert_eq!(value_of(&mut state, "counter"), Value::int(99));
    assert_eq!(
        state.global_scope().lookup_local(id("counter")),
        Some(Value::int(99))
    );
}

/// The pre-defined `from` reduces a read-write collection argument.
#[test]
fn pre_defined_from_reduces_the_caller_collection() {
    let mut state = State::new();
    run(
        &mut state,
        vec![
            assign("xs", list(vec![int(1), int(2), int(3)])),
            assign("taken", call("from", vec![var("xs")])),
        ],
    );
    assert_eq!(value_of(&mut state, "taken"), Value::int(3));
    assert_eq!(
        value_of(&mut state, "xs"),
        Value::list(vec![Value::int(1), Value::int(2)])
    );
}

/// Lambdas evaluate their single expression with by-value parameters.
#[test]
fn lambda_calls() {
    let mut state = State::new();
    run(
        &mut state,
        vec![assign(
            "double",
            procedure_lit(
                ProcedureKind::Lambda,
                vec![Param::by_value(id("x"))],
                vec![ret(bin(BinaryOp::Product, var("x"), int(2)))],
            ),
        )],
    );
    assert_eq!(eval(&mut state, call("double", vec![int(21)])), Value::int(42));
}

/// `print` goes through the host output channel.
#[test]
fn print_uses_the_host_channel() {
    let buffer = zet_eval::buffer_handler();
    let mut state = State::with_print(buffer.clone());
    run(
        &mut state,
        vec![
            expr_stmt(call("print", vec![str_lit("hello")])),
            expr_stmt(call("print", vec![int(42)])),
        ],
    );
    assert_eq!(buffer.contents(), "hello\n42\n");
}
