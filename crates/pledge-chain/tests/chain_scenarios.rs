//! End-to-end scenarios across the full settlement surface.
//!
//! These tests exercise complete chains the way a caller would build them:
//! registration, settlement, chained derivation, thenable adoption, and
//! AND-join composition. The unit modules cover the same machinery
//! piecewise; here the pieces run together.

use std::cell::RefCell;
use std::rc::Rc;

use pledge_chain::{Handler, Settlable, join};
use pledge_types::{PledgeError, SettleState};

/// Install a test subscriber so `RUST_LOG=debug` surfaces settlement logs.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Helper: shared append-only log written by continuations.
#[derive(Clone, Default)]
struct TraceLog(Rc<RefCell<String>>);

impl TraceLog {
    fn new() -> Self {
        Self::default()
    }

    fn push(&self, tag: &str) {
        self.0.borrow_mut().push_str(tag);
    }

    fn contents(&self) -> String {
        self.0.borrow().clone()
    }

    /// A pass-through handler that appends `tag` when it fires.
    fn mark(&self, tag: &'static str) -> Handler<&'static str, &'static str, &'static str> {
        let log = self.clone();
        Handler::call(move |value| {
            log.push(tag);
            value
        })
    }
}

// =============================================================================
// Scenario: basic resolve fires the success branch only
// =============================================================================
#[test]
fn resolve_runs_the_success_branch() {
    init_tracing();
    let log = TraceLog::new();
    let p = Settlable::<&str, &str>::new();

    p.then(log.mark("a"), log.mark("b"));
    assert_eq!(log.contents(), "", "Nothing fires before settlement");

    p.resolve("go");
    assert_eq!(log.contents(), "a");
}

// =============================================================================
// Scenario: basic reject fires the error branch only
// =============================================================================
#[test]
fn reject_runs_the_error_branch() {
    init_tracing();
    let log = TraceLog::new();
    let p = Settlable::<&str, &str>::new();

    p.then(log.mark("a"), log.mark("b"));
    assert_eq!(log.contents(), "", "Nothing fires before settlement");

    p.reject("stop");
    assert_eq!(log.contents(), "b");
}

// =============================================================================
// Scenario: join derives a new, distinct, pending instance
// =============================================================================
#[test]
fn join_derives_a_new_instance() {
    init_tracing();
    let p1 = Settlable::<&str, &str>::new();
    let joined = join(&[p1.clone()]);

    assert!(joined.is_pending());
    assert!(p1.is_pending());

    // Settling the input settles the derived join, not the other way round.
    p1.resolve("go");
    assert_eq!(joined.value(), Some(vec!["go"]));
}

// =============================================================================
// Scenario: AND-join resolves only after every input
// =============================================================================
#[test]
fn join_waits_for_every_input() {
    init_tracing();
    let log = TraceLog::new();
    let p1 = Settlable::<&str, &str>::new();
    let p2 = Settlable::<&str, &str>::new();

    let ok = log.clone();
    let err = log.clone();
    join(&[p1.clone(), p2.clone()]).then(
        Handler::call(move |values: Vec<&str>| {
            ok.push("a");
            values
        }),
        Handler::call(move |_reason: &str| {
            err.push("b");
            Vec::new()
        }),
    );

    assert_eq!(log.contents(), "");
    p1.resolve("x");
    assert_eq!(log.contents(), "", "One of two inputs is not enough");
    p2.resolve("y");
    assert_eq!(log.contents(), "a");
}

// =============================================================================
// Scenario: race-to-reject — the first input rejecting settles the join
// =============================================================================
#[test]
fn join_rejects_when_the_first_input_rejects() {
    init_tracing();
    let log = TraceLog::new();
    let p1 = Settlable::<&str, &str>::new();
    let p2 = Settlable::<&str, &str>::new();

    let ok = log.clone();
    let err = log.clone();
    join(&[p1.clone(), p2.clone()]).then(
        Handler::call(move |values: Vec<&str>| {
            ok.push("a");
            values
        }),
        Handler::call(move |_reason: &str| {
            err.push("b");
            Vec::new()
        }),
    );

    assert_eq!(log.contents(), "");
    p1.reject("stop");
    assert_eq!(log.contents(), "b", "No waiting on the other input");
    assert!(p2.is_pending());
}

// =============================================================================
// Scenario: race-to-reject is order-independent — the other input too
// =============================================================================
#[test]
fn join_rejects_when_the_other_input_rejects() {
    init_tracing();
    let log = TraceLog::new();
    let p1 = Settlable::<&str, &str>::new();
    let p2 = Settlable::<&str, &str>::new();

    let ok = log.clone();
    let err = log.clone();
    join(&[p1.clone(), p2.clone()]).then(
        Handler::call(move |values: Vec<&str>| {
            ok.push("a");
            values
        }),
        Handler::call(move |_reason: &str| {
            err.push("b");
            Vec::new()
        }),
    );

    assert_eq!(log.contents(), "");
    p2.reject("stop");
    assert_eq!(log.contents(), "b");
    assert!(p1.is_pending());
}

// =============================================================================
// Scenario: registration order is preserved across independent chains
// =============================================================================
#[test]
fn preserves_order_across_independent_chains() {
    init_tracing();
    let log = TraceLog::new();
    let p1 = Settlable::<&str, &str>::new();
    let p2 = Settlable::<&str, &str>::new();

    p1.then_resolve(log.mark("a"));
    p1.then_resolve(log.mark("b"));
    p2.then_resolve(log.mark("c"));
    p2.then_resolve(log.mark("d"));
    p1.then_resolve(log.mark("e")).then_resolve(Handler::adopt(&p2));

    assert_eq!(log.contents(), "");
    p1.resolve("go");
    assert_eq!(log.contents(), "abe", "p2's continuations must not fire yet");
    assert!(p2.is_pending());

    p2.resolve("go");
    assert_eq!(log.contents(), "abecd");
}

// =============================================================================
// Scenario: values forward through thenable adoption and return values
// =============================================================================
#[test]
fn forwards_values_through_adoption() {
    init_tracing();
    let result = TraceLog::new();
    let p1 = Settlable::<&str, &str>::new();
    let p2 = Settlable::<&str, &str>::new();

    let ok = result.clone();
    let err = result.clone();
    p1.then_resolve(Handler::adopt(&p2))
        .then_resolve(Handler::call(|value: &str| {
            assert_eq!(value, "a");
            format!("{value}b")
        }))
        .then(
            Handler::call(move |value: String| {
                assert_eq!(value, "ab");
                let full = format!("{value}c");
                ok.push(&full);
                full
            }),
            Handler::call(move |reason: &str| {
                err.push(reason);
                String::new()
            }),
        );

    assert_eq!(result.contents(), "");
    p1.resolve("ignored");
    assert_eq!(
        result.contents(),
        "",
        "The derived chain waits on the adopted instance"
    );
    p2.resolve("a");
    assert_eq!(result.contents(), "abc");
}

// =============================================================================
// Scenario: rejection short-circuits past an adopted instance
// =============================================================================
#[test]
fn rejection_short_circuits_past_adoption() {
    init_tracing();
    let result = TraceLog::new();
    let p1 = Settlable::<&str, &str>::new();
    let p2 = Settlable::<&str, &str>::new();

    let ok = result.clone();
    let err = result.clone();
    p1.then_resolve(Handler::adopt(&p2))
        .then_resolve(Handler::call(|value: &str| format!("{value}b")))
        .then(
            Handler::call(move |value: String| {
                ok.push(&value);
                value
            }),
            Handler::call(move |reason: &str| {
                err.push(&format!("error: {reason}"));
                String::new()
            }),
        );

    p1.reject("testing");
    assert_eq!(result.contents(), "error: testing");
    assert!(p2.is_pending(), "The adopted instance never needs to settle");
}

// =============================================================================
// Scenario: one-shot settlement holds across the whole surface
// =============================================================================
#[test]
fn settlement_is_one_shot_end_to_end() {
    init_tracing();
    let log = TraceLog::new();
    let p = Settlable::<&str, &str>::new();

    p.then(log.mark("a"), log.mark("b"));

    p.resolve("first");
    p.resolve("second");
    p.reject("late");

    assert_eq!(log.contents(), "a", "Continuations fire exactly once");
    assert_eq!(p.state(), SettleState::Resolved);
    assert_eq!(p.value(), Some("first"));

    let err = p.try_reject("still late").unwrap_err();
    assert_eq!(
        err,
        PledgeError::AlreadySettled {
            state: SettleState::Resolved
        }
    );
}

// =============================================================================
// Scenario: continuations registered after settlement fire immediately
// =============================================================================
#[test]
fn late_registration_fires_at_registration_time() {
    init_tracing();
    let log = TraceLog::new();
    let p = Settlable::<&str, &str>::new();

    p.resolve("go");
    p.then(log.mark("a"), log.mark("b"));
    assert_eq!(log.contents(), "a", "No queueing once settled");
}
