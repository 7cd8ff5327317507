//! Tests for deferred, cooperative cancellation

use super::helpers::{entries, record, traced_ascending, Counter, Trace};
use crate::{Marker, Outcome, Routine, Status};

#[test]
fn test_cancel_after_three_yields() {
    let (mut co, trace) = traced_ascending();

    let mut yields = 0;
    for _ in 0..3 {
        if let Outcome::Yielded(_) = co.invoke().unwrap() {
            yields += 1;
        }
    }
    co.cancel().unwrap();

    assert_eq!(co.invoke().unwrap(), Outcome::Finished);
    assert_eq!(yields, 3);
    assert!(!co.is_active());
    // Only the cleanup ran; the loop increment after the third yield did not
    assert_eq!(entries(&trace), vec!["cleanup at 2"]);
}

#[test]
fn test_cancel_runs_no_code_and_keeps_store() {
    let (mut co, trace) = traced_ascending();
    co.invoke().unwrap();

    co.cancel().unwrap();

    assert!(co.is_active());
    assert_eq!(co.status(), Status::Suspended(Marker::Finish));
    assert_eq!(co.fields().map(|s| s.idx), Some(0));
    assert!(entries(&trace).is_empty());
}

#[test]
fn test_cancel_twice_before_invoke() {
    let (mut co, trace) = traced_ascending();
    co.invoke().unwrap();

    co.cancel().unwrap();
    co.cancel().unwrap();

    assert_eq!(co.invoke().unwrap(), Outcome::Finished);
    assert_eq!(entries(&trace), vec!["cleanup at 0"]);
}

#[test]
fn test_stop_runs_cleanup_immediately() {
    let (mut co, trace) = traced_ascending();
    co.invoke().unwrap();
    co.invoke().unwrap();

    co.stop().unwrap();

    assert_eq!(co.status(), Status::Finished);
    assert_eq!(entries(&trace), vec!["cleanup at 1"]);
}

#[test]
fn test_cleanup_may_span_several_statements() {
    let trace = Trace::default();
    let routine = Routine::<Counter, i32>::builder("multi_cleanup")
        .body(|b| {
            b.forever(|b| b.yield_at("tick", |s| s.idx).exec(|s| s.idx += 1))
                .finish()
                .exec(|s| record(&s.trace, "close"))
                .when(|s| s.idx > 0, |b| b.exec(|s| record(&s.trace, "flush")))
                .exec(|s| record(&s.trace, "done"))
        })
        .build()
        .unwrap();

    let mut co = routine.spawn_with(Counter {
        idx: 0,
        trace: trace.clone(),
    });
    co.invoke().unwrap();
    co.invoke().unwrap();
    co.cancel().unwrap();

    assert_eq!(co.invoke().unwrap(), Outcome::Finished);
    assert_eq!(entries(&trace), vec!["close", "flush", "done"]);
}

#[test]
fn test_cancel_is_independent_of_yielded_values() {
    // The caller decides when to stop; the mechanism never inspects values
    let (mut co, trace) = traced_ascending();

    let mut seen = Vec::new();
    while let Outcome::Yielded(v) = co.invoke().unwrap() {
        seen.push(v);
        if v == 5 {
            co.cancel().unwrap();
        }
    }

    assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(entries(&trace), vec!["cleanup at 5"]);
}

#[test]
fn test_dropping_suspended_handle_skips_cleanup() {
    let (mut co, trace) = traced_ascending();
    co.invoke().unwrap();

    drop(co);

    assert!(entries(&trace).is_empty());
}
