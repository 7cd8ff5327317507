//! Tests for allocation on first invoke, suspension, and completion

use super::helpers::{ascending, entries, record, traced_ascending, Counter, Trace};
use crate::{Marker, Outcome, Routine, Status};

#[test]
fn test_routine_without_yields_finishes_on_first_invoke() {
    let routine = Routine::<Counter, i32>::builder("no_yields")
        .body(|b| b.exec(|s| s.idx = 42).finish())
        .build()
        .unwrap();

    let mut co = routine.spawn();
    assert_eq!(co.status(), Status::NotStarted);
    assert!(!co.is_active());

    assert_eq!(co.invoke().unwrap(), Outcome::Finished);
    assert!(!co.is_active());
    assert_eq!(co.status(), Status::Finished);
    assert!(co.fields().is_none());
}

#[test]
fn test_empty_uncancellable_routine_finishes() {
    let routine = Routine::<(), ()>::builder("empty")
        .uncancellable()
        .build()
        .unwrap();

    let mut co = routine.spawn();
    assert_eq!(co.invoke().unwrap(), Outcome::Finished);
    assert!(!co.is_active());
}

#[test]
fn test_ascending_yields_zero_through_nine_then_finishes() {
    let mut co = ascending().spawn();

    for expected in 0..10 {
        assert_eq!(co.invoke().unwrap(), Outcome::Yielded(expected));
        assert!(co.is_active(), "active after call {}", expected + 1);
    }

    assert_eq!(co.invoke().unwrap(), Outcome::Finished);
    assert!(!co.is_active());
}

#[test]
fn test_cleanup_runs_once_on_normal_completion() {
    let (mut co, trace) = traced_ascending();

    while co.invoke().unwrap() != Outcome::Finished {}

    assert_eq!(entries(&trace), vec!["cleanup at 10"]);
}

#[test]
fn test_status_tracks_marker() {
    let mut co = ascending().spawn();
    let next = co.routine().program().point("next").unwrap();

    assert_eq!(co.status(), Status::NotStarted);
    co.invoke().unwrap();
    assert_eq!(co.status(), Status::Suspended(Marker::At(next)));
    assert!(co.status().is_active());
}

#[test]
fn test_fields_persist_across_suspensions() {
    let mut co = ascending().spawn();

    co.invoke().unwrap();
    co.invoke().unwrap();
    co.invoke().unwrap();

    // Increment after the third yield has not run yet
    assert_eq!(co.fields().map(|s| s.idx), Some(2));
}

#[test]
fn test_store_is_allocated_lazily_from_seed() {
    let trace = Trace::default();
    let routine = Routine::<Counter, i32>::builder("seeded")
        .body(|b| {
            b.exec(|s| record(&s.trace, format!("start with {}", s.idx)))
                .yield_at("only", |s| s.idx * 2)
                .finish()
        })
        .build()
        .unwrap();

    let mut co = routine.spawn_with(Counter {
        idx: 21,
        trace: trace.clone(),
    });

    // Nothing runs until the first invoke
    assert!(entries(&trace).is_empty());
    assert!(co.fields().is_none());

    assert_eq!(co.invoke().unwrap(), Outcome::Yielded(42));
    assert_eq!(entries(&trace), vec!["start with 21"]);
}

#[test]
fn test_yielded_value_never_mistaken_for_finish() {
    // -1 is a perfectly valid yielded value
    let routine = Routine::<(), i32>::builder("negative")
        .body(|b| b.yield_at("minus_one", |_| -1).finish())
        .build()
        .unwrap();

    let mut co = routine.spawn();
    assert_eq!(co.invoke().unwrap(), Outcome::Yielded(-1));
    assert!(co.is_active());
    assert_eq!(co.invoke().unwrap(), Outcome::Finished);
}

#[test]
fn test_yields_words_of_seeded_sentence() {
    struct Words {
        text: String,
        pos: usize,
        word: String,
    }

    let routine = Routine::<Words, String>::builder("words")
        .body(|b| {
            b.repeat_while(
                |s| s.pos < s.text.len(),
                |b| {
                    b.exec(|s| {
                        let rest = &s.text[s.pos..];
                        let end = rest.find(' ').unwrap_or(rest.len());
                        s.word = rest[..end].to_string();
                        s.pos += end + 1;
                    })
                    .when(|s| s.word.is_empty(), |b| b.continue_loop())
                    .yield_at("word", |s| std::mem::take(&mut s.word))
                },
            )
            .finish()
        })
        .build()
        .unwrap();

    let mut co = routine.spawn_with(Words {
        text: "there is  a cow".to_string(),
        pos: 0,
        word: String::new(),
    });

    assert_eq!(
        super::helpers::drain(&mut co),
        vec!["there", "is", "a", "cow"]
    );
}
