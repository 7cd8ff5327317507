//! Test helpers
//!
//! Shared routines and a trace log that routine bodies write into, so tests
//! can see exactly which statements ran in which pass.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::MisusePolicy;
use crate::{Coroutine, Outcome, Routine};

/// Statements a routine body executed, in order
pub type Trace = Rc<RefCell<Vec<String>>>;

pub fn record(trace: &Trace, entry: impl Into<String>) {
    trace.borrow_mut().push(entry.into());
}

pub fn entries(trace: &Trace) -> Vec<String> {
    trace.borrow().clone()
}

#[derive(Default)]
pub struct Counter {
    pub idx: i32,
    pub trace: Trace,
}

/// Yields 0..10, then logs its cleanup
pub fn ascending() -> Routine<Counter, i32> {
    Routine::<Counter, i32>::builder("ascending")
        .body(|b| {
            b.exec(|s| s.idx = 0)
                .repeat_while(
                    |s| s.idx < 10,
                    |b| b.yield_at("next", |s| s.idx).exec(|s| s.idx += 1),
                )
                .finish()
                .exec(|s| {
                    let entry = format!("cleanup at {}", s.idx);
                    record(&s.trace, entry)
                })
        })
        .build()
        .expect("ascending routine is valid")
}

/// Spawn `ascending` with a trace the test can read back
pub fn traced_ascending() -> (Coroutine<Counter, i32>, Trace) {
    let trace = Trace::default();
    let co = ascending().spawn_with(Counter {
        idx: 0,
        trace: Rc::clone(&trace),
    });
    (co, trace)
}

/// Invoke until finished, collecting every yielded value
pub fn drain<S, Y>(co: &mut Coroutine<S, Y>) -> Vec<Y> {
    let mut values = Vec::new();
    while let Outcome::Yielded(v) = co.invoke().expect("invoke on a live handle") {
        values.push(v);
    }
    values
}

/// Handle that reports misuse instead of panicking
pub fn reporting<S, Y>(co: Coroutine<S, Y>) -> Coroutine<S, Y> {
    co.with_policy(MisusePolicy::Report)
}
