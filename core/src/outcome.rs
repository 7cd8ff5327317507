//! Invocation results and handle status

use crate::marker::Marker;

/// Result of one invocation
///
/// The discriminant is independent of the yielded value's domain, so a
/// routine may yield any value of `Y` without it being mistaken for
/// completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<Y> {
    /// The routine suspended and produced a value
    Yielded(Y),
    /// The routine reached FINISH or the end of its body
    Finished,
}

impl<Y> Outcome<Y> {
    pub fn is_finished(&self) -> bool {
        matches!(self, Outcome::Finished)
    }

    /// The yielded value, if any
    pub fn yielded(self) -> Option<Y> {
        match self {
            Outcome::Yielded(v) => Some(v),
            Outcome::Finished => None,
        }
    }
}

/// Lifecycle state of a coroutine handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Never invoked; no context store exists yet
    NotStarted,
    /// Owns a context store and resumes at the given marker
    Suspended(Marker),
    /// Ran to completion; the context store is gone
    Finished,
}

impl Status {
    pub fn is_active(self) -> bool {
        matches!(self, Status::Suspended(_))
    }
}
