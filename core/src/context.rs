//! Context Store
//!
//! The persistent record of one suspended coroutine instance: its
//! resumption marker plus the user-declared fields that survive across
//! suspensions. A store is owned by exactly one handle and is never shared.

use crate::marker::Marker;

/// Persistent state of one coroutine instance
#[derive(Debug)]
pub struct ContextStore<S> {
    /// Where the next invocation resumes
    pub(crate) marker: Marker,

    /// User-declared persistent fields
    pub(crate) fields: S,
}

impl<S> ContextStore<S> {
    /// Fresh store positioned at the top of the body
    pub(crate) fn new(fields: S) -> Self {
        Self {
            marker: Marker::Start,
            fields,
        }
    }

    pub fn marker(&self) -> Marker {
        self.marker
    }

    pub fn fields(&self) -> &S {
        &self.fields
    }

    /// Record a cancellation request; honored by the next dispatch
    pub(crate) fn request_finish(&mut self) {
        self.marker = Marker::Finish;
    }
}
