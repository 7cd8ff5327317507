//! # cco - reentrant stackless coroutines
//!
//! A coroutine here is a routine body that suspends at labelled points,
//! hands a value to its caller, and on the next invocation resumes right
//! after the point it left. No stack is saved: each instance keeps only a
//! resumption marker and its persistent fields in a heap-allocated context
//! store, much like a hand-written state machine.
//!
//! ## Pipeline
//!
//! ```text
//! RoutineBuilder → Validator → Program (lowered) → Routine
//!                                                   │ spawn
//! caller → Coroutine::invoke → dispatch::run → Outcome
//! ```
//!
//! 1. [`routine`] - body definition, definition-time validation, lowering
//! 2. `dispatch` - marker → instruction index, run to the next suspension
//! 3. [`handle`] - allocation on first invoke, release on completion,
//!    deferred cancellation
//! 4. [`config`] / [`init`] - misuse policy and logging setup
//!
//! Everything is single-threaded and cooperative: a coroutine advances only
//! when its owner invokes it.

pub mod config;
pub mod context;
mod dispatch;
pub mod errors;
pub mod handle;
pub mod init;
pub mod marker;
pub mod outcome;
pub mod routine;

#[cfg(test)]
mod tests;

pub use context::ContextStore;
pub use errors::{DefinitionError, UsageError};
pub use handle::{Coroutine, Iter};
pub use marker::{Marker, PointId};
pub use outcome::{Outcome, Status};
pub use routine::{Block, Routine, RoutineBuilder};
