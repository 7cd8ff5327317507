//! Lifecycle & cancellation controller
//!
//! A [`Coroutine`] is the caller-owned handle of one coroutine instance. It
//! allocates the context store on the first invocation, drops it when the
//! body completes, and records cancellation requests for the next pass.
//!
//! Invocation takes `&mut self` and handles are not `Clone`, so invoking one
//! instance from two places at once cannot be expressed.

use std::fmt;
use std::mem;

use crate::config::MisusePolicy;
use crate::context::ContextStore;
use crate::dispatch::{self, Transfer};
use crate::errors::UsageError;
use crate::init;
use crate::outcome::{Outcome, Status};
use crate::routine::Routine;

/// Produces the persistent fields when the store is allocated
type Seed<S> = Box<dyn FnOnce() -> S>;

enum Slot<S> {
    NotStarted(Seed<S>),
    Active(Box<ContextStore<S>>),
    Finished,
}

impl<S> Slot<S> {
    /// Allocate the store if needed and borrow it; `None` once finished
    fn activate(&mut self) -> Option<&mut ContextStore<S>> {
        if let Slot::NotStarted(_) = self {
            if let Slot::NotStarted(seed) = mem::replace(self, Slot::Finished) {
                *self = Slot::Active(Box::new(ContextStore::new(seed())));
            }
        }
        match self {
            Slot::Active(store) => Some(&mut **store),
            Slot::NotStarted(_) | Slot::Finished => None,
        }
    }
}

/// Handle of one coroutine instance
pub struct Coroutine<S, Y> {
    routine: Routine<S, Y>,
    slot: Slot<S>,
    policy: MisusePolicy,
}

impl<S: 'static, Y> Coroutine<S, Y> {
    /// Handle whose persistent fields start out as `S::default()`
    pub fn new(routine: Routine<S, Y>) -> Self
    where
        S: Default,
    {
        Self::seeded(routine, Box::new(S::default))
    }

    /// Handle whose persistent fields start out as `fields`
    pub fn with_fields(routine: Routine<S, Y>, fields: S) -> Self {
        Self::seeded(routine, Box::new(move || fields))
    }

    fn seeded(routine: Routine<S, Y>, seed: Seed<S>) -> Self {
        Self {
            routine,
            slot: Slot::NotStarted(seed),
            policy: init::current_config().misuse,
        }
    }
}

impl<S, Y> Coroutine<S, Y> {
    /// Override the configured misuse policy for this handle
    pub fn with_policy(mut self, policy: MisusePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the routine until its next suspension point or completion
    ///
    /// The first call allocates the context store and starts at the top of
    /// the body; later calls resume right after the last suspension point.
    /// Invoking a finished handle is a usage error and runs no code.
    pub fn invoke(&mut self) -> Result<Outcome<Y>, UsageError> {
        let starting = matches!(self.slot, Slot::NotStarted(_));
        let Some(store) = self.slot.activate() else {
            return self.misuse(UsageError::InvokeFinished {
                routine: self.routine.name().to_string(),
            });
        };
        if starting {
            tracing::debug!(routine = self.routine.name(), "coroutine started");
        }

        match dispatch::run(&self.routine, store) {
            Transfer::Suspend(value) => Ok(Outcome::Yielded(value)),
            Transfer::Complete => {
                // Dropping the store here is the only normal release path.
                self.slot = Slot::Finished;
                tracing::debug!(routine = self.routine.name(), "coroutine finished");
                Ok(Outcome::Finished)
            }
        }
    }

    /// Request cancellation
    ///
    /// Runs nothing and frees nothing: the next [`invoke`](Self::invoke)
    /// jumps straight to FINISH, runs the cleanup after it, and returns
    /// [`Outcome::Finished`].
    pub fn cancel(&mut self) -> Result<(), UsageError> {
        if !self.routine.is_cancellable() {
            return self.misuse(UsageError::NotCancellable {
                routine: self.routine.name().to_string(),
            });
        }
        if !self.is_active() {
            return self.misuse(UsageError::CancelInactive {
                routine: self.routine.name().to_string(),
            });
        }
        if let Slot::Active(store) = &mut self.slot {
            tracing::debug!(
                routine = self.routine.name(),
                marker = %store.marker(),
                "cancellation requested"
            );
            store.request_finish();
        }
        Ok(())
    }

    /// Cancel and immediately run the cleanup code
    pub fn stop(&mut self) -> Result<(), UsageError> {
        self.cancel()?;
        let outcome = self.invoke()?;
        debug_assert!(outcome.is_finished(), "cleanup after FINISH suspended");
        Ok(())
    }

    /// True iff this handle currently owns a context store
    pub fn is_active(&self) -> bool {
        matches!(self.slot, Slot::Active(_))
    }

    pub fn status(&self) -> Status {
        match &self.slot {
            Slot::NotStarted(_) => Status::NotStarted,
            Slot::Active(store) => Status::Suspended(store.marker()),
            Slot::Finished => Status::Finished,
        }
    }

    /// Persistent fields of a suspended instance
    pub fn fields(&self) -> Option<&S> {
        match &self.slot {
            Slot::Active(store) => Some(store.fields()),
            Slot::NotStarted(_) | Slot::Finished => None,
        }
    }

    pub fn routine(&self) -> &Routine<S, Y> {
        &self.routine
    }

    pub fn policy(&self) -> MisusePolicy {
        self.policy
    }

    /// Values yielded from here until the routine finishes
    pub fn iter(&mut self) -> Iter<'_, S, Y> {
        Iter { co: self }
    }

    fn misuse<T>(&self, error: UsageError) -> Result<T, UsageError> {
        match self.policy {
            MisusePolicy::Panic => panic!("{error}"),
            MisusePolicy::Report => {
                tracing::warn!(%error, "coroutine misuse");
                Err(error)
            }
        }
    }
}

impl<S, Y> Drop for Coroutine<S, Y> {
    fn drop(&mut self) {
        if let Slot::Active(store) = &self.slot {
            tracing::debug!(
                routine = self.routine.name(),
                marker = %store.marker(),
                "dropping suspended coroutine without cleanup"
            );
        }
    }
}

impl<S, Y> fmt::Debug for Coroutine<S, Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coroutine")
            .field("routine", &self.routine.name())
            .field("status", &self.status())
            .field("policy", &self.policy)
            .finish()
    }
}

/// Iterator over the values a coroutine yields
pub struct Iter<'a, S, Y> {
    co: &'a mut Coroutine<S, Y>,
}

impl<S, Y> Iterator for Iter<'_, S, Y> {
    type Item = Y;

    fn next(&mut self) -> Option<Y> {
        if self.co.status() == Status::Finished {
            return None;
        }
        self.co.invoke().ok().and_then(Outcome::yielded)
    }
}

impl<'a, S, Y> IntoIterator for &'a mut Coroutine<S, Y> {
    type Item = Y;
    type IntoIter = Iter<'a, S, Y>;

    fn into_iter(self) -> Iter<'a, S, Y> {
        self.iter()
    }
}
