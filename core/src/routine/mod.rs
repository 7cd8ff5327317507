//! Routine definitions
//!
//! A [`Routine`] is the validated, lowered form of a coroutine body. It is
//! immutable and cheap to clone; every [`Coroutine`] spawned from it gets its
//! own context store.

pub mod ast;
pub mod builder;
pub mod program;
pub mod validator;

use std::fmt;
use std::rc::Rc;

pub use ast::{Shape, Stmt};
pub use builder::{Block, RoutineBuilder};
pub use program::Program;

use crate::handle::Coroutine;

struct RoutineDef<S, Y> {
    name: String,
    cancellable: bool,
    program: Program<S, Y>,
}

/// A validated coroutine body
pub struct Routine<S, Y> {
    def: Rc<RoutineDef<S, Y>>,
}

impl<S, Y> Routine<S, Y> {
    pub fn builder(name: impl Into<String>) -> RoutineBuilder<S, Y> {
        RoutineBuilder::new(name)
    }

    pub(crate) fn from_parts(name: String, cancellable: bool, program: Program<S, Y>) -> Self {
        Self {
            def: Rc::new(RoutineDef {
                name,
                cancellable,
                program,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn is_cancellable(&self) -> bool {
        self.def.cancellable
    }

    pub fn program(&self) -> &Program<S, Y> {
        &self.def.program
    }

    /// Handle whose persistent fields start out as `S::default()`
    pub fn spawn(&self) -> Coroutine<S, Y>
    where
        S: Default + 'static,
    {
        Coroutine::new(self.clone())
    }

    /// Handle whose persistent fields start out as `fields`
    pub fn spawn_with(&self, fields: S) -> Coroutine<S, Y>
    where
        S: 'static,
    {
        Coroutine::with_fields(self.clone(), fields)
    }
}

impl<S, Y> Clone for Routine<S, Y> {
    fn clone(&self) -> Self {
        Self {
            def: Rc::clone(&self.def),
        }
    }
}

impl<S, Y> fmt::Debug for Routine<S, Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routine")
            .field("name", &self.def.name)
            .field("cancellable", &self.def.cancellable)
            .field("points", &self.def.program.point_count())
            .finish()
    }
}
