//! Routine definition API
//!
//! ```
//! use cco_core::routine::Routine;
//! use cco_core::Outcome;
//!
//! #[derive(Default)]
//! struct Ascending {
//!     idx: i32,
//! }
//!
//! let ascending = Routine::<Ascending, i32>::builder("ascending")
//!     .body(|b| {
//!         b.exec(|s| s.idx = 0)
//!             .repeat_while(
//!                 |s| s.idx < 10,
//!                 |b| b.yield_at("next", |s| s.idx).exec(|s| s.idx += 1),
//!             )
//!             .finish()
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut co = ascending.spawn();
//! assert_eq!(co.invoke().unwrap(), Outcome::Yielded(0));
//! ```

use super::ast::{shapes, Stmt};
use super::program::Program;
use super::validator::{Outline, Validator};
use super::Routine;
use crate::errors::DefinitionError;

/// Sequence of statements under construction
pub struct Block<S, Y> {
    stmts: Vec<Stmt<S, Y>>,
}

impl<S, Y> Block<S, Y> {
    pub fn new() -> Self {
        Self { stmts: Vec::new() }
    }

    /// Run ordinary code
    pub fn exec(self, action: impl Fn(&mut S) + 'static) -> Self {
        self.push(Stmt::Exec(Box::new(action)))
    }

    /// Suspend, handing `value(fields)` to the caller
    ///
    /// `label` names the suspension point and must be unique in the routine.
    pub fn yield_at(self, label: &'static str, value: impl Fn(&mut S) -> Y + 'static) -> Self {
        self.push(Stmt::Yield {
            label,
            value: Box::new(value),
        })
    }

    pub fn when(
        self,
        test: impl Fn(&S) -> bool + 'static,
        then_s: impl FnOnce(Block<S, Y>) -> Block<S, Y>,
    ) -> Self {
        self.when_else(test, then_s, |b| b)
    }

    pub fn when_else(
        self,
        test: impl Fn(&S) -> bool + 'static,
        then_s: impl FnOnce(Block<S, Y>) -> Block<S, Y>,
        else_s: impl FnOnce(Block<S, Y>) -> Block<S, Y>,
    ) -> Self {
        self.push(Stmt::If {
            test: Box::new(test),
            then_s: then_s(Block::new()).stmts,
            else_s: else_s(Block::new()).stmts,
        })
    }

    /// Loop while `test` holds, checked before every iteration
    pub fn repeat_while(
        self,
        test: impl Fn(&S) -> bool + 'static,
        body: impl FnOnce(Block<S, Y>) -> Block<S, Y>,
    ) -> Self {
        self.push(Stmt::While {
            test: Box::new(test),
            body: body(Block::new()).stmts,
        })
    }

    /// Loop until a `break_loop`
    pub fn forever(self, body: impl FnOnce(Block<S, Y>) -> Block<S, Y>) -> Self {
        self.repeat_while(|_| true, body)
    }

    pub fn break_loop(self) -> Self {
        self.push(Stmt::Break)
    }

    pub fn continue_loop(self) -> Self {
        self.push(Stmt::Continue)
    }

    /// Multi-way branch on `selector`; arms may not contain suspension points
    pub fn select(
        self,
        selector: impl Fn(&S) -> usize + 'static,
        arms: impl IntoIterator<Item = Block<S, Y>>,
        fallback: Block<S, Y>,
    ) -> Self {
        self.push(Stmt::Select {
            selector: Box::new(selector),
            arms: arms.into_iter().map(|arm| arm.stmts).collect(),
            fallback: fallback.stmts,
        })
    }

    /// Place the FINISH label; statements after it are cleanup
    pub fn finish(self) -> Self {
        self.push(Stmt::Finish)
    }

    fn push(mut self, stmt: Stmt<S, Y>) -> Self {
        self.stmts.push(stmt);
        self
    }

    pub fn stmts(&self) -> &[Stmt<S, Y>] {
        &self.stmts
    }

    pub(crate) fn into_stmts(self) -> Vec<Stmt<S, Y>> {
        self.stmts
    }
}

impl<S, Y> Default for Block<S, Y> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Routine`]
pub struct RoutineBuilder<S, Y> {
    name: String,
    cancellable: bool,
    body: Block<S, Y>,
}

impl<S, Y> RoutineBuilder<S, Y> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cancellable: true,
            body: Block::new(),
        }
    }

    /// Define the routine body
    pub fn body(mut self, body: impl FnOnce(Block<S, Y>) -> Block<S, Y>) -> Self {
        self.body = body(self.body);
        self
    }

    /// Opt out of cancellation; the body then needs no FINISH label
    pub fn uncancellable(mut self) -> Self {
        self.cancellable = false;
        self
    }

    /// Validate the body and lower it into a runnable routine
    pub fn build(self) -> Result<Routine<S, Y>, DefinitionError> {
        let outline = Outline {
            routine: &self.name,
            cancellable: self.cancellable,
            body: shapes(&self.body.stmts),
        };
        Validator::new().validate(&outline)?;

        let program = Program::lower(self.body.stmts);
        tracing::debug!(
            routine = %self.name,
            points = program.point_count(),
            instrs = program.len(),
            "routine defined"
        );
        Ok(Routine::from_parts(self.name, self.cancellable, program))
    }
}
