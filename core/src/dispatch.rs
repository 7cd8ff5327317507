//! Dispatch engine
//!
//! Translates the stored marker into an instruction index, then executes
//! forward until a suspension point or the end of the program. This is the
//! whole of "resuming": no call stack is saved, only the marker and the
//! persistent fields in the context store.

use crate::context::ContextStore;
use crate::marker::Marker;
use crate::routine::program::Instr;
use crate::routine::Routine;

/// Why a pass over the body stopped
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Transfer<Y> {
    /// A yield ran; the store's marker now points just past it
    Suspend(Y),
    /// FINISH cleanup and the end of the body were reached
    Complete,
}

/// Run one pass of `routine` on `store`
pub(crate) fn run<S, Y>(routine: &Routine<S, Y>, store: &mut ContextStore<S>) -> Transfer<Y> {
    let program = routine.program();
    let mut pc = program.entry(store.marker);

    tracing::trace!(routine = routine.name(), marker = %store.marker, pc, "dispatch");

    while let Some(instr) = program.instrs.get(pc) {
        match instr {
            Instr::Exec(action) => {
                action(&mut store.fields);
                pc += 1;
            }

            Instr::Yield { point, value } => {
                let v = value(&mut store.fields);
                store.marker = Marker::At(*point);
                tracing::trace!(
                    routine = routine.name(),
                    point = program.label(*point).unwrap_or("?"),
                    "suspend"
                );
                return Transfer::Suspend(v);
            }

            Instr::JumpUnless { test, target } => {
                pc = if test(&store.fields) { pc + 1 } else { *target };
            }

            Instr::Jump(target) => pc = *target,

            Instr::Select {
                selector,
                targets,
                fallback,
            } => {
                let arm = selector(&store.fields);
                pc = targets.get(arm).copied().unwrap_or(*fallback);
            }

            Instr::Finish => {
                store.marker = Marker::Finish;
                pc += 1;
            }
        }
    }

    Transfer::Complete
}
