//! Lowering of a statement tree into a flat instruction program
//!
//! Structured statements become conditional and unconditional jumps. Every
//! suspension point gets a `PointId` in textual order and an entry in the
//! resumption table holding the index of the instruction right after it.

use super::ast::{Action, Predicate, Producer, Selector, Stmt};
use crate::marker::{Marker, PointId};

/// Jump target not yet known during lowering
const UNPATCHED: usize = usize::MAX;

pub(crate) enum Instr<S, Y> {
    Exec(Action<S>),
    Yield {
        point: PointId,
        value: Producer<S, Y>,
    },
    /// Fall through when `test` holds, otherwise jump to `target`
    JumpUnless {
        test: Predicate<S>,
        target: usize,
    },
    Jump(usize),
    Select {
        selector: Selector<S>,
        targets: Vec<usize>,
        fallback: usize,
    },
    Finish,
}

/// A lowered routine body
pub struct Program<S, Y> {
    pub(crate) instrs: Vec<Instr<S, Y>>,
    /// Resume index per `PointId`
    resume: Vec<usize>,
    labels: Vec<&'static str>,
    finish: Option<usize>,
}

impl<S, Y> Program<S, Y> {
    /// Lower a validated statement list
    pub(crate) fn lower(body: Vec<Stmt<S, Y>>) -> Self {
        let mut lowering = Lowering {
            program: Program {
                instrs: Vec::new(),
                resume: Vec::new(),
                labels: Vec::new(),
                finish: None,
            },
            loops: Vec::new(),
        };
        lowering.block(body);
        lowering.program
    }

    /// Instruction index a marker resumes at
    ///
    /// Total over every marker the yield protocol or cancellation can store.
    /// A finish marker on a body without FINISH resumes past the end.
    pub(crate) fn entry(&self, marker: Marker) -> usize {
        match marker {
            Marker::Start => 0,
            Marker::At(point) => self.resume[point.index()],
            Marker::Finish => self.finish.unwrap_or(self.instrs.len()),
        }
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.resume.len()
    }

    pub fn has_finish(&self) -> bool {
        self.finish.is_some()
    }

    /// Label of a suspension point; `None` for a point of another routine
    pub fn label(&self, point: PointId) -> Option<&'static str> {
        self.labels.get(point.index()).copied()
    }

    /// Look up a suspension point by label
    pub fn point(&self, label: &str) -> Option<PointId> {
        self.labels
            .iter()
            .position(|l| *l == label)
            .map(PointId::new)
    }
}

struct LoopCtx {
    start: usize,
    breaks: Vec<usize>,
}

struct Lowering<S, Y> {
    program: Program<S, Y>,
    loops: Vec<LoopCtx>,
}

impl<S, Y> Lowering<S, Y> {
    fn here(&self) -> usize {
        self.program.instrs.len()
    }

    fn emit(&mut self, instr: Instr<S, Y>) -> usize {
        let at = self.here();
        self.program.instrs.push(instr);
        at
    }

    fn block(&mut self, body: Vec<Stmt<S, Y>>) {
        for stmt in body {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: Stmt<S, Y>) {
        match stmt {
            Stmt::Exec(action) => {
                self.emit(Instr::Exec(action));
            }

            Stmt::Yield { label, value } => {
                let point = PointId::new(self.program.resume.len());
                self.emit(Instr::Yield { point, value });
                let resume_at = self.here();
                self.program.resume.push(resume_at);
                self.program.labels.push(label);
            }

            Stmt::If {
                test,
                then_s,
                else_s,
            } => {
                let branch = self.emit(Instr::JumpUnless {
                    test,
                    target: UNPATCHED,
                });
                self.block(then_s);
                if else_s.is_empty() {
                    let end = self.here();
                    self.patch(branch, end);
                } else {
                    let skip_else = self.emit(Instr::Jump(UNPATCHED));
                    let else_start = self.here();
                    self.patch(branch, else_start);
                    self.block(else_s);
                    let end = self.here();
                    self.patch(skip_else, end);
                }
            }

            Stmt::While { test, body } => {
                let start = self.emit(Instr::JumpUnless {
                    test,
                    target: UNPATCHED,
                });
                self.loops.push(LoopCtx {
                    start,
                    breaks: Vec::new(),
                });
                self.block(body);
                self.emit(Instr::Jump(start));
                let end = self.here();
                self.patch(start, end);
                if let Some(ctx) = self.loops.pop() {
                    for at in ctx.breaks {
                        self.patch(at, end);
                    }
                }
            }

            Stmt::Break => {
                let at = self.emit(Instr::Jump(UNPATCHED));
                match self.loops.last_mut() {
                    Some(ctx) => ctx.breaks.push(at),
                    None => panic!("break outside of a loop survived validation"),
                }
            }

            Stmt::Continue => {
                let start = match self.loops.last() {
                    Some(ctx) => ctx.start,
                    None => panic!("continue outside of a loop survived validation"),
                };
                self.emit(Instr::Jump(start));
            }

            Stmt::Select {
                selector,
                arms,
                fallback,
            } => {
                let select = self.emit(Instr::Select {
                    selector,
                    targets: Vec::with_capacity(arms.len()),
                    fallback: UNPATCHED,
                });
                let mut arm_starts = Vec::with_capacity(arms.len());
                let mut exits = Vec::with_capacity(arms.len());
                for arm in arms {
                    arm_starts.push(self.here());
                    self.block(arm);
                    exits.push(self.emit(Instr::Jump(UNPATCHED)));
                }
                let fallback_start = self.here();
                self.block(fallback);
                let end = self.here();
                for at in exits {
                    self.patch(at, end);
                }
                if let Instr::Select {
                    targets, fallback, ..
                } = &mut self.program.instrs[select]
                {
                    *targets = arm_starts;
                    *fallback = fallback_start;
                }
            }

            Stmt::Finish => {
                let at = self.emit(Instr::Finish);
                self.program.finish = Some(at);
            }
        }
    }

    /// Point the jump at `at` to `target`
    fn patch(&mut self, at: usize, target: usize) {
        match &mut self.program.instrs[at] {
            Instr::JumpUnless { target: t, .. } | Instr::Jump(t) => *t = target,
            _ => panic!("instruction {at} is not a jump"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::Block;

    fn lower(block: Block<(), u8>) -> Program<(), u8> {
        Program::lower(block.into_stmts())
    }

    #[test]
    fn test_yield_resumes_at_next_instruction() {
        let program = lower(
            Block::new()
                .exec(|_| {})
                .yield_at("a", |_| 1)
                .exec(|_| {})
                .yield_at("b", |_| 2),
        );

        assert_eq!(program.len(), 4);
        assert_eq!(program.point_count(), 2);
        assert_eq!(program.entry(Marker::Start), 0);
        assert_eq!(program.entry(Marker::At(PointId::new(0))), 2);
        assert_eq!(program.entry(Marker::At(PointId::new(1))), 4);
        assert_eq!(program.label(PointId::new(1)), Some("b"));
        assert_eq!(program.point("a"), Some(PointId::new(0)));
        assert_eq!(program.point("missing"), None);
    }

    #[test]
    fn test_label_of_foreign_point() {
        let wide = lower(Block::new().yield_at("x", |_| 1).yield_at("y", |_| 2));
        let narrow = lower(Block::new().yield_at("x", |_| 1));

        let y = wide.point("y").unwrap();
        assert_eq!(wide.label(y), Some("y"));
        assert_eq!(narrow.label(y), None);
    }

    #[test]
    fn test_empty_body_lowers_to_empty_program() {
        let program = lower(Block::new());
        assert!(program.is_empty());
        assert_eq!(program.point_count(), 0);
        assert_eq!(program.entry(Marker::Finish), 0);

        assert!(!lower(Block::new().exec(|_| {})).is_empty());
    }

    #[test]
    fn test_finish_entry() {
        let program = lower(Block::new().yield_at("a", |_| 1).finish().exec(|_| {}));
        assert!(program.has_finish());
        assert_eq!(program.entry(Marker::Finish), 1);

        let program = lower(Block::new().yield_at("a", |_| 1));
        assert!(!program.has_finish());
        assert_eq!(program.entry(Marker::Finish), program.len());
    }

    #[test]
    fn test_while_jumps_are_patched() {
        let program = lower(Block::new().repeat_while(|_| true, |b| b.yield_at("a", |_| 0)));

        // JumpUnless, Yield, Jump(0)
        assert_eq!(program.len(), 3);
        match &program.instrs[0] {
            Instr::JumpUnless { target, .. } => assert_eq!(*target, 3),
            _ => panic!("expected loop test"),
        }
        match &program.instrs[2] {
            Instr::Jump(target) => assert_eq!(*target, 0),
            _ => panic!("expected back edge"),
        }
    }

    #[test]
    fn test_select_targets() {
        let program = lower(Block::new().select(
            |_| 0,
            [Block::new().exec(|_| {}), Block::new()],
            Block::new().exec(|_| {}),
        ));

        // Select, Exec, Jump, Jump, Exec
        assert_eq!(program.len(), 5);
        match &program.instrs[0] {
            Instr::Select {
                targets, fallback, ..
            } => {
                assert_eq!(targets, &vec![1, 3]);
                assert_eq!(*fallback, 4);
            }
            _ => panic!("expected select"),
        }
        for at in [2, 3] {
            match &program.instrs[at] {
                Instr::Jump(target) => assert_eq!(*target, 5),
                _ => panic!("expected arm exit"),
            }
        }
    }
}
