//! Rule: Loop Control
//!
//! `break` and `continue` need an enclosing loop. Select arms are
//! transparent: a `break` in an arm leaves the loop around the select.

use crate::errors::DefinitionError;
use crate::routine::ast::Shape;

use super::super::{Outline, ValidationRule};

pub struct LoopControlRule;

impl ValidationRule for LoopControlRule {
    fn id(&self) -> &'static str {
        "loop-control"
    }

    fn description(&self) -> &'static str {
        "break and continue must be inside a loop"
    }

    fn validate(&self, outline: &Outline<'_>) -> Vec<DefinitionError> {
        let mut errors = Vec::new();
        for stmt in &outline.body {
            check(stmt, false, outline.routine, &mut errors);
        }
        errors
    }
}

fn check(shape: &Shape, in_loop: bool, routine: &str, errors: &mut Vec<DefinitionError>) {
    match shape {
        Shape::Break if !in_loop => errors.push(DefinitionError::BreakOutsideLoop {
            routine: routine.to_string(),
        }),
        Shape::Continue if !in_loop => errors.push(DefinitionError::ContinueOutsideLoop {
            routine: routine.to_string(),
        }),
        Shape::If { then_s, else_s } => {
            for s in then_s.iter().chain(else_s) {
                check(s, in_loop, routine, errors);
            }
        }
        Shape::While { body } => {
            for s in body {
                check(s, true, routine, errors);
            }
        }
        Shape::Select { arms, fallback } => {
            for s in arms.iter().flatten().chain(fallback) {
                check(s, in_loop, routine, errors);
            }
        }
        Shape::Exec | Shape::Yield(_) | Shape::Break | Shape::Continue | Shape::Finish => {}
    }
}
