//! Rule: Finish Placement
//!
//! FINISH is the single point cancellation jumps to, and nothing after it
//! may suspend.
//!
//! - a cancellable routine must have a FINISH label
//! - at most one FINISH per routine
//! - FINISH sits at the top level of the body, never inside a loop or branch
//! - no suspension point after FINISH

use crate::errors::DefinitionError;
use crate::routine::ast::Shape;

use super::super::{Outline, ValidationRule};

pub struct FinishPlacementRule;

impl ValidationRule for FinishPlacementRule {
    fn id(&self) -> &'static str {
        "finish-placement"
    }

    fn description(&self) -> &'static str {
        "FINISH must appear once, at top level, with no suspension after it"
    }

    fn validate(&self, outline: &Outline<'_>) -> Vec<DefinitionError> {
        let routine = || outline.routine.to_string();
        let mut errors = Vec::new();

        let top_level: Vec<usize> = outline
            .body
            .iter()
            .enumerate()
            .filter(|(_, shape)| **shape == Shape::Finish)
            .map(|(idx, _)| idx)
            .collect();

        let mut nested = false;
        for stmt in &outline.body {
            if *stmt == Shape::Finish {
                continue;
            }
            stmt.walk(&mut |shape| nested |= *shape == Shape::Finish);
        }

        if nested {
            errors.push(DefinitionError::NestedFinish { routine: routine() });
        }
        if top_level.len() > 1 {
            errors.push(DefinitionError::DuplicateFinish { routine: routine() });
        }
        if outline.cancellable && top_level.is_empty() && !nested {
            errors.push(DefinitionError::MissingFinish { routine: routine() });
        }

        if let Some(&first) = top_level.first() {
            for stmt in &outline.body[first + 1..] {
                stmt.walk(&mut |shape| {
                    if let Shape::Yield(label) = shape {
                        errors.push(DefinitionError::YieldAfterFinish {
                            routine: routine(),
                            label: *label,
                        });
                    }
                });
            }
        }

        errors
    }
}
