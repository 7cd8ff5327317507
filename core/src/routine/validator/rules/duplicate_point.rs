//! Rule: Duplicate Point
//!
//! Every suspension point in a routine needs its own label. Two points
//! sharing one would make the resumption table ambiguous.

use std::collections::HashSet;

use crate::errors::DefinitionError;
use crate::routine::ast::Shape;

use super::super::{Outline, ValidationRule};

pub struct DuplicatePointRule;

impl ValidationRule for DuplicatePointRule {
    fn id(&self) -> &'static str {
        "duplicate-point"
    }

    fn description(&self) -> &'static str {
        "suspension point labels must be unique within a routine"
    }

    fn validate(&self, outline: &Outline<'_>) -> Vec<DefinitionError> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut errors = Vec::new();

        for stmt in &outline.body {
            stmt.walk(&mut |shape| {
                if let Shape::Yield(label) = shape {
                    if !seen.insert(*label) && reported.insert(*label) {
                        errors.push(DefinitionError::DuplicatePoint {
                            routine: outline.routine.to_string(),
                            label: *label,
                        });
                    }
                }
            });
        }

        errors
    }
}
