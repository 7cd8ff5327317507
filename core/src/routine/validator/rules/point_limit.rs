//! Rule: Point Limit
//!
//! Suspension points are numbered with a `PointId`, so a routine cannot
//! declare more of them than that type can hold.

use crate::errors::DefinitionError;
use crate::marker::MAX_POINTS;
use crate::routine::ast::Shape;

use super::super::{Outline, ValidationRule};

pub struct PointLimitRule;

impl ValidationRule for PointLimitRule {
    fn id(&self) -> &'static str {
        "point-limit"
    }

    fn description(&self) -> &'static str {
        "a routine may declare at most MAX_POINTS suspension points"
    }

    fn validate(&self, outline: &Outline<'_>) -> Vec<DefinitionError> {
        let mut count = 0usize;
        for stmt in &outline.body {
            stmt.walk(&mut |shape| {
                if let Shape::Yield(_) = shape {
                    count += 1;
                }
            });
        }

        if count > MAX_POINTS {
            vec![DefinitionError::TooManyPoints {
                routine: outline.routine.to_string(),
                count,
                limit: MAX_POINTS,
            }]
        } else {
            Vec::new()
        }
    }
}
