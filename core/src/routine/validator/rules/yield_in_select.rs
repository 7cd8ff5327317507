//! Rule: Yield In Select
//!
//! A select is itself a dispatch over computed targets. Suspending inside
//! one would nest two dispatches, so select arms must run straight through.

use crate::errors::DefinitionError;
use crate::routine::ast::Shape;

use super::super::{Outline, ValidationRule};

pub struct YieldInSelectRule;

impl ValidationRule for YieldInSelectRule {
    fn id(&self) -> &'static str {
        "yield-in-select"
    }

    fn description(&self) -> &'static str {
        "select arms may not contain suspension points"
    }

    fn validate(&self, outline: &Outline<'_>) -> Vec<DefinitionError> {
        let mut errors = Vec::new();

        for stmt in &outline.body {
            stmt.walk(&mut |shape| {
                let Shape::Select { arms, fallback } = shape else {
                    return;
                };
                // Only direct yields here; nested selects report their own.
                for arm in arms.iter().chain(std::iter::once(fallback)) {
                    for inner in arm {
                        collect_yields(inner, &mut |label| {
                            errors.push(DefinitionError::YieldInSelect {
                                routine: outline.routine.to_string(),
                                label,
                            })
                        });
                    }
                }
            });
        }

        errors
    }
}

/// Yields reachable from `shape` without crossing into another select
fn collect_yields(shape: &Shape, found: &mut impl FnMut(&'static str)) {
    match shape {
        Shape::Yield(label) => found(*label),
        Shape::If { then_s, else_s } => {
            then_s.iter().for_each(|s| collect_yields(s, found));
            else_s.iter().for_each(|s| collect_yields(s, found));
        }
        Shape::While { body } => body.iter().for_each(|s| collect_yields(s, found)),
        Shape::Select { .. }
        | Shape::Exec
        | Shape::Break
        | Shape::Continue
        | Shape::Finish => {}
    }
}
