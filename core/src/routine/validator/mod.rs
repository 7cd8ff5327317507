//! Definition-time validation of routine bodies
//!
//! Runs on the closure-free [`Shape`] outline of a body before lowering, so
//! structural mistakes are rejected when the routine is built rather than
//! surfacing while a coroutine runs.
//!
//! # Architecture
//!
//! 1. **ValidationRule trait** - each rule checks one structural property
//! 2. **Validator** - collects and runs all rules
//! 3. **DefinitionError** - what a rule reports
//!
//! # Adding a New Rule
//!
//! 1. Create a new file in `validator/rules/`
//! 2. Implement `ValidationRule` for your struct
//! 3. Add it to `Validator::new()`

pub mod rules;


use super::ast::Shape;
use crate::errors::DefinitionError;

/// What the rules see of a routine
#[derive(Debug, Clone)]
pub struct Outline<'a> {
    pub routine: &'a str,
    pub cancellable: bool,
    pub body: Vec<Shape>,
}

/// Trait that all validation rules implement
pub trait ValidationRule {
    /// Unique identifier for this rule (e.g., "duplicate-point")
    fn id(&self) -> &'static str;

    /// Human-readable description of what this rule checks
    fn description(&self) -> &'static str;

    /// Every violation of this rule in the outline
    fn validate(&self, outline: &Outline<'_>) -> Vec<DefinitionError>;
}

/// Runs every registered rule
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(rules::DuplicatePointRule),
                Box::new(rules::FinishPlacementRule),
                Box::new(rules::YieldInSelectRule),
                Box::new(rules::LoopControlRule),
                Box::new(rules::PointLimitRule),
            ],
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn ValidationRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// All violations, in rule order
    pub fn violations(&self, outline: &Outline<'_>) -> Vec<DefinitionError> {
        self.rules
            .iter()
            .flat_map(|rule| {
                let errors = rule.validate(outline);
                for error in &errors {
                    tracing::debug!(rule = rule.id(), %error, "routine rejected");
                }
                errors
            })
            .collect()
    }

    pub fn validate(&self, outline: &Outline<'_>) -> Result<(), DefinitionError> {
        let errors = self.violations(outline);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DefinitionError::from_violations(outline.routine, errors))
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
