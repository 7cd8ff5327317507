//! Error types
//!
//! Two classes, raised at different times:
//! - [`DefinitionError`]: a routine body breaks a structural rule. Returned
//!   by [`RoutineBuilder::build`](crate::routine::RoutineBuilder::build), so
//!   a bad routine never gets a handle.
//! - [`UsageError`]: a caller broke the handle state machine. Depending on
//!   the configured [`MisusePolicy`](crate::config::MisusePolicy) this is
//!   either returned or raised as a panic.

use thiserror::Error;

/// A routine body that cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("routine `{routine}`: suspension point `{label}` is declared more than once")]
    DuplicatePoint { routine: String, label: &'static str },

    #[error("routine `{routine}` supports cancellation but has no FINISH label")]
    MissingFinish { routine: String },

    #[error("routine `{routine}` declares more than one FINISH label")]
    DuplicateFinish { routine: String },

    #[error("routine `{routine}`: FINISH must be placed at the top level of the body")]
    NestedFinish { routine: String },

    #[error("routine `{routine}`: suspension point `{label}` comes after FINISH")]
    YieldAfterFinish { routine: String, label: &'static str },

    #[error("routine `{routine}`: suspension point `{label}` is inside a select branch")]
    YieldInSelect { routine: String, label: &'static str },

    #[error("routine `{routine}`: break outside of a loop")]
    BreakOutsideLoop { routine: String },

    #[error("routine `{routine}`: continue outside of a loop")]
    ContinueOutsideLoop { routine: String },

    #[error("routine `{routine}` declares {count} suspension points, at most {limit} are allowed")]
    TooManyPoints {
        routine: String,
        count: usize,
        limit: usize,
    },

    #[error("routine `{routine}` has {} definition errors", .errors.len())]
    Invalid {
        routine: String,
        errors: Vec<DefinitionError>,
    },
}

impl DefinitionError {
    /// Collapse a list of violations into one error
    pub(crate) fn from_violations(routine: &str, mut errors: Vec<DefinitionError>) -> Self {
        if errors.len() == 1 {
            return errors.remove(0);
        }
        DefinitionError::Invalid {
            routine: routine.to_string(),
            errors,
        }
    }

    /// Every individual violation carried by this error
    pub fn violations(&self) -> Vec<&DefinitionError> {
        match self {
            DefinitionError::Invalid { errors, .. } => errors.iter().collect(),
            other => vec![other],
        }
    }
}

/// A handle used outside of its state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("coroutine `{routine}` already finished and cannot be invoked again")]
    InvokeFinished { routine: String },

    #[error("coroutine `{routine}` is not active and cannot be cancelled")]
    CancelInactive { routine: String },

    #[error("routine `{routine}` was defined without cancellation support")]
    NotCancellable { routine: String },
}
