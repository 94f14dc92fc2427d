//! Crate error type.
//!
//! Only structural problems in the input are errors. A job that cannot be
//! placed at some stage is not an error: it is recorded on the schedule as
//! an [`UnscheduledJob`](crate::models::UnscheduledJob) and the run goes on.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised before any scheduling takes place.
#[derive(Debug, Error)]
pub enum FlowShopError {
    /// The problem definition is inconsistent (unknown rule, missing
    /// durations, unknown job types, negative times, ...).
    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfiguration(Vec<ValidationError>),

    /// The configuration document is not well-formed JSON for the model.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FlowShopError {
    /// Validation errors carried by an `InvalidConfiguration`, empty otherwise.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::InvalidConfiguration(errors) => errors,
            Self::Parse(_) => &[],
        }
    }
}

impl From<Vec<ValidationError>> for FlowShopError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::InvalidConfiguration(errors)
    }
}

impl From<ValidationError> for FlowShopError {
    fn from(error: ValidationError) -> Self {
        Self::InvalidConfiguration(vec![error])
    }
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, FlowShopError>;

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
