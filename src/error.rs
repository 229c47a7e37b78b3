//! Error types for the chunking advisor.
//!
//! Malformed chunking inputs never surface here; they degrade to defaults
//! and are reported through decision notices. Only preconditions the advisor
//! cannot work around become errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    /// A request field the advisor cannot guess (missing or unknown tier, unknown strategy).
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Invalid advisor configuration: {0}")]
    InvalidConfig(String),
}

impl AdvisorError {
    pub(crate) fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        AdvisorError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        AdvisorError::InvalidConfig(reason.into())
    }
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;
