//! Unified JSON output envelope for CLI commands.
//!
//! Every `--json` output is wrapped in this structure so scripts and the
//! ingestion service's tooling can parse results and errors the same way.

use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;

/// Schema version for this envelope format.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Operation outcome status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
}

/// Machine-readable result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    Ok,
    InvalidInput,
    ConfigError,
    IoError,
}

impl ResultCode {
    /// Unix exit code for this result.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::InvalidInput => 2,
            Self::ConfigError => 3,
            Self::IoError => 4,
        }
    }
}

impl From<&AdvisorError> for ResultCode {
    fn from(error: &AdvisorError) -> Self {
        match error {
            AdvisorError::InvalidInput { .. } => ResultCode::InvalidInput,
            AdvisorError::InvalidConfig(_) => ResultCode::ConfigError,
        }
    }
}

/// Entity type in the data payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Profile,
    Analysis,
    Advice,
}

/// Unified JSON output envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
    /// Operation outcome
    pub status: Status,

    /// Machine-readable result code
    pub code: ResultCode,

    /// Unix exit code (0-255)
    pub exit_code: u8,

    /// Human-readable message
    pub message: String,

    /// Result payload (null on error)
    pub data: Option<T>,

    /// Response metadata
    pub meta: Meta,
}

/// Response metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    /// Schema version (semver)
    pub schema_version: String,

    /// Entity type in data payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,

    /// Number of items in data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// Source file the command read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            entity_type: None,
            count: None,
            source: None,
        }
    }
}

impl<T> Envelope<T> {
    /// Create a success envelope with data.
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            code: ResultCode::Ok,
            exit_code: 0,
            message: "Operation completed successfully".to_string(),
            data: Some(data),
            meta: Meta::default(),
        }
    }

    /// Create an error envelope.
    pub fn error(code: ResultCode, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            code,
            exit_code: code.exit_code(),
            message: message.into(),
            data: None,
            meta: Meta::default(),
        }
    }

    /// Add custom message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set entity type in metadata.
    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.meta.entity_type = Some(entity_type);
        self
    }

    /// Set count in metadata.
    pub fn with_count(mut self, count: usize) -> Self {
        self.meta.count = Some(count);
        self
    }

    /// Set source file in metadata.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.meta.source = Some(source.into());
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error>
    where
        T: Serialize,
    {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let envelope = Envelope::success(vec!["pdf", "txt"])
            .with_entity_type(EntityType::Profile)
            .with_count(2)
            .with_message("2 profiles");

        assert_eq!(envelope.status, Status::Success);
        assert_eq!(envelope.code, ResultCode::Ok);
        assert_eq!(envelope.exit_code, 0);
        assert_eq!(envelope.meta.count, Some(2));
        assert!(envelope.data.is_some());
    }

    #[test]
    fn test_error_envelope_from_advisor_error() {
        let err = AdvisorError::InvalidInput {
            field: "user_tier",
            reason: "tier is required".to_string(),
        };
        let envelope: Envelope<()> = Envelope::error(ResultCode::from(&err), err.to_string());

        assert_eq!(envelope.status, Status::Error);
        assert_eq!(envelope.code, ResultCode::InvalidInput);
        assert_eq!(envelope.exit_code, 2);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_json_serialization() {
        let envelope = Envelope::success(vec!["a", "b"])
            .with_entity_type(EntityType::Advice)
            .with_source("notes.md");

        let json = envelope.to_json().unwrap();
        assert!(json.contains("\"status\": \"success\""));
        assert!(json.contains("\"code\": \"OK\""));
        assert!(json.contains("\"entity_type\": \"advice\""));
        assert!(json.contains("\"schema_version\": \"1.0.0\""));
    }
}
