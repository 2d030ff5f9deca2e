//! Unified Error Model
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("CATEGORY/unknown: {0}")]
    UnknownCategory(String),

    #[error("READING/{0}")]
    InvalidReading(String),

    #[error("PERIOD/start {start} is after end {end}")]
    InvalidPeriod {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("REGISTRY/{0}")]
    InvalidRegistry(String),

    #[error("PROFILE/{0}")]
    InvalidProfile(String),
}

impl EngineError {
    /// Short machine-readable kind, used by callers that surface errors over the wire
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::UnknownCategory(_) => "unknown_category",
            EngineError::InvalidReading(_) => "invalid_reading",
            EngineError::InvalidPeriod { .. } => "invalid_period",
            EngineError::InvalidRegistry(_) => "invalid_registry",
            EngineError::InvalidProfile(_) => "invalid_profile",
        }
    }

    pub(crate) fn reading(msg: impl Into<String>) -> Self {
        EngineError::InvalidReading(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_prefix() {
        let err = EngineError::InvalidReading("primary value is NaN".to_string());
        assert_eq!(err.to_string(), "READING/primary value is NaN");

        let err = EngineError::UnknownCategory("Oven".to_string());
        assert!(err.to_string().starts_with("CATEGORY/"));
        assert_eq!(err.kind(), "unknown_category");
    }
}
