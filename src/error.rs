#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Error taxonomy for the coordination core.
//!
//! Every variant carries a stable `code()` string for machine consumers and
//! an `is_retryable()` predicate consulted exclusively by the scheduler's
//! `fail()` retry decision.

use thiserror::Error;

pub mod code {
    pub const INVALID_CONTRACT_SHAPE: &str = "INVALID_CONTRACT_SHAPE";
    pub const STORY_ID_TRACEABILITY: &str = "STORY_ID_TRACEABILITY";
    pub const INVALID_SEQUENCE: &str = "INVALID_SEQUENCE";
    pub const DNA_COMPLIANCE: &str = "DNA_COMPLIANCE";
    pub const QUALITY_GATE: &str = "QUALITY_GATE";
    pub const BUSINESS_LOGIC: &str = "BUSINESS_LOGIC";
    pub const EXTERNAL_SERVICE: &str = "EXTERNAL_SERVICE";
    pub const WORK_TIMEOUT: &str = "WORK_TIMEOUT";
    pub const EVENT_BUS: &str = "EVENT_BUS";
}

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid contract shape: {0}")]
    InvalidContractShape(String),

    #[error("story id traceability violated: path '{path}' does not contain story id '{story_id}'")]
    StoryIdTraceabilityError { story_id: String, path: String },

    #[error("invalid sequence: {source} -> {target} is not a legal transition")]
    InvalidSequenceError { source: String, target: String },

    #[error("dna compliance failed: {violations:?}")]
    DnaComplianceError { violations: Vec<String> },

    #[error("quality gate '{gate}' failed")]
    QualityGateError { gate: String },

    #[error("business logic error: {0}")]
    BusinessLogicError(String),

    #[error("external service error: {0}")]
    ExternalServiceError(String),

    #[error("work item '{work_id}' timed out after {minutes} minute(s)")]
    WorkTimeoutError { work_id: String, minutes: u64 },

    #[error("event bus invariant violated: {0}")]
    EventBusError(String),
}

impl CoreError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidContractShape(_) => code::INVALID_CONTRACT_SHAPE,
            Self::StoryIdTraceabilityError { .. } => code::STORY_ID_TRACEABILITY,
            Self::InvalidSequenceError { .. } => code::INVALID_SEQUENCE,
            Self::DnaComplianceError { .. } => code::DNA_COMPLIANCE,
            Self::QualityGateError { .. } => code::QUALITY_GATE,
            Self::BusinessLogicError(_) => code::BUSINESS_LOGIC,
            Self::ExternalServiceError(_) => code::EXTERNAL_SERVICE,
            Self::WorkTimeoutError { .. } => code::WORK_TIMEOUT,
            Self::EventBusError(_) => code::EVENT_BUS,
        }
    }

    /// Only `ExternalServiceError` and `WorkTimeoutError` are retryable; every
    /// other kind indicates a structural or policy failure that re-running
    /// the same work would reproduce identically.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalServiceError(_) | Self::WorkTimeoutError { .. })
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_kinds_are_exactly_external_and_timeout() {
        assert!(CoreError::ExternalServiceError("flaky".into()).is_retryable());
        assert!(CoreError::WorkTimeoutError { work_id: "W-1".into(), minutes: 60 }.is_retryable());
        assert!(!CoreError::InvalidContractShape("missing field".into()).is_retryable());
        assert!(!CoreError::InvalidSequenceError { source: "a".into(), target: "b".into() }.is_retryable());
        assert!(!CoreError::DnaComplianceError { violations: vec![] }.is_retryable());
        assert!(!CoreError::QualityGateError { gate: "g".into() }.is_retryable());
        assert!(!CoreError::BusinessLogicError("x".into()).is_retryable());
        assert!(!CoreError::EventBusError("x".into()).is_retryable());
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(CoreError::InvalidContractShape("x".into()).code(), code::INVALID_CONTRACT_SHAPE);
        assert_eq!(
            CoreError::StoryIdTraceabilityError { story_id: "S".into(), path: "p".into() }.code(),
            code::STORY_ID_TRACEABILITY
        );
    }
}
