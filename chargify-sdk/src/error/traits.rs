//! Error classification traits for retry logic and error handling.
//!
//! These traits allow errors to self-describe their characteristics,
//! enabling generic retry decisions by callers. The client itself never
//! retries.

use std::time::Duration;

use super::common::ChargifyError;

/// Classification of error types for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transient errors that may resolve on retry (network issues, timeouts)
    Transient,
    /// Permanent errors that won't resolve on retry (invalid input, misuse)
    Permanent,
    /// Configuration errors (missing credentials, invalid settings)
    Configuration,
}

/// Trait for errors that can classify themselves for retry logic.
pub trait ErrorClassification {
    /// Returns the category of this error
    fn category(&self) -> ErrorCategory;

    /// Returns true if this error is transient and may succeed on retry
    fn is_transient(&self) -> bool {
        matches!(self.category(), ErrorCategory::Transient)
    }

    /// Returns true if this error is permanent and won't succeed on retry
    fn is_permanent(&self) -> bool {
        matches!(self.category(), ErrorCategory::Permanent)
    }

    /// Suggests a delay before retrying, if applicable
    fn suggested_retry_delay(&self) -> Option<Duration> {
        match self.category() {
            ErrorCategory::Transient => Some(Duration::from_millis(500)),
            _ => None,
        }
    }

    /// Returns the maximum number of retries suggested for this error
    fn max_retries(&self) -> u32 {
        match self.category() {
            ErrorCategory::Transient => 3,
            _ => 0,
        }
    }
}

impl ErrorClassification for ChargifyError {
    fn category(&self) -> ErrorCategory {
        match self {
            ChargifyError::PreconditionViolation(_) => ErrorCategory::Permanent,
            ChargifyError::Transport(_) => ErrorCategory::Transient,
            ChargifyError::Timeout(_) => ErrorCategory::Transient,
            ChargifyError::Encoding(_) => ErrorCategory::Permanent,
            ChargifyError::Configuration(_) => ErrorCategory::Configuration,
            ChargifyError::Parse(_) => ErrorCategory::Permanent,
        }
    }

    fn suggested_retry_delay(&self) -> Option<Duration> {
        match self {
            ChargifyError::Transport(_) => Some(Duration::from_secs(1)),
            ChargifyError::Timeout(_) => Some(Duration::from_millis(500)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_transient() {
        let err = ChargifyError::Transport("connection reset".to_string());
        assert!(err.is_transient());
        assert!(!err.is_permanent());
        assert!(err.is_transport_error());
        assert_eq!(err.suggested_retry_delay(), Some(Duration::from_secs(1)));
        assert_eq!(err.max_retries(), 3);

        let err = ChargifyError::Timeout("10s elapsed".to_string());
        assert!(err.is_transient());
        assert!(err.is_transport_error());
    }

    #[test]
    fn test_precondition_violation_is_permanent() {
        let err = ChargifyError::already_signed();
        assert!(err.is_precondition_violation());
        assert!(err.is_permanent());
        assert_eq!(err.max_retries(), 0);
        assert!(err.suggested_retry_delay().is_none());
        assert!(err.to_string().contains("already been generated"));
    }

    #[test]
    fn test_configuration_errors_never_retry() {
        let err = ChargifyError::Configuration("api_id is empty".to_string());
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.is_transient());
        assert!(!err.is_permanent());
        assert_eq!(err.max_retries(), 0);
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let err = ChargifyError::missing_field("call_id");
        assert_eq!(err.category(), ErrorCategory::Permanent);
        assert_eq!(err.to_string(), "Parse error: missing field `call_id`");
    }
}
