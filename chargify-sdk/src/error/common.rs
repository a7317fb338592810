//! The error type shared by every module of the client.

use thiserror::Error;

/// Result type for Chargify operations.
pub type ChargifyResult<T> = Result<T, ChargifyError>;

/// Errors that can occur while building, signing or sending requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChargifyError {
    /// The operation is not allowed in the current state, e.g. changing the
    /// data of a Direct request after its signature was computed.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// No response was received from the network layer (DNS, connection
    /// reset, TLS failure...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request timed out before a response arrived
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Data could not be encoded for signing or transmission
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input from the remote side could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ChargifyError {
    /// Error returned when a signed Direct request is mutated.
    pub fn already_signed() -> Self {
        Self::PreconditionViolation(
            "the signature for this request has already been generated".to_string(),
        )
    }

    /// Error for a required field that is absent.
    pub fn missing_field(field: &str) -> Self {
        Self::Parse(format!("missing field `{}`", field))
    }

    /// Returns true if this is a precondition violation.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, ChargifyError::PreconditionViolation(_))
    }

    /// Returns true if no response was obtained from the network.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, ChargifyError::Transport(_) | ChargifyError::Timeout(_))
    }
}
