//! Error taxonomy shared by the scorer and the suggestion engine.
//!
//! "No signal matched" is never an error: it is a zero-point outcome.
//! Errors are only raised for bad input or for a failing text-generation
//! capability, and are always returned to the immediate caller.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeoError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeoError {
    /// Empty keyword or a required snapshot field is absent. Not retryable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The text-generation capability failed, timed out, or is disabled.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The capability responded, but the payload does not fit the contract.
    #[error("Malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),
}

impl SeoError {
    /// Whether the caller may retry the same request (with backoff).
    pub fn is_retryable(&self) -> bool {
        matches!(self, SeoError::UpstreamUnavailable(_))
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        SeoError::InvalidInput(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        SeoError::UpstreamUnavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        SeoError::MalformedUpstreamResponse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_upstream_unavailable_is_retryable() {
        assert!(SeoError::unavailable("timeout").is_retryable());
        assert!(!SeoError::invalid("empty keyword").is_retryable());
        assert!(!SeoError::malformed("not json").is_retryable());
    }

    #[test]
    fn test_display_includes_kind() {
        let err = SeoError::invalid("keyword must not be empty");
        assert_eq!(err.to_string(), "Invalid input: keyword must not be empty");
    }
}
