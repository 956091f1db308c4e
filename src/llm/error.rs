//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    /// Backend refused the request with 429; the run aborts and the caller
    /// decides when to try again
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    /// Whether the client should retry the request with backoff
    ///
    /// Rate limits are deliberately not retryable here: they carry their own
    /// retry-after and surface to the caller instead of burning the backoff
    /// budget.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } => false,
            LlmError::ApiError { status, .. } => *status == 408 || *status >= 500,
            LlmError::Network(_) => true,
            LlmError::InvalidResponse(_) => false,
            LlmError::Json(_) => false,
        }
    }

    /// Get the retry duration if this is a rate limit error
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_surfaces_not_retries() {
        let err = LlmError::RateLimited {
            retry_after: Duration::from_secs(42),
        };

        assert!(err.is_rate_limit());
        assert!(!err.is_retryable());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(42)));
    }

    #[test]
    fn test_transient_statuses_are_retryable() {
        for status in [408, 500, 502, 503, 504] {
            let err = LlmError::ApiError {
                status,
                message: "transient".to_string(),
            };
            assert!(err.is_retryable(), "status {} should be retryable", status);
        }
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        for status in [400, 401, 403, 404, 422] {
            let err = LlmError::ApiError {
                status,
                message: "client error".to_string(),
            };
            assert!(!err.is_retryable(), "status {} should not be retryable", status);
        }

        assert!(!LlmError::InvalidResponse("Bad JSON".to_string()).is_retryable());
    }

    #[test]
    fn test_retry_after_only_on_rate_limit() {
        let err = LlmError::ApiError {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.retry_after(), None);
        assert!(!err.is_rate_limit());
    }
}
