// ABOUTME: Error types for external collaborators (backend, generative model, food database)
// ABOUTME: Distinguishes retryable transport failures from permanent rejections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

use super::{AppError, ErrorCode};
use thiserror::Error;

/// Errors returned by an external service client
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never produced a response (DNS, TLS, connection reset, timeout)
    #[error("{provider} network error: {message}")]
    Network {
        /// Service name
        provider: String,
        /// Transport error description
        message: String,
    },

    /// The service rejected the request due to rate limiting
    #[error("{provider} rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitExceeded {
        /// Service name
        provider: String,
        /// Suggested wait before retrying
        retry_after_secs: u64,
    },

    /// The service answered with a non-success status
    #[error("{provider} API error ({status_code}): {message}")]
    ApiError {
        /// Service name
        provider: String,
        /// HTTP status code
        status_code: u16,
        /// Response body or description
        message: String,
        /// Whether the request may succeed on retry
        retryable: bool,
    },

    /// The service answered but the body could not be understood
    #[error("{provider} returned an invalid response: {message}")]
    InvalidResponse {
        /// Service name
        provider: String,
        /// Parse failure description
        message: String,
    },

    /// Requested record does not exist
    #[error("{provider}: {resource} not found")]
    NotFound {
        /// Service name
        provider: String,
        /// Resource description
        resource: String,
    },

    /// Calls are short-circuited while the service is failing
    #[error("{provider} circuit breaker open, retry after {retry_after_secs}s")]
    CircuitBreakerOpen {
        /// Service name
        provider: String,
        /// Seconds until a recovery attempt is allowed
        retry_after_secs: u64,
    },

    /// Client is missing credentials or an endpoint
    #[error("{provider} is not configured: {details}")]
    NotConfigured {
        /// Service name
        provider: String,
        /// What is missing
        details: String,
    },
}

impl ProviderError {
    /// Whether the failure is transient and the call may be retried later
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::RateLimitExceeded { .. } => true,
            Self::ApiError { retryable, .. } => *retryable,
            Self::InvalidResponse { .. }
            | Self::NotFound { .. }
            | Self::CircuitBreakerOpen { .. }
            | Self::NotConfigured { .. } => false,
        }
    }

    /// Whether the failure means "use local data instead" (rate limit or unreachable service)
    #[must_use]
    pub const fn should_fall_back(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::RateLimitExceeded { .. } | Self::CircuitBreakerOpen { .. }
        )
    }

    /// Build an error from a non-success HTTP status
    #[must_use]
    pub fn from_status(provider: &str, status_code: u16, body: &str) -> Self {
        if status_code == 429 {
            return Self::RateLimitExceeded {
                provider: provider.to_owned(),
                retry_after_secs: 60,
            };
        }
        if status_code == 404 {
            return Self::NotFound {
                provider: provider.to_owned(),
                resource: body.to_owned(),
            };
        }
        Self::ApiError {
            provider: provider.to_owned(),
            status_code,
            message: body.to_owned(),
            retryable: status_code >= 500 || status_code == 408,
        }
    }
}

/// Result alias for provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(feature = "provider-errors")]
impl ProviderError {
    /// Classify a transport-level `reqwest` failure
    #[must_use]
    pub fn from_reqwest(provider: &str, error: &reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::InvalidResponse {
                provider: provider.to_owned(),
                message: error.to_string(),
            };
        }
        if let Some(status) = error.status() {
            return Self::from_status(provider, status.as_u16(), &error.to_string());
        }
        Self::Network {
            provider: provider.to_owned(),
            message: error.to_string(),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        let code = match &error {
            ProviderError::Network { .. } | ProviderError::CircuitBreakerOpen { .. } => {
                ErrorCode::ExternalServiceUnavailable
            }
            ProviderError::RateLimitExceeded { .. } => ErrorCode::ExternalRateLimited,
            ProviderError::NotFound { .. } => ErrorCode::ResourceNotFound,
            ProviderError::NotConfigured { .. } => ErrorCode::ConfigMissing,
            ProviderError::ApiError { .. } | ProviderError::InvalidResponse { .. } => {
                ErrorCode::ExternalServiceError
            }
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ProviderError::from_status("backend", 429, ""),
            ProviderError::RateLimitExceeded { .. }
        ));
        assert!(ProviderError::from_status("backend", 503, "down").is_retryable());
        assert!(!ProviderError::from_status("backend", 400, "bad row").is_retryable());
    }

    #[test]
    fn test_conversion_to_app_error_keeps_transience() {
        let error: AppError = ProviderError::Network {
            provider: "backend".to_owned(),
            message: "connection refused".to_owned(),
        }
        .into();
        assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
        assert!(error.is_transient());
    }
}
