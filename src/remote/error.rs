//! Errors reported by the remote billing API.
//!
//! [`PlanClient`](super::PlanClient) implementations map their transport's
//! failures onto these variants. The reconciler only interprets
//! [`RemoteError::NotFound`]; everything else is passed through unchanged.

use std::fmt;

/// Remote billing API errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The requested resource does not exist remotely.
    NotFound { id: String },
    /// The API rejected the credentials.
    Authentication { message: String },
    /// The request never produced an API response (network, TLS, timeout).
    Transport { message: String },
    /// The API returned an error response.
    Api {
        operation: String,
        message: String,
        code: Option<String>,
        http_status: Option<u16>,
    },
}

impl RemoteError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn api(
        operation: impl Into<String>,
        message: impl Into<String>,
        http_status: Option<u16>,
    ) -> Self {
        Self::Api {
            operation: operation.into(),
            message: message.into(),
            code: None,
            http_status,
        }
    }

    /// Check if this is the designated not-found signal.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::Authentication { .. } => true,
            Self::Api { http_status, .. } => matches!(http_status, Some(400..=499)),
            Self::Transport { .. } => false,
        }
    }

    /// Check if this error is retryable.
    ///
    /// Retrying is the caller's decision; the reconciler never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            // Rate limit (429) and server errors (5xx) are retryable
            Self::Api { http_status, .. } => matches!(http_status, Some(429) | Some(500..=599)),
            _ => false,
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "No such plan: '{}'", id),
            Self::Authentication { message } => {
                write!(f, "Remote authentication failed: {}", message)
            }
            Self::Transport { message } => write!(f, "Remote transport error: {}", message),
            Self::Api {
                operation,
                message,
                code,
                http_status,
            } => {
                write!(f, "Remote API error during '{}': {}", operation, message)?;
                if let Some(code) = code {
                    write!(f, " (code: {})", code)?;
                }
                if let Some(status) = http_status {
                    write!(f, " [HTTP {}]", status)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for RemoteError {}
