//! Remote collection errors

use thiserror::Error;

/// Common result type for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Failures reported by a remote collection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("quota exhausted: {0}")]
    ResourceExhausted(String),
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("unknown subscription {0}")]
    UnknownSubscription(u64),
    #[error("remote error ({code}): {message}")]
    Remote { code: String, message: String },
}

impl CollectionError {
    /// Classify a service error code such as `permission-denied`
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            "permission-denied" | "unauthenticated" => Self::PermissionDenied(message),
            "unavailable" | "deadline-exceeded" | "aborted" => Self::Unavailable(message),
            "resource-exhausted" => Self::ResourceExhausted(message),
            "not-found" => Self::NotFound(message),
            _ => Self::Remote { code: code.to_string(), message },
        }
    }

    /// Whether retrying the same request later may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::ResourceExhausted(_) => true,
            Self::Remote { code, .. } => code == "internal" || code == "unknown",
            Self::PermissionDenied(_) | Self::NotFound(_) | Self::UnknownSubscription(_) => false,
        }
    }
}
