use thiserror::Error;

/// Shared error taxonomy for the client core.
///
/// Every fallible operation in the article store, reaction synchronizer and
/// local record store reports one of these variants. Nothing here is fatal to
/// the process, and nothing is retried automatically: subscriptions degrade to
/// empty results, telemetry writes are swallowed by their callers, and toggles
/// leave local state untouched so the live subscription remains authoritative.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("validation refused: {0}")]
    Validation(String),

    #[error("local storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::RemoteUnavailable(_) => "REMOTE_UNAVAILABLE",
            AppError::Validation(_) => "VALIDATION_REFUSED",
            AppError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Whether re-issuing the same action could plausibly succeed.
    ///
    /// "Retryable" means retryable *by the user*; no layer of this core
    /// retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::RemoteUnavailable(_) | AppError::Storage(_)
        )
    }
}

impl From<kv_store::KvError> for AppError {
    fn from(e: kv_store::KvError) -> Self {
        AppError::Storage(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(AppError::NotFound("a".into()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::RemoteUnavailable("x".into()).error_code(),
            "REMOTE_UNAVAILABLE"
        );
        assert_eq!(
            AppError::Validation("x".into()).error_code(),
            "VALIDATION_REFUSED"
        );
        assert_eq!(AppError::Storage("x".into()).error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(AppError::RemoteUnavailable("down".into()).is_retryable());
        assert!(AppError::Storage("disk".into()).is_retryable());
        assert!(!AppError::NotFound("gone".into()).is_retryable());
        assert!(!AppError::Validation("empty".into()).is_retryable());
    }
}
