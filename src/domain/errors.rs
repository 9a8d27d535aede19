//! Domain errors for the UpliftXP progression engine.

use thiserror::Error;

/// Domain-level errors that can occur while operating on a user's progress.
///
/// Nothing here is fatal: every variant is a recoverable signal that the
/// operation was abandoned and the stored document left as it was.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The document store or identity provider could not be reached.
    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// The task id is not part of today's tasks or the penalty set.
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// A developer date override did not match `YYYY-MM-DD`.
    #[error("Invalid date '{0}': please enter date in YYYY-MM-DD format")]
    InvalidDateInput(String),

    /// The operation needs a signed-in account and there is none.
    #[error("Sign in required")]
    AuthRequired,

    /// No progress document exists for the account.
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account already exists for {0}")]
    AccountExists(String),

    #[error("Concurrency conflict: {entity} {id} was modified {attempts} time(s) during update")]
    ConcurrencyConflict {
        entity: String,
        id: String,
        attempts: u32,
    },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether the error is a silent no-op rather than a failure worth showing.
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::TaskNotFound(_))
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        Self::RemoteUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_not_found_is_silent() {
        assert!(DomainError::TaskNotFound("water".to_string()).is_silent());
        assert!(!DomainError::AuthRequired.is_silent());
        assert!(!DomainError::RemoteUnavailable("down".to_string()).is_silent());
    }

    #[test]
    fn test_invalid_date_message_mentions_format() {
        let err = DomainError::InvalidDateInput("2024/01/01".to_string());
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_sqlx_errors_become_remote_unavailable() {
        let err: DomainError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DomainError::RemoteUnavailable(_)));
    }
}
