//! Unified error handling for the social graph services.
//!
//! Provides a single error type with stable machine-readable codes and
//! caller-facing messages that hide storage details.

use domain::{DomainError, FieldError};
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication
    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("Validation failed: {}", join_messages(.0))]
    Validation(Vec<FieldError>),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Storage
    /// Unique or foreign-key constraint hit unexpectedly; not recoverable locally
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(sea_orm::DbErr),

    // Internal
    #[error("Internal error")]
    Internal(String),
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl AppError {
    /// Get error code for callers
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AppError::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get caller-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => join_messages(errors),
            AppError::InvalidArgument(msg) => msg.clone(),
            AppError::Conflict(msg) => format!("{} already exists", msg),

            AppError::ConstraintViolation(detail) => {
                tracing::error!("Constraint violation: {}", detail);
                "A storage constraint was violated".to_string()
            }
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// Field errors carried by a validation failure
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            AppError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

// =============================================================================
// Storage Error Conversion
// =============================================================================

#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail))
            | Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(detail)) => {
                AppError::ConstraintViolation(detail)
            }
            _ => AppError::Database(err),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Password(msg) => {
                AppError::Validation(vec![FieldError::new("password", "invalid", msg)])
            }
            DomainError::InvalidArgument(msg) => AppError::InvalidArgument(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        AppError::InvalidArgument(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_app_errors() {
        let err: AppError = DomainError::invalid_argument("self follow").into();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert_eq!(err.code(), "INVALID_ARGUMENT");

        let err: AppError = DomainError::internal("hash failed").into();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_password_error_becomes_field_error() {
        let err: AppError = DomainError::password("too short").into();
        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, "password");
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = AppError::internal("connection string leaked");
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_conflict_message() {
        assert_eq!(AppError::conflict("Email").user_message(), "Email already exists");
    }

    #[test]
    fn test_option_ext() {
        let missing: Option<u8> = None;
        assert!(matches!(missing.ok_or_not_found(), Err(AppError::NotFound)));
        assert_eq!(Some(1).ok_or_not_found().unwrap(), 1);
    }
}
