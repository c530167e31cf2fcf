//! Patron-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | NotFound | 404 |
//! | Conflict | 409 |
//! | Database | 500 |
//! | Internal | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors surfaced by patron use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatronError {
    /// Input broke a value object rule or a business rule.
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// Another patron already uses this email.
    #[error("A patron with email {email} already exists")]
    Conflict { email: String },

    #[error("Patron not found: {id}")]
    NotFound { id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PatronError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PatronError::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn conflict(email: impl Into<String>) -> Self {
        PatronError::Conflict {
            email: email.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        PatronError::NotFound { id: id.into() }
    }

    pub fn database(message: impl Into<String>) -> Self {
        PatronError::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PatronError::Internal(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PatronError::Validation { .. } => ErrorCode::ValidationFailed,
            PatronError::Conflict { .. } => ErrorCode::PatronExists,
            PatronError::NotFound { .. } => ErrorCode::PatronNotFound,
            PatronError::Database(_) => ErrorCode::DatabaseError,
            PatronError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// True for failures the caller did not cause.
    pub fn is_server_error(&self) -> bool {
        matches!(self, PatronError::Database(_) | PatronError::Internal(_))
    }
}

impl From<ValidationError> for PatronError {
    fn from(err: ValidationError) -> Self {
        PatronError::Validation {
            field: err.field().map(str::to_string),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for PatronError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => PatronError::Validation {
                field: err.details.get("field").cloned(),
                message: err.message,
            },
            ErrorCode::PatronExists => PatronError::Conflict {
                email: err
                    .details
                    .get("email")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
            },
            ErrorCode::PatronNotFound => PatronError::NotFound {
                id: err
                    .details
                    .get("id")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
            },
            ErrorCode::DatabaseError => PatronError::Database(err.message),
            ErrorCode::InternalError => PatronError::Internal(err.message),
        }
    }
}

impl From<PatronError> for DomainError {
    fn from(err: PatronError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
