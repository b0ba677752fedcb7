//! Error type returned by the service layer.
//!
//! Each variant corresponds to one failure class the HTTP layer distinguishes:
//! bad credentials (401), insufficient role (403), missing or foreign resource
//! (404), rejected input (400), and internal failures (500).

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::auth::policy::InsufficientRole;

/// A rejected input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Login failed or the session no longer maps to a user
    #[error("{0}")]
    Authentication(String),

    /// Actor's role does not clear the operation's gate
    #[error(transparent)]
    Permission(#[from] InsufficientRole),

    /// Resource absent, or present in another organization
    #[error("{0}")]
    NotFound(String),

    /// Input rejected before touching storage
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

impl ServiceError {
    pub fn task_not_found() -> Self {
        ServiceError::NotFound("Task not found".to_string())
    }

    pub fn invalid_credentials() -> Self {
        ServiceError::Authentication("Invalid credentials".to_string())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field));
                    FieldError::new(field.to_string(), message)
                })
            })
            .collect();

        // HashMap iteration order is unstable
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ServiceError::Validation(fields)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
