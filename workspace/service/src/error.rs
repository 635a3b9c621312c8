use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

/// Error types for the service layer
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Input failed a shape, length or confirmation check
    #[error("{0}")]
    Validation(String),

    /// A uniqueness rule would be broken
    #[error("{0}")]
    Conflict(String),

    /// The addressed row does not exist (or is not visible to the caller)
    #[error("{0}")]
    NotFound(String),

    /// The caller's role or ownership does not allow the operation
    #[error("{0}")]
    Forbidden(String),

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Error from the password hasher
    #[error("Password hashing error: {0}")]
    Hashing(String),
}

impl ServiceError {
    /// Turns a unique-constraint violation into `Conflict(message)`, anything
    /// else into `Database`.
    pub fn conflict_or_database(err: DbErr, message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!("Unique constraint violated: {}", detail);
                ServiceError::Conflict(message.to_string())
            }
            _ => {
                error!(?err, "Database error");
                ServiceError::Database(err)
            }
        }
    }

    pub fn not_found(what: &str) -> Self {
        ServiceError::NotFound(format!("{} not found", what))
    }
}

/// Type alias for Result with ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;
