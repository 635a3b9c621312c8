use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_valid::ValidRejection;
use sea_orm::DbErr;
use service::{validation, ServiceError};
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error type returned by every JSON handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// No valid session cookie on a protected route
    #[error("Authentication required")]
    Unauthenticated,

    /// Opening or committing the request transaction failed
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ApiError {
    pub fn forbidden(message: &str) -> Self {
        ApiError::Service(ServiceError::Forbidden(message.to_string()))
    }

    pub fn status(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Service(err) => match err {
                ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                ServiceError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                ServiceError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                ServiceError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
                }
                ServiceError::Database(_) | ServiceError::Hashing(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
            },
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Text safe to show to the client. Internal failures never expose
    /// their cause.
    pub fn public_message(&self) -> String {
        if self.status() == StatusCode::INTERNAL_SERVER_ERROR {
            INTERNAL_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::Validation(rejection.body_text()).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::Validation(rejection.body_text()).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::Validation(rejection.body_text()).into()
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ServiceError::Validation(rejection.body_text()).into()
    }
}

impl From<ValidRejection<QueryRejection>> for ApiError {
    fn from(rejection: ValidRejection<QueryRejection>) -> Self {
        match rejection {
            ValidRejection::Valid(errors) => {
                ServiceError::Validation(validation::describe_errors(&errors)).into()
            }
            ValidRejection::Inner(inner) => inner.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self);
        }

        let body = ErrorResponse {
            error: self.public_message(),
            code: code.to_string(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ServiceError::Hashing("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError::from(DbErr::Custom("no such table: users".to_string()));
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);

        let err = ApiError::from(ServiceError::Conflict("Username already exists".into()));
        assert_eq!(err.public_message(), "Username already exists");
    }
}
