use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::domain::FieldErrors;
use crate::services::AuthError;

#[derive(Debug)]
pub enum ApiError {
    /// No bearer token was presented.
    Unauthorized(String),

    /// A bearer token was presented but does not resolve.
    InvalidToken(String),

    InvalidCredentials(String),

    /// The access gate could not reach the token store.
    AuthenticationError(String),

    NotFound(String),

    Conflict(String),

    ValidationError {
        message: String,
        errors: Option<FieldErrors>,
    },

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            ApiError::InvalidCredentials(msg) => write!(f, "Invalid credentials: {}", msg),
            ApiError::AuthenticationError(msg) => write!(f, "Authentication error: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError { message, .. } => {
                write!(f, "Validation error: {}", message)
            }
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Wire code reported in the `error` field.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::InvalidToken(_) => "INVALID_TOKEN",
            ApiError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            ApiError::AuthenticationError(_) => "AUTHENTICATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_)
            | ApiError::InvalidToken(_)
            | ApiError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::AuthenticationError(_)
            | ApiError::DatabaseError(_)
            | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let (message, errors) = match self {
            ApiError::AuthenticationError(msg) => {
                tracing::error!("Authentication error: {}", msg);
                ("Authentication error".to_string(), None)
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                ("A database error occurred".to_string(), None)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("An internal error occurred".to_string(), None)
            }
            ApiError::ValidationError { message, errors } => (message, errors),
            ApiError::Unauthorized(msg)
            | ApiError::InvalidToken(msg)
            | ApiError::InvalidCredentials(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => (msg, None),
        };

        let body = ApiResponse::error(code, message, errors);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(db_err) = err.downcast_ref::<sea_orm::DbErr>() {
            // A racing insert can slip past the uniqueness pre-checks.
            if let Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) = db_err.sql_err() {
                return ApiError::conflict(format!("Duplicate value: {detail}"));
            }
            return ApiError::DatabaseError(format!("{err:#}"));
        }
        ApiError::InternalError(format!("{err:#}"))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(errors) => ApiError::fields(errors),
            AuthError::InvalidCredentials => ApiError::invalid_credentials(),
            AuthError::Unauthorized => ApiError::unauthorized(),
            AuthError::InvalidToken => ApiError::invalid_token(),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::fields(errors)
    }
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Access token required".to_string())
    }

    pub fn invalid_token() -> Self {
        ApiError::InvalidToken("Invalid or expired token".to_string())
    }

    pub fn invalid_credentials() -> Self {
        ApiError::InvalidCredentials("Invalid credentials".to_string())
    }

    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError {
            message: msg.into(),
            errors: None,
        }
    }

    /// Field-level failures; the first message doubles as the summary.
    pub fn fields(errors: FieldErrors) -> Self {
        let message = errors
            .first_message()
            .unwrap_or("The given data was invalid")
            .to_string();
        ApiError::ValidationError {
            message,
            errors: Some(errors),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }
}
