use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::db::services::ServiceError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String, details: Vec<String> },
    #[error("User already exists: {0}")]
    UserAlreadyExists(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing access token")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Password hashing failed: {0}")]
    PasswordHashingError(String),
    #[error("JWT creation failed: {0}")]
    TokenCreationError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            AppError::ValidationFailed { message, details } => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": message, "details": details }),
            ),
            AppError::UserAlreadyExists(msg) => {
                (StatusCode::CONFLICT, serde_json::json!({ "error": msg }))
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": "Invalid email or password" }),
            ),
            AppError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": "Access token required" }),
            ),
            AppError::InvalidToken => (
                StatusCode::FORBIDDEN,
                serde_json::json!({ "error": "Invalid or expired token" }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg })),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, serde_json::json!({ "error": msg })),
            // Details stay in the log; the caller only learns that something failed.
            internal @ (AppError::PasswordHashingError(_)
            | AppError::TokenCreationError(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)) => {
                error!(error = %internal, "Request failed with an internal error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => AppError::InvalidInput(msg),
            ServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::DbErr(db_err) => AppError::DatabaseError(db_err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // serde's wording and positions stay in the log.
        warn!(error = %rejection.body_text(), "Rejected request body.");
        AppError::InvalidInput(json_rejection_message(&rejection).to_string())
    }
}

fn json_rejection_message(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON body",
        JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
        _ => "Invalid request body",
    }
}

/// Parses an id taken from the URL path.
pub fn parse_path_id(raw: &str, message: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::InvalidInput(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (AppError::UserAlreadyExists("x".into()), StatusCode::CONFLICT),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::MissingToken, StatusCode::UNAUTHORIZED),
            (AppError::InvalidToken, StatusCode::FORBIDDEN),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (AppError::DatabaseError("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_service_errors_convert() {
        let err: AppError = ServiceError::Validation("bad".into()).into();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg == "bad"));
        let err: AppError = ServiceError::Forbidden("no".into()).into();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_parse_path_id() {
        assert_eq!(parse_path_id("17", "bad id").unwrap(), 17);
        assert!(matches!(
            parse_path_id("abc", "bad id"),
            Err(AppError::InvalidInput(msg)) if msg == "bad id"
        ));
    }
}
