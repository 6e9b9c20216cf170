use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, message, errors) = match self {
            Error::Validation(errs) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                flatten_validation_errors(&errs),
            ),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg, vec![]),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg, vec![]),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, vec![]),
            Error::Database(err) => {
                tracing::error!(error = ?err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                    vec![],
                )
            }
            Error::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                    vec![],
                )
            }
            other => {
                tracing::error!(error = ?other, "unhandled error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                    vec![],
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "data": null,
            "errors": errors,
        }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => {
                return Error::NotFound("Resource not found".to_string());
            }
            // Unique index is the authoritative guard; a lost race between
            // the application-level check and the insert lands here.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                return Error::Conflict("Resource already exists".to_string());
            }
            _ => {}
        }
        Error::Database(err)
    }
}

/// One message per violated field constraint, `field: message` form.
pub fn flatten_validation_errors(errs: &validator::ValidationErrors) -> Vec<String> {
    let mut out = Vec::new();
    for (field, field_errors) in errs.field_errors() {
        for err in field_errors {
            let detail = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            out.push(format!("{}: {}", field, detail));
        }
    }
    out.sort();
    out
}
