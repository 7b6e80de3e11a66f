use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JarLedgerError>;

#[derive(Error, Debug)]
pub enum JarLedgerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResponseError for JarLedgerError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(json!({
            "error": {
                "code": status_code.as_u16(),
                "message": error_message,
                "type": self.error_type()
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            JarLedgerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // The front-end contract expects 400 for duplicate mobiles, not 409.
            JarLedgerError::Conflict(_) => StatusCode::BAD_REQUEST,
            JarLedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            JarLedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            JarLedgerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl JarLedgerError {
    fn error_type(&self) -> &str {
        match self {
            JarLedgerError::Database(_) => "database_error",
            JarLedgerError::Conflict(_) => "duplicate_error",
            JarLedgerError::NotFound(_) => "not_found",
            JarLedgerError::Validation(_) => "validation_error",
            JarLedgerError::Config(_) => "config_error",
        }
    }
}
