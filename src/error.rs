use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tokio::task::JoinError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum GatehouseError {
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Blocking task failed: {0}")]
    BlockingTask(#[from] JoinError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<argon2::password_hash::Error> for GatehouseError {
    fn from(e: argon2::password_hash::Error) -> Self {
        GatehouseError::PasswordHash(e.to_string())
    }
}

impl IntoResponse for GatehouseError {
    fn into_response(self) -> Response {
        // Details stay in the log; clients get a generic body.
        error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal server error occurred.",
        )
            .into_response()
    }
}
