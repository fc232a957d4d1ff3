//! Server errors and their HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use registra_core::error::RegistraError;
use registra_db::DbError;
use registra_integrations::IntegrationError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Start-up and infrastructure failures.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration for {key}: {reason}")]
    Config { key: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Integration(#[from] IntegrationError),

    #[error("export failed: {0}")]
    Export(String),
}

impl From<csv::Error> for ServerError {
    fn from(err: csv::Error) -> Self {
        ServerError::Export(err.to_string())
    }
}

impl From<ServerError> for RegistraError {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Db(e) => e.into(),
            ServerError::Integration(e) => e.into(),
            other => RegistraError::Internal(other.to_string()),
        }
    }
}

/// Handler error: a [`RegistraError`] rendered as JSON.
#[derive(Debug)]
pub struct ApiError(pub RegistraError);

impl<E: Into<RegistraError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            RegistraError::NotFound { .. } | RegistraError::TenantContext => (
                StatusCode::NOT_FOUND,
                json!({ "message": self.0.to_string() }),
            ),
            RegistraError::AlreadyExists { .. } => (
                StatusCode::CONFLICT,
                json!({ "message": self.0.to_string() }),
            ),
            RegistraError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "message": "The given data was invalid.", "errors": errors }),
            ),
            RegistraError::InvalidSchema { message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "message": "The form schema is invalid.", "errors": { "form_schema": [message] } }),
            ),
            RegistraError::Database(_)
            | RegistraError::Integration(_)
            | RegistraError::Internal(_) => {
                error!(error = %self.0, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
