//! Integration error types.

use registra_core::error::RegistraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("authentication with {provider} failed: {reason}")]
    Auth {
        provider: &'static str,
        reason: String,
    },

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

impl From<IntegrationError> for RegistraError {
    fn from(err: IntegrationError) -> Self {
        RegistraError::Integration(err.to_string())
    }
}
