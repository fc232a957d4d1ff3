//! Shared HTTP plumbing.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::config::IntegrationsConfig;
use crate::error::IntegrationError;

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Build the client every integration shares, with the configured
/// per-call timeout.
pub fn build_client(config: &IntegrationsConfig) -> Result<Client, IntegrationError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .user_agent(concat!("registra/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Pass 2xx responses through; turn anything else into
/// [`IntegrationError::Status`] with a truncated body.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, IntegrationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    Err(IntegrationError::Status {
        status: status.as_u16(),
        body,
    })
}
