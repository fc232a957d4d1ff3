//! Lead enrichment webhook client.

use registra_core::integrations::{EnrichmentPayload, LeadEnrichment};
use reqwest::Client;
use tracing::{error, info, warn};

use crate::error::IntegrationError;
use crate::http::ensure_success;

/// Posts enrichment payloads as JSON to a per-webinar webhook URL.
#[derive(Clone)]
pub struct ClayClient {
    http: Client,
    enabled: bool,
}

impl ClayClient {
    pub fn new(http: Client, enabled: bool) -> Self {
        Self { http, enabled }
    }

    async fn post(&self, webhook_url: &str, payload: &EnrichmentPayload) -> Result<u16, IntegrationError> {
        let response = self.http.post(webhook_url).json(payload).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.status().as_u16())
    }
}

impl LeadEnrichment for ClayClient {
    async fn send_lead(&self, webhook_url: &str, payload: &EnrichmentPayload) -> bool {
        let lead_email = payload.lead.email.as_deref().unwrap_or("N/A");
        if !self.enabled {
            warn!(lead_email, "Enrichment disabled, lead not sent");
            return false;
        }
        if webhook_url.trim().is_empty() {
            warn!(lead_email, "Enrichment webhook URL not configured");
            return false;
        }

        match self.post(webhook_url, payload).await {
            Ok(status) => {
                info!(webhook_url, lead_email, status, "Lead sent for enrichment");
                true
            }
            Err(e) => {
                error!(webhook_url, lead_email, error = %e, "Failed to send lead for enrichment");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use registra_core::models::submission::Submission;

    use super::*;
    use crate::config::IntegrationsConfig;
    use crate::http::build_client;

    fn payload() -> EnrichmentPayload {
        let submission = Submission {
            id: Default::default(),
            webinar_id: Default::default(),
            data: Default::default(),
            utm: Default::default(),
            sent_to_clay_at: None,
            created_at: Utc::now(),
        };
        EnrichmentPayload::build(&submission, None, None, Utc::now())
    }

    #[tokio::test]
    async fn empty_url_fails_without_a_call() {
        let client = ClayClient::new(build_client(&IntegrationsConfig::default()).unwrap(), true);
        assert!(!client.send_lead("", &payload()).await);
        assert!(!client.send_lead("   ", &payload()).await);
    }

    #[tokio::test]
    async fn disabled_client_never_sends() {
        let client = ClayClient::new(build_client(&IntegrationsConfig::default()).unwrap(), false);
        assert!(!client.send_lead("https://hooks.example.com/x", &payload()).await);
    }
}
