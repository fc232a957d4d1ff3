//! Video provider client (Zoom server-to-server OAuth).
//!
//! The access token is cached in a moka TTL cache and refreshed lazily
//! when it expires. Two callers racing on an empty cache may both fetch a
//! token; either one is valid.

use std::time::Duration;

use moka::sync::Cache;
use registra_core::integrations::{UpcomingWebinar, VideoProvider};
use registra_core::lead::CanonicalLead;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::ZoomConfig;
use crate::error::IntegrationError;
use crate::http::ensure_success;

const TOKEN_KEY: &str = "access_token";
const PAGE_SIZE: &str = "300";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct WebinarList {
    #[serde(default)]
    webinars: Vec<ScheduledWebinar>,
}

#[derive(Debug, Deserialize)]
struct ScheduledWebinar {
    id: Value,
    topic: String,
    #[serde(default)]
    start_time: String,
}

impl ScheduledWebinar {
    fn into_upcoming(self) -> Option<UpcomingWebinar> {
        let id = match self.id {
            Value::Number(n) => n.to_string(),
            Value::String(s) if !s.is_empty() => s,
            _ => return None,
        };
        Some(UpcomingWebinar {
            id,
            label: format!("{} ({})", self.topic, self.start_time),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ParticipantsReport {
    #[serde(default)]
    total_records: u64,
}

/// Registrant body. First name falls back to `Registrant`, last name to
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct RegistrantPayload {
    email: String,
    first_name: String,
    last_name: String,
}

impl RegistrantPayload {
    /// `None` when the lead has no email.
    fn from_lead(lead: &CanonicalLead) -> Option<Self> {
        let email = lead.email.clone().filter(|e| !e.is_empty())?;
        Some(Self {
            email,
            first_name: lead
                .first_name
                .clone()
                .unwrap_or_else(|| "Registrant".into()),
            last_name: lead.last_name.clone().unwrap_or_default(),
        })
    }
}

#[derive(Clone)]
pub struct ZoomClient {
    http: Client,
    config: ZoomConfig,
    tokens: Cache<&'static str, String>,
}

impl ZoomClient {
    pub fn new(http: Client, config: ZoomConfig) -> Self {
        let tokens = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(config.token_ttl_secs))
            .build();
        Self {
            http,
            config,
            tokens,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    async fn access_token(&self) -> Result<String, IntegrationError> {
        if let Some(token) = self.tokens.get(TOKEN_KEY) {
            return Ok(token);
        }
        if !self.config.is_configured() {
            return Err(IntegrationError::NotConfigured("zoom"));
        }

        let response = self
            .http
            .post(&self.config.oauth_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "account_credentials"),
                ("account_id", self.config.account_id.as_str()),
            ])
            .send()
            .await?;
        let response = ensure_success(response)
            .await
            .map_err(|e| IntegrationError::Auth {
                provider: "zoom",
                reason: e.to_string(),
            })?;
        let body: TokenResponse = response.json().await?;

        self.tokens.insert(TOKEN_KEY, body.access_token.clone());
        Ok(body.access_token)
    }

    async fn fetch_upcoming(&self) -> Result<Vec<UpcomingWebinar>, IntegrationError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(self.api_url("/users/me/webinars"))
            .bearer_auth(token)
            .query(&[("type", "upcoming"), ("page_size", PAGE_SIZE)])
            .send()
            .await?;
        let list: WebinarList = ensure_success(response).await?.json().await?;
        Ok(list
            .webinars
            .into_iter()
            .filter_map(ScheduledWebinar::into_upcoming)
            .collect())
    }

    async fn post_registrant(
        &self,
        webinar_id: &str,
        payload: &RegistrantPayload,
    ) -> Result<(), IntegrationError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(self.api_url(&format!("/webinars/{webinar_id}/registrants")))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn fetch_attendance(&self, webinar_id: &str) -> Result<u64, IntegrationError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(self.api_url(&format!("/report/webinars/{webinar_id}/participants")))
            .bearer_auth(token)
            .query(&[("page_size", PAGE_SIZE)])
            .send()
            .await?;
        let report: ParticipantsReport = ensure_success(response).await?.json().await?;
        Ok(report.total_records)
    }
}

impl VideoProvider for ZoomClient {
    async fn list_upcoming(&self) -> Vec<UpcomingWebinar> {
        match self.fetch_upcoming().await {
            Ok(webinars) => webinars,
            Err(e) => {
                error!(error = %e, "Listing upcoming webinars failed");
                Vec::new()
            }
        }
    }

    async fn register_registrant(&self, webinar_id: &str, lead: &CanonicalLead) -> bool {
        let Some(payload) = RegistrantPayload::from_lead(lead) else {
            warn!(webinar_id, "Registrant sync skipped: no email in lead");
            return false;
        };

        match self.post_registrant(webinar_id, &payload).await {
            Ok(()) => {
                info!(webinar_id, email = %payload.email, "Registrant synced");
                true
            }
            Err(e) => {
                error!(webinar_id, email = %payload.email, error = %e, "Registrant sync failed");
                false
            }
        }
    }

    async fn attendance_count(&self, webinar_id: &str) -> u64 {
        match self.fetch_attendance(webinar_id).await {
            Ok(total) => total,
            Err(e) => {
                warn!(webinar_id, error = %e, "Attendance lookup failed");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn registrant_defaults_names() {
        let lead = CanonicalLead {
            email: Some("ana@example.com".into()),
            ..Default::default()
        };
        let payload = RegistrantPayload::from_lead(&lead).unwrap();
        assert_eq!(payload.first_name, "Registrant");
        assert_eq!(payload.last_name, "");
    }

    #[test]
    fn registrant_requires_email() {
        let lead = CanonicalLead {
            first_name: Some("Ana".into()),
            ..Default::default()
        };
        assert!(RegistrantPayload::from_lead(&lead).is_none());
    }

    #[test]
    fn upcoming_label_and_numeric_id() {
        let list: WebinarList = serde_json::from_value(json!({
            "webinars": [
                { "id": 81234567890u64, "topic": "Launch", "start_time": "2026-11-01T15:00:00Z" },
                { "id": null, "topic": "Broken" }
            ]
        }))
        .unwrap();
        let upcoming: Vec<_> = list
            .webinars
            .into_iter()
            .filter_map(ScheduledWebinar::into_upcoming)
            .collect();
        assert_eq!(
            upcoming,
            vec![UpcomingWebinar {
                id: "81234567890".into(),
                label: "Launch (2026-11-01T15:00:00Z)".into(),
            }]
        );
    }

    #[test]
    fn participants_default_to_zero() {
        let report: ParticipantsReport = serde_json::from_value(json!({})).unwrap();
        assert_eq!(report.total_records, 0);
    }

    #[tokio::test]
    async fn unconfigured_client_degrades_quietly() {
        let client = ZoomClient::new(Client::new(), ZoomConfig::default());
        assert!(client.list_upcoming().await.is_empty());
        assert_eq!(client.attendance_count("8123").await, 0);
        let lead = CanonicalLead {
            email: Some("ana@example.com".into()),
            ..Default::default()
        };
        assert!(!client.register_registrant("8123", &lead).await);
    }
}
