//! Conversions API client.

use registra_core::integrations::{ConversionEvent, ConversionsApi};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use crate::config::MetaConfig;
use crate::error::IntegrationError;
use crate::http::ensure_success;

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events_received: u64,
}

/// Sends server-side events to `{base}/{version}/{pixel_id}/events`.
#[derive(Clone)]
pub struct MetaConversionsClient {
    http: Client,
    graph_base_url: String,
    api_version: String,
}

impl MetaConversionsClient {
    pub fn new(http: Client, config: &MetaConfig) -> Self {
        Self {
            http,
            graph_base_url: config.graph_base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        }
    }

    fn events_url(&self, pixel_id: &str) -> String {
        format!("{}/{}/{}/events", self.graph_base_url, self.api_version, pixel_id)
    }

    async fn post(
        &self,
        pixel_id: &str,
        access_token: &str,
        event: &ConversionEvent,
    ) -> Result<u64, IntegrationError> {
        let response = self
            .http
            .post(self.events_url(pixel_id))
            .form(&form_body(event, access_token))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: EventsResponse = response.json().await?;
        Ok(body.events_received)
    }
}

/// The form fields of an events request: the events as a JSON array in
/// `data`, plus the token.
fn form_body(event: &ConversionEvent, access_token: &str) -> [(&'static str, String); 2] {
    let data = Value::Array(vec![event.to_wire()]).to_string();
    [("data", data), ("access_token", access_token.to_string())]
}

impl ConversionsApi for MetaConversionsClient {
    async fn send_event(&self, pixel_id: &str, access_token: &str, event: &ConversionEvent) -> bool {
        match self.post(pixel_id, access_token, event).await {
            Ok(events_received) => {
                info!(
                    pixel_id,
                    event_name = %event.event_name,
                    event_id = %event.event_id,
                    events_received,
                    "Conversion event sent"
                );
                true
            }
            Err(e) => {
                error!(
                    pixel_id,
                    event_name = %event.event_name,
                    event_id = %event.event_id,
                    error = %e,
                    "Failed to send conversion event"
                );
                false
            }
        }
    }
}
