//! Outbound integration contracts.
//!
//! The core never talks HTTP. It assembles payloads here, from the shared
//! [`extract_canonical`](crate::lead::extract_canonical) output, and hands
//! them to implementations of the traits below. Every call reports plain
//! success or failure; failures are logged by the implementation and never
//! propagate to a submitter.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

use crate::lead::{CanonicalLead, extract_canonical};
use crate::models::submission::{Submission, Utm};
use crate::schema::normalize_phone;

/// Receives leads for enrichment through a webhook.
pub trait LeadEnrichment: Send + Sync {
    fn send_lead(
        &self,
        webhook_url: &str,
        payload: &EnrichmentPayload,
    ) -> impl Future<Output = bool> + Send;
}

/// Server-side conversion events for an ad platform.
pub trait ConversionsApi: Send + Sync {
    fn send_event(
        &self,
        pixel_id: &str,
        access_token: &str,
        event: &ConversionEvent,
    ) -> impl Future<Output = bool> + Send;
}

/// A webinar scheduled on the video provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingWebinar {
    pub id: String,
    /// `"{topic} ({start_time})"`.
    pub label: String,
}

/// Registrant sync and attendance reporting on the video provider.
pub trait VideoProvider: Send + Sync {
    /// Empty on any failure.
    fn list_upcoming(&self) -> impl Future<Output = Vec<UpcomingWebinar>> + Send;
    /// Must not call the provider when the lead has no email.
    fn register_registrant(
        &self,
        webinar_id: &str,
        lead: &CanonicalLead,
    ) -> impl Future<Output = bool> + Send;
    /// 0 on any failure.
    fn attendance_count(&self, webinar_id: &str) -> impl Future<Output = u64> + Send;
}

// ---------------------------------------------------------------------------
// Enrichment payload
// ---------------------------------------------------------------------------

/// The JSON body sent to the enrichment webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentPayload {
    pub timestamp: String,
    #[serde(flatten)]
    pub lead: CanonicalLead,
    pub submission_data: Map<String, Value>,
    #[serde(flatten)]
    pub utm: Utm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webinar_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
}

impl EnrichmentPayload {
    pub fn build(
        submission: &Submission,
        webinar_title: Option<&str>,
        tenant_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, false),
            lead: extract_canonical(&submission.data),
            submission_data: submission.data.clone(),
            utm: submission.utm.clone(),
            webinar_title: webinar_title.filter(|t| !t.is_empty()).map(str::to_string),
            client_name: tenant_name.filter(|n| !n.is_empty()).map(str::to_string),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions payload
// ---------------------------------------------------------------------------

/// Lowercase hex SHA-256.
pub fn sha256_hex(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

fn hash_normalized(value: &str) -> String {
    sha256_hex(&value.trim().to_lowercase())
}

/// Raw user data available for conversion matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionUserData {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub client_ip_address: Option<String>,
    pub client_user_agent: Option<String>,
    pub external_id: Option<String>,
}

impl ConversionUserData {
    pub fn from_lead(
        lead: &CanonicalLead,
        client_ip_address: Option<String>,
        client_user_agent: Option<String>,
        external_id: Option<String>,
    ) -> Self {
        Self {
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            client_ip_address,
            client_user_agent,
            external_id,
        }
    }

    /// Matching keys as the platform expects them: contact fields hashed,
    /// network fields passed through, empty values dropped.
    pub fn hashed(&self) -> Map<String, Value> {
        let present = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let mut out = Map::new();
        if let Some(email) = present(&self.email) {
            out.insert("em".into(), hash_normalized(&email).into());
        }
        if let Some(phone) = present(&self.phone) {
            out.insert("ph".into(), sha256_hex(&normalize_phone(&phone)).into());
        }
        if let Some(first) = present(&self.first_name) {
            out.insert("fn".into(), hash_normalized(&first).into());
        }
        if let Some(last) = present(&self.last_name) {
            out.insert("ln".into(), hash_normalized(&last).into());
        }
        if let Some(ip) = present(&self.client_ip_address) {
            out.insert("client_ip_address".into(), ip.into());
        }
        if let Some(ua) = present(&self.client_user_agent) {
            out.insert("client_user_agent".into(), ua.into());
        }
        if let Some(id) = present(&self.external_id) {
            out.insert("external_id".into(), sha256_hex(&id).into());
        }
        out
    }
}

/// One server-side conversion event.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionEvent {
    pub event_name: String,
    /// Deduplication key shared with the browser pixel.
    pub event_id: String,
    pub event_time: DateTime<Utc>,
    pub user_data: ConversionUserData,
    pub custom_data: Map<String, Value>,
    pub event_source_url: Option<String>,
}

impl ConversionEvent {
    /// The registration event sent after a successful submission.
    pub fn complete_registration(
        event_id: String,
        user_data: ConversionUserData,
        event_source_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut custom_data = Map::new();
        custom_data.insert("status".into(), "registered".into());
        Self {
            event_name: "CompleteRegistration".into(),
            event_id,
            event_time: now,
            user_data,
            custom_data,
            event_source_url,
        }
    }

    /// The event object in the platform's wire format.
    pub fn to_wire(&self) -> Value {
        let mut event = json!({
            "event_name": self.event_name,
            "event_time": self.event_time.timestamp(),
            "event_id": self.event_id,
            "action_source": "website",
            "user_data": self.user_data.hashed(),
        });
        if let Some(url) = &self.event_source_url {
            event["event_source_url"] = Value::String(url.clone());
        }
        if !self.custom_data.is_empty() {
            event["custom_data"] = Value::Object(self.custom_data.clone());
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    fn submission() -> Submission {
        Submission {
            id: Uuid::new_v4(),
            webinar_id: Uuid::new_v4(),
            data: json!({ "correo": "Ana@Example.com", "nombre": "Ana", "telefono": "+54 11 4444" })
                .as_object()
                .cloned()
                .unwrap(),
            utm: Utm {
                utm_source: Some("paid".into()),
                ..Default::default()
            },
            sent_to_clay_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn enrichment_payload_shape() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let payload = EnrichmentPayload::build(&submission(), Some("Launch"), Some("ACME"), now);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["timestamp"], "2026-03-01T12:00:00+00:00");
        assert_eq!(json["email"], "Ana@Example.com");
        assert_eq!(json["first_name"], "Ana");
        assert_eq!(json["phone"], "+54 11 4444");
        assert_eq!(json["submission_data"]["correo"], "Ana@Example.com");
        assert_eq!(json["utm_source"], "paid");
        assert_eq!(json["utm_medium"], Value::Null);
        assert_eq!(json["webinar_title"], "Launch");
        assert_eq!(json["client_name"], "ACME");
        assert!(json.get("company").is_none());
    }

    #[test]
    fn enrichment_payload_omits_missing_context() {
        let payload = EnrichmentPayload::build(&submission(), None, Some(""), Utc::now());
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("webinar_title").is_none());
        assert!(json.get("client_name").is_none());
    }

    #[test]
    fn user_data_hashing_rules() {
        let user = ConversionUserData {
            email: Some("  Ana@Example.COM ".into()),
            phone: Some("+1 (555) 123-4567".into()),
            first_name: Some(" Ana".into()),
            last_name: Some("".into()),
            client_ip_address: Some("203.0.113.7".into()),
            client_user_agent: Some("Mozilla/5.0".into()),
            external_id: Some("sub-1".into()),
        };
        let hashed = user.hashed();

        assert_eq!(hashed["em"], sha256_hex("ana@example.com"));
        assert_eq!(hashed["ph"], sha256_hex("+15551234567"));
        assert_eq!(hashed["fn"], sha256_hex("ana"));
        assert!(!hashed.contains_key("ln"));
        assert_eq!(hashed["client_ip_address"], "203.0.113.7");
        assert_eq!(hashed["client_user_agent"], "Mozilla/5.0");
        assert_eq!(hashed["external_id"], sha256_hex("sub-1"));
    }

    #[test]
    fn sha256_hex_is_lowercase_hex() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn registration_event_wire_format() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let lead = extract_canonical(&submission().data);
        let event = ConversionEvent::complete_registration(
            "evt-1".into(),
            ConversionUserData::from_lead(&lead, None, None, None),
            Some("https://acme.example.com/webinars/launch".into()),
            now,
        );
        let wire = event.to_wire();

        assert_eq!(wire["event_name"], "CompleteRegistration");
        assert_eq!(wire["event_time"], now.timestamp());
        assert_eq!(wire["event_id"], "evt-1");
        assert_eq!(wire["action_source"], "website");
        assert_eq!(wire["custom_data"], json!({ "status": "registered" }));
        assert_eq!(wire["user_data"]["em"], sha256_hex("ana@example.com"));
        assert_eq!(
            wire["event_source_url"],
            "https://acme.example.com/webinars/launch"
        );
    }
}
