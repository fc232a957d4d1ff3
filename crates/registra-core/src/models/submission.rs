//! Submission domain model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The five marketing-attribution keys captured with every submission.
pub const UTM_KEYS: [&str; 5] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
];

/// UTM attribution captured at submission time. Absent values stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utm {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
}

impl Utm {
    /// Pick the UTM keys out of raw form input. Empty values count as absent.
    pub fn from_input(input: &BTreeMap<String, String>) -> Self {
        let take = |key: &str| {
            input
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            utm_source: take("utm_source"),
            utm_medium: take("utm_medium"),
            utm_campaign: take("utm_campaign"),
            utm_term: take("utm_term"),
            utm_content: take("utm_content"),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.pairs().iter().all(|(_, v)| v.is_none())
    }

    /// `(key, value)` pairs in [`UTM_KEYS`] order.
    pub fn pairs(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("utm_source", self.utm_source.as_deref()),
            ("utm_medium", self.utm_medium.as_deref()),
            ("utm_campaign", self.utm_campaign.as_deref()),
            ("utm_term", self.utm_term.as_deref()),
            ("utm_content", self.utm_content.as_deref()),
        ]
    }
}

/// A stored registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    /// The webinar this submission belongs to.
    pub webinar_id: Uuid,
    /// Answers keyed by field schema name, as normalized at submit time.
    pub data: Map<String, Value>,
    #[serde(flatten)]
    pub utm: Utm,
    /// Set once the lead has been delivered to the enrichment webhook.
    pub sent_to_clay_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn is_dispatched(&self) -> bool {
        self.sent_to_clay_at.is_some()
    }
}

/// Fields required to persist a new submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubmission {
    pub webinar_id: Uuid,
    pub data: Map<String, Value>,
    pub utm: Utm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utm_from_input_ignores_empty_and_foreign_keys() {
        let input = BTreeMap::from([
            ("utm_source".to_string(), "paid".to_string()),
            ("utm_medium".to_string(), "  ".to_string()),
            ("email".to_string(), "a@b.com".to_string()),
        ]);
        let utm = Utm::from_input(&input);
        assert_eq!(utm.utm_source.as_deref(), Some("paid"));
        assert_eq!(utm.utm_medium, None);
        assert!(!utm.is_blank());
        assert!(Utm::default().is_blank());
    }
}
