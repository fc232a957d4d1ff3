//! Read-time submission statistics.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use registra_core::error::RegistraResult;
use registra_core::integrations::VideoProvider;
use registra_core::lead::extract_canonical;
use registra_core::models::submission::Submission;
use registra_core::repository::{SubmissionRepository, WebinarRepository};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `utm_source` value that marks paid acquisition.
pub const PAID_SOURCE: &str = "paid";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionStats {
    pub total: u64,
    /// Distinct lowercased emails, across every email alias.
    pub unique_emails: u64,
    /// Submissions with no UTM value at all.
    pub without_utm: u64,
    /// Submissions whose `utm_source` is `paid`.
    pub paid: u64,
}

impl SubmissionStats {
    pub fn compute(submissions: &[Submission]) -> Self {
        let mut emails = HashSet::new();
        let mut stats = Self::default();
        for submission in submissions {
            stats.total += 1;
            if let Some(email) = extract_canonical(&submission.data).email {
                emails.insert(email.to_lowercase());
            }
            if submission.utm.is_blank() {
                stats.without_utm += 1;
            }
            if submission.utm.utm_source.as_deref() == Some(PAID_SOURCE) {
                stats.paid += 1;
            }
        }
        stats.unique_emails = emails.len() as u64;
        stats
    }
}

/// Creation-time bounds for the counters, both inclusive. Unset bounds
/// are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct StatsWindow {
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl StatsWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| at >= from) && self.to.is_none_or(|to| at <= to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WebinarStats {
    #[serde(flatten)]
    pub submissions: SubmissionStats,
    /// Participants reported by the video provider; absent when the
    /// webinar is not linked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<u64>,
}

pub struct StatsService<W: WebinarRepository, S: SubmissionRepository, V: VideoProvider> {
    webinars: W,
    submissions: S,
    video: V,
}

impl<W: WebinarRepository, S: SubmissionRepository, V: VideoProvider> StatsService<W, S, V> {
    pub fn new(webinars: W, submissions: S, video: V) -> Self {
        Self {
            webinars,
            submissions,
            video,
        }
    }

    /// Counters over the webinar's submissions created inside `window`.
    /// Attendance is not windowed.
    pub async fn for_webinar(
        &self,
        webinar_id: Uuid,
        window: StatsWindow,
    ) -> RegistraResult<WebinarStats> {
        let webinar = self.webinars.get_by_id(webinar_id).await?;
        let mut all = self.submissions.list_all_by_webinar(webinar_id).await?;
        all.retain(|s| window.contains(s.created_at));

        let attendance = match webinar
            .video_webinar_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
        {
            Some(video_id) => Some(self.video.attendance_count(video_id).await),
            None => None,
        };

        Ok(WebinarStats {
            submissions: SubmissionStats::compute(&all),
            attendance,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use registra_core::models::submission::Utm;
    use serde_json::{Map, Value, json};

    use super::*;

    fn submission(data: Value, utm_source: Option<&str>) -> Submission {
        let data: Map<String, Value> = data.as_object().cloned().unwrap_or_default();
        Submission {
            id: Uuid::new_v4(),
            webinar_id: Uuid::nil(),
            data,
            utm: Utm {
                utm_source: utm_source.map(str::to_string),
                ..Default::default()
            },
            sent_to_clay_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn counts_over_aliases_and_utm() {
        let all = vec![
            submission(json!({ "email": "Ana@example.com" }), Some("paid")),
            submission(json!({ "correo": "ana@example.com" }), None),
            submission(json!({ "email": "bo@example.com" }), Some("newsletter")),
            submission(json!({ "company": "Acme" }), None),
        ];
        let stats = SubmissionStats::compute(&all);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.unique_emails, 2);
        assert_eq!(stats.without_utm, 2);
        assert_eq!(stats.paid, 1);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(SubmissionStats::compute(&[]), SubmissionStats::default());
    }

    #[test]
    fn window_bounds_are_inclusive_and_optional() {
        use chrono::TimeZone;

        let at = |day| Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap();
        let window = StatsWindow {
            from: Some(at(2)),
            to: Some(at(4)),
        };
        assert!(!window.contains(at(1)));
        assert!(window.contains(at(2)));
        assert!(window.contains(at(4)));
        assert!(!window.contains(at(5)));
        assert!(StatsWindow::default().contains(at(1)));

        let parsed: StatsWindow = serde_json::from_value(json!({ "from": "2026-03-02T12:00:00Z" })).unwrap();
        assert_eq!(parsed.from, Some(at(2)));
        assert_eq!(parsed.to, None);
    }

    #[test]
    fn attendance_is_omitted_when_unlinked() {
        let stats = WebinarStats {
            submissions: SubmissionStats::default(),
            attendance: None,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["total"], 0);
        assert!(json.get("attendance").is_none());
    }
}
