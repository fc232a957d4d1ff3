//! Best-effort work after a registration is stored.
//!
//! Registers the lead with the video provider and reports the conversion
//! to the ad platform. Nothing here can fail the registration: every
//! failure is logged and counted in the returned report.

use chrono::Utc;
use registra_core::integrations::{
    ConversionEvent, ConversionUserData, ConversionsApi, VideoProvider,
};
use registra_core::lead::extract_canonical;
use registra_core::models::submission::Submission;
use registra_core::models::webinar::{TrackingScript, Webinar};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct FollowUpConfig {
    /// Conversions API token. Without it no conversion events are sent.
    pub conversions_access_token: Option<String>,
}

/// What the submitting browser told us about itself.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// The page the form was submitted from.
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowUpReport {
    /// `None` when registration was not attempted.
    pub registered: Option<bool>,
    pub events_sent: u32,
    pub events_failed: u32,
}

pub struct FollowUp<V: VideoProvider, C: ConversionsApi> {
    video: V,
    conversions: C,
    config: FollowUpConfig,
}

impl<V: VideoProvider, C: ConversionsApi> FollowUp<V, C> {
    pub fn new(video: V, conversions: C, config: FollowUpConfig) -> Self {
        Self {
            video,
            conversions,
            config,
        }
    }

    pub fn conversions(&self) -> &C {
        &self.conversions
    }

    pub async fn run(
        &self,
        webinar: &Webinar,
        submission: &Submission,
        request: &RequestContext,
    ) -> FollowUpReport {
        let lead = extract_canonical(&submission.data);
        let mut report = FollowUpReport::default();

        if let Some(video_id) = webinar
            .video_webinar_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
        {
            if lead.email.is_some() {
                let ok = self.video.register_registrant(video_id, &lead).await;
                if !ok {
                    warn!(
                        webinar_id = %webinar.id,
                        submission_id = %submission.id,
                        video_webinar_id = video_id,
                        "Registrant sync failed"
                    );
                }
                report.registered = Some(ok);
            } else {
                debug!(submission_id = %submission.id, "No email, registrant sync skipped");
            }
        }

        let Some(token) = self
            .config
            .conversions_access_token
            .as_deref()
            .filter(|t| !t.is_empty())
        else {
            return report;
        };

        let pixels = webinar
            .tracking_scripts
            .iter()
            .filter_map(TrackingScript::active_facebook_pixel);
        for pixel_id in pixels {
            let user_data = ConversionUserData::from_lead(
                &lead,
                request.ip_address.clone(),
                request.user_agent.clone(),
                Some(submission.id.to_string()),
            );
            let event = ConversionEvent::complete_registration(
                submission.id.to_string(),
                user_data,
                request.source_url.clone(),
                Utc::now(),
            );
            if self.conversions.send_event(pixel_id, token, &event).await {
                report.events_sent += 1;
            } else {
                report.events_failed += 1;
                warn!(
                    webinar_id = %webinar.id,
                    submission_id = %submission.id,
                    pixel_id,
                    "Conversion event failed"
                );
            }
        }

        info!(
            submission_id = %submission.id,
            registered = ?report.registered,
            events_sent = report.events_sent,
            events_failed = report.events_failed,
            "Follow-up finished"
        );
        report
    }
}
