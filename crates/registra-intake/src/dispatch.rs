//! Delivery of stored leads to a webinar's enrichment webhook.
//!
//! A submission is pending while its `sent_to_clay_at` watermark is unset.
//! Each pending submission is sent once per run, oldest first, and is
//! watermarked only when the webhook accepts it. Failures stay pending
//! for the next run.

use chrono::Utc;
use registra_core::error::{RegistraError, RegistraResult, ValidationErrors};
use registra_core::integrations::{EnrichmentPayload, LeadEnrichment};
use registra_core::repository::{SubmissionRepository, TenantRepository, WebinarRepository};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Outcome of one dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub sent: u64,
    pub failed: u64,
}

pub struct DispatchService<T, W, S, E>
where
    T: TenantRepository,
    W: WebinarRepository,
    S: SubmissionRepository,
    E: LeadEnrichment,
{
    tenants: T,
    webinars: W,
    submissions: S,
    sender: E,
}

impl<T, W, S, E> DispatchService<T, W, S, E>
where
    T: TenantRepository,
    W: WebinarRepository,
    S: SubmissionRepository,
    E: LeadEnrichment,
{
    pub fn new(tenants: T, webinars: W, submissions: S, sender: E) -> Self {
        Self {
            tenants,
            webinars,
            submissions,
            sender,
        }
    }

    pub fn sender(&self) -> &E {
        &self.sender
    }

    /// Number of submissions not yet delivered.
    pub async fn pending_count(&self, webinar_id: Uuid) -> RegistraResult<u64> {
        self.webinars.get_by_id(webinar_id).await?;
        self.submissions.count_pending_dispatch(webinar_id).await
    }

    /// Send every pending submission of the webinar.
    pub async fn dispatch_pending(&self, webinar_id: Uuid) -> RegistraResult<DispatchReport> {
        let webinar = self.webinars.get_by_id(webinar_id).await?;
        let Some(webhook_url) = webinar
            .enrichment_webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
        else {
            return Err(RegistraError::Validation(ValidationErrors::general(
                "enrichment_webhook_url",
                "no enrichment webhook is configured for this webinar",
            )));
        };

        // The tenant name only decorates the payload.
        let tenant_name = match self.tenants.get_by_id(webinar.tenant_id).await {
            Ok(tenant) => Some(tenant.name),
            Err(e) => {
                warn!(webinar_id = %webinar.id, error = %e, "Tenant lookup failed during dispatch");
                None
            }
        };

        let pending = self.submissions.list_pending_dispatch(webinar_id).await?;
        let mut report = DispatchReport::default();

        for submission in pending {
            let payload = EnrichmentPayload::build(
                &submission,
                Some(&webinar.title),
                tenant_name.as_deref(),
                Utc::now(),
            );

            if !self.sender.send_lead(webhook_url, &payload).await {
                report.failed += 1;
                warn!(
                    webinar_id = %webinar.id,
                    submission_id = %submission.id,
                    "Lead delivery failed, left pending"
                );
                continue;
            }

            match self
                .submissions
                .mark_dispatched(submission.id, Utc::now())
                .await
            {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    // Delivered but not watermarked: it will be sent again.
                    report.failed += 1;
                    warn!(
                        submission_id = %submission.id,
                        error = %e,
                        "Lead delivered but watermark not stored"
                    );
                }
            }
        }

        info!(
            webinar_id = %webinar.id,
            sent = report.sent,
            failed = report.failed,
            "Dispatch finished"
        );
        Ok(report)
    }
}
