//! Submission ingest: the only write path for submissions.

use std::collections::BTreeMap;

use registra_core::error::{RegistraError, RegistraResult};
use registra_core::models::submission::{CreateSubmission, Submission};
use registra_core::models::tenant::Tenant;
use registra_core::models::webinar::Webinar;
use registra_core::repository::{SubmissionRepository, WebinarRepository};
use registra_core::schema::build_rules;
use tracing::{debug, info};

/// A stored registration together with the webinar it was made for.
#[derive(Debug, Clone)]
pub struct Accepted {
    pub webinar: Webinar,
    pub submission: Submission,
}

/// Validates raw form input against a webinar's current schema and
/// persists the result. Never calls third parties.
pub struct SubmissionService<W: WebinarRepository, S: SubmissionRepository> {
    webinars: W,
    submissions: S,
}

impl<W: WebinarRepository, S: SubmissionRepository> SubmissionService<W, S> {
    pub fn new(webinars: W, submissions: S) -> Self {
        Self {
            webinars,
            submissions,
        }
    }

    /// Register `raw` for the tenant's webinar `slug`.
    ///
    /// Fails with `NotFound` when the tenant has no such webinar and with
    /// `Validation` when the input breaks the schema; nothing is stored in
    /// either case.
    pub async fn submit(
        &self,
        tenant: &Tenant,
        slug: &str,
        raw: &BTreeMap<String, String>,
    ) -> RegistraResult<Accepted> {
        let webinar = self.webinars.get_by_slug(tenant.id, slug).await?;

        let rules = build_rules(&webinar.form_schema);
        let validated = rules.validate(raw).map_err(|errors| {
            debug!(
                tenant_id = %tenant.id,
                webinar_id = %webinar.id,
                fields = ?errors.fields().collect::<Vec<_>>(),
                "Submission rejected"
            );
            RegistraError::Validation(errors)
        })?;

        let submission = self
            .submissions
            .create(CreateSubmission {
                webinar_id: webinar.id,
                data: validated.data,
                utm: validated.utm,
            })
            .await?;

        info!(
            tenant_id = %tenant.id,
            webinar_id = %webinar.id,
            submission_id = %submission.id,
            utm_source = submission.utm.utm_source.as_deref().unwrap_or(""),
            "Submission stored"
        );

        Ok(Accepted {
            webinar,
            submission,
        })
    }
}
