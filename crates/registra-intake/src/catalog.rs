//! Tenant and webinar administration.
//!
//! Form schemas are checked here before they reach storage, and a webinar
//! linked to a video-provider session gets the fields the provider needs.

use registra_core::error::{RegistraError, RegistraResult, ValidationErrors};
use registra_core::models::tenant::{CreateTenant, Tenant};
use registra_core::models::webinar::{CreateWebinar, UpdateWebinar, Webinar};
use registra_core::repository::{PaginatedResult, Pagination, TenantRepository, WebinarRepository};
use registra_core::schema::augment_for_registrant_sync;
use registra_core::tenancy::IgnoredSubdomains;
use tracing::info;
use uuid::Uuid;

/// Slugs end up in hostnames and paths: lowercase ASCII letters, digits
/// and inner hyphens.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn check_slug(errors: &mut ValidationErrors, slug: &str) {
    if !is_valid_slug(slug) {
        errors.add(
            "slug",
            "may only contain lowercase letters, digits and inner hyphens",
        );
    }
}

/// Tenant slugs double as subdomains, so labels the host resolver skips
/// can never be reached.
fn check_tenant_slug(errors: &mut ValidationErrors, slug: &str, reserved: &IgnoredSubdomains) {
    check_slug(errors, slug);
    if reserved.contains(slug) {
        errors.add("slug", "is reserved");
    }
}

fn check_present(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "is required");
    }
}

fn into_result(errors: ValidationErrors) -> RegistraResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(RegistraError::Validation(errors))
    }
}

fn is_linked(video_webinar_id: Option<&str>) -> bool {
    video_webinar_id.is_some_and(|id| !id.trim().is_empty())
}

pub struct Catalog<T: TenantRepository, W: WebinarRepository> {
    tenants: T,
    webinars: W,
    reserved: IgnoredSubdomains,
}

impl<T: TenantRepository, W: WebinarRepository> Catalog<T, W> {
    pub fn new(tenants: T, webinars: W) -> Self {
        Self {
            tenants,
            webinars,
            reserved: IgnoredSubdomains::default(),
        }
    }

    /// Replace the labels refused as tenant slugs.
    pub fn with_reserved(mut self, reserved: IgnoredSubdomains) -> Self {
        self.reserved = reserved;
        self
    }

    // -------------------------------------------------------------------
    // Tenants
    // -------------------------------------------------------------------

    pub async fn create_tenant(&self, input: CreateTenant) -> RegistraResult<Tenant> {
        let mut errors = ValidationErrors::new();
        check_present(&mut errors, "name", &input.name);
        check_tenant_slug(&mut errors, &input.slug, &self.reserved);
        into_result(errors)?;

        let tenant = self.tenants.create(input).await?;
        info!(tenant_id = %tenant.id, slug = %tenant.slug, "Tenant created");
        Ok(tenant)
    }

    pub async fn get_tenant(&self, id: Uuid) -> RegistraResult<Tenant> {
        self.tenants.get_by_id(id).await
    }

    pub async fn list_tenants(
        &self,
        pagination: Pagination,
    ) -> RegistraResult<PaginatedResult<Tenant>> {
        self.tenants.list(pagination).await
    }

    pub async fn delete_tenant(&self, id: Uuid) -> RegistraResult<()> {
        // Surface NotFound instead of silently deleting nothing.
        self.tenants.get_by_id(id).await?;
        self.tenants.delete(id).await?;
        info!(tenant_id = %id, "Tenant deleted");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Webinars
    // -------------------------------------------------------------------

    /// Create a webinar under `tenant_id`, overriding any tenant id in
    /// the input.
    pub async fn create_webinar(
        &self,
        tenant_id: Uuid,
        mut input: CreateWebinar,
    ) -> RegistraResult<Webinar> {
        self.tenants.get_by_id(tenant_id).await?;
        input.tenant_id = tenant_id;

        let mut errors = ValidationErrors::new();
        check_present(&mut errors, "title", &input.title);
        check_slug(&mut errors, &input.slug);
        into_result(errors)?;

        if is_linked(input.video_webinar_id.as_deref()) {
            let added = augment_for_registrant_sync(&mut input.form_schema);
            if added > 0 {
                info!(added, "Form schema augmented for registrant sync");
            }
        }
        input.form_schema.validate_definition()?;

        let webinar = self.webinars.create(input).await?;
        info!(
            tenant_id = %tenant_id,
            webinar_id = %webinar.id,
            slug = %webinar.slug,
            "Webinar created"
        );
        Ok(webinar)
    }

    pub async fn get_webinar(&self, id: Uuid) -> RegistraResult<Webinar> {
        self.webinars.get_by_id(id).await
    }

    pub async fn list_webinars(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> RegistraResult<PaginatedResult<Webinar>> {
        self.tenants.get_by_id(tenant_id).await?;
        self.webinars.list_by_tenant(tenant_id, pagination).await
    }

    /// Apply a partial update.
    ///
    /// When the webinar ends up linked to a video-provider session and the
    /// update touches either the link or the schema, the resulting schema
    /// is augmented before it is checked and stored.
    pub async fn update_webinar(
        &self,
        id: Uuid,
        mut input: UpdateWebinar,
    ) -> RegistraResult<Webinar> {
        let current = self.webinars.get_by_id(id).await?;

        let mut errors = ValidationErrors::new();
        if let Some(title) = &input.title {
            check_present(&mut errors, "title", title);
        }
        if let Some(slug) = &input.slug {
            check_slug(&mut errors, slug);
        }
        into_result(errors)?;

        let linked_after = match input.video_webinar_id.as_deref() {
            Some(id) => is_linked(Some(id)),
            None => is_linked(current.video_webinar_id.as_deref()),
        };
        let touches_form = input.form_schema.is_some() || input.video_webinar_id.is_some();

        if linked_after && touches_form {
            let mut schema = input
                .form_schema
                .take()
                .unwrap_or_else(|| current.form_schema.clone());
            let added = augment_for_registrant_sync(&mut schema);
            if added > 0 {
                info!(webinar_id = %id, added, "Form schema augmented for registrant sync");
            }
            input.form_schema = Some(schema);
        }
        if let Some(schema) = &input.form_schema {
            schema.validate_definition()?;
        }

        let webinar = self.webinars.update(id, input).await?;
        info!(webinar_id = %id, "Webinar updated");
        Ok(webinar)
    }

    pub async fn delete_webinar(&self, id: Uuid) -> RegistraResult<()> {
        self.webinars.get_by_id(id).await?;
        self.webinars.delete(id).await?;
        info!(webinar_id = %id, "Webinar deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_shape() {
        assert!(is_valid_slug("acme"));
        assert!(is_valid_slug("q3-launch-2026"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Acme"));
        assert!(!is_valid_slug("-acme"));
        assert!(!is_valid_slug("acme-"));
        assert!(!is_valid_slug("ac me"));
        assert!(!is_valid_slug("acme.example"));
    }

    #[test]
    fn ignored_labels_are_reserved_tenant_slugs() {
        let reserved = IgnoredSubdomains::new("events");
        for slug in ["www", "localhost", "events"] {
            let mut errors = ValidationErrors::new();
            check_tenant_slug(&mut errors, slug, &reserved);
            assert!(errors.contains("slug"), "{slug} should be refused");
        }

        let mut errors = ValidationErrors::new();
        check_tenant_slug(&mut errors, "acme", &reserved);
        assert!(errors.is_empty());
    }

    #[test]
    fn linked_means_non_blank_id() {
        assert!(is_linked(Some("8123")));
        assert!(!is_linked(Some("  ")));
        assert!(!is_linked(None));
    }
}
