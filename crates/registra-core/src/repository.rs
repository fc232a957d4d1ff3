//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Webinars are looked up through
//! their tenant so that one tenant can never reach another's forms.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::RegistraResult;
use crate::models::{
    submission::{CreateSubmission, Submission},
    tenant::{CreateTenant, Tenant, UpdateTenant},
    webinar::{CreateWebinar, UpdateWebinar, Webinar},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = RegistraResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RegistraResult<Tenant>> + Send;
    /// Look up by subdomain key.
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = RegistraResult<Tenant>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = RegistraResult<Tenant>> + Send;
    /// Deletes the tenant together with its webinars and their submissions.
    fn delete(&self, id: Uuid) -> impl Future<Output = RegistraResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = RegistraResult<PaginatedResult<Tenant>>> + Send;
}

pub trait WebinarRepository: Send + Sync {
    fn create(&self, input: CreateWebinar) -> impl Future<Output = RegistraResult<Webinar>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RegistraResult<Webinar>> + Send;
    fn get_by_slug(
        &self,
        tenant_id: Uuid,
        slug: &str,
    ) -> impl Future<Output = RegistraResult<Webinar>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateWebinar,
    ) -> impl Future<Output = RegistraResult<Webinar>> + Send;
    /// Deletes the webinar together with its submissions.
    fn delete(&self, id: Uuid) -> impl Future<Output = RegistraResult<()>> + Send;
    fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = RegistraResult<PaginatedResult<Webinar>>> + Send;
}

pub trait SubmissionRepository: Send + Sync {
    fn create(
        &self,
        input: CreateSubmission,
    ) -> impl Future<Output = RegistraResult<Submission>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RegistraResult<Submission>> + Send;
    /// Newest first.
    fn list_by_webinar(
        &self,
        webinar_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = RegistraResult<PaginatedResult<Submission>>> + Send;
    /// Every submission of a webinar, oldest first (exports, statistics).
    fn list_all_by_webinar(
        &self,
        webinar_id: Uuid,
    ) -> impl Future<Output = RegistraResult<Vec<Submission>>> + Send;
    /// Submissions whose dispatch watermark is unset, oldest first.
    fn list_pending_dispatch(
        &self,
        webinar_id: Uuid,
    ) -> impl Future<Output = RegistraResult<Vec<Submission>>> + Send;
    fn count_pending_dispatch(
        &self,
        webinar_id: Uuid,
    ) -> impl Future<Output = RegistraResult<u64>> + Send;
    /// Set the dispatch watermark. A watermark that is already set is kept.
    fn mark_dispatched(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> impl Future<Output = RegistraResult<()>> + Send;
}
