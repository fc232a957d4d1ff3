//! Shared application state.

use std::sync::Arc;

use registra_core::tenancy::IgnoredSubdomains;
use registra_db::repository::{
    SurrealSubmissionRepository, SurrealTenantRepository, SurrealWebinarRepository,
};
use registra_intake::{
    Catalog, DispatchService, FollowUp, FollowUpConfig, StatsService, SubmissionService,
};
use registra_integrations::{ClayClient, MetaConversionsClient, ZoomClient, build_client};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::config::AppConfig;
use crate::error::ServerError;

pub type Tenants = SurrealTenantRepository<Any>;
pub type Webinars = SurrealWebinarRepository<Any>;
pub type Submissions = SurrealSubmissionRepository<Any>;

/// Cheap to clone: repositories share one database handle and the
/// clients share one connection pool.
#[derive(Clone)]
pub struct AppState {
    pub admin_token: Option<Arc<str>>,
    pub ignored: Arc<IgnoredSubdomains>,
    pub tenants: Tenants,
    pub webinars: Webinars,
    pub submissions: Submissions,
    pub clay: ClayClient,
    pub zoom: ZoomClient,
    pub follow_up: Arc<FollowUp<ZoomClient, MetaConversionsClient>>,
}

impl AppState {
    pub fn new(db: Surreal<Any>, config: &AppConfig) -> Result<Self, ServerError> {
        let http = build_client(&config.integrations)?;
        let zoom = ZoomClient::new(http.clone(), config.integrations.zoom.clone());
        let meta = MetaConversionsClient::new(http.clone(), &config.integrations.meta);
        let follow_up = FollowUp::new(
            zoom.clone(),
            meta,
            FollowUpConfig {
                conversions_access_token: config.integrations.meta.access_token.clone(),
            },
        );

        Ok(Self {
            admin_token: config.server.admin_token.as_deref().map(Arc::from),
            ignored: Arc::new(IgnoredSubdomains::new(&config.server.app_label)),
            tenants: SurrealTenantRepository::new(db.clone()),
            webinars: SurrealWebinarRepository::new(db.clone()),
            submissions: SurrealSubmissionRepository::new(db),
            clay: ClayClient::new(http, config.integrations.clay_enabled),
            zoom,
            follow_up: Arc::new(follow_up),
        })
    }

    pub fn catalog(&self) -> Catalog<Tenants, Webinars> {
        Catalog::new(self.tenants.clone(), self.webinars.clone())
            .with_reserved(IgnoredSubdomains::clone(&self.ignored))
    }

    pub fn ingest(&self) -> SubmissionService<Webinars, Submissions> {
        SubmissionService::new(self.webinars.clone(), self.submissions.clone())
    }

    pub fn dispatch(&self) -> DispatchService<Tenants, Webinars, Submissions, ClayClient> {
        DispatchService::new(
            self.tenants.clone(),
            self.webinars.clone(),
            self.submissions.clone(),
            self.clay.clone(),
        )
    }

    pub fn stats(&self) -> StatsService<Webinars, Submissions, ZoomClient> {
        StatsService::new(
            self.webinars.clone(),
            self.submissions.clone(),
            self.zoom.clone(),
        )
    }
}
