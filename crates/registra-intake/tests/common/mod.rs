//! Shared fixtures: an in-memory database and integration fakes.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use registra_core::integrations::{
    ConversionEvent, ConversionsApi, EnrichmentPayload, LeadEnrichment, UpcomingWebinar,
    VideoProvider,
};
use registra_core::lead::CanonicalLead;
use registra_core::models::form::{FieldSchema, FieldType, FormSchema};
use registra_core::models::tenant::CreateTenant;
use registra_core::models::webinar::CreateWebinar;
use registra_db::repository::{
    SurrealSubmissionRepository, SurrealTenantRepository, SurrealWebinarRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

pub type Tenants = SurrealTenantRepository<Db>;
pub type Webinars = SurrealWebinarRepository<Db>;
pub type Submissions = SurrealSubmissionRepository<Db>;

pub async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    registra_db::run_migrations(&db).await.unwrap();
    db
}

pub fn repos(db: &Surreal<Db>) -> (Tenants, Webinars, Submissions) {
    (
        SurrealTenantRepository::new(db.clone()),
        SurrealWebinarRepository::new(db.clone()),
        SurrealSubmissionRepository::new(db.clone()),
    )
}

pub fn new_tenant(name: &str, slug: &str) -> CreateTenant {
    CreateTenant {
        name: name.into(),
        slug: slug.into(),
        logo: None,
        social_links: Vec::new(),
    }
}

/// `[email (required), phone (tel, optional)]`.
pub fn email_phone_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldSchema::new(FieldType::Email, "email", "Email", true),
        FieldSchema::new(FieldType::Tel, "phone", "Phone", false),
    ])
}

pub fn new_webinar(slug: &str, schema: FormSchema) -> CreateWebinar {
    CreateWebinar {
        tenant_id: Uuid::nil(),
        title: "Launch".into(),
        slug: slug.into(),
        subtitle: None,
        description: None,
        video_webinar_id: None,
        hero_image: None,
        header_logo: None,
        form_schema: schema,
        tracking_scripts: Vec::new(),
        meta_title: None,
        meta_description: None,
        enrichment_webhook_url: None,
    }
}

pub fn form(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Records every lead and rejects the emails it was told to.
#[derive(Default)]
pub struct FakeEnrichment {
    pub reject: Vec<String>,
    pub sent: Mutex<Vec<(String, EnrichmentPayload)>>,
}

impl LeadEnrichment for FakeEnrichment {
    async fn send_lead(&self, webhook_url: &str, payload: &EnrichmentPayload) -> bool {
        let rejected = payload
            .lead
            .email
            .as_ref()
            .is_some_and(|e| self.reject.contains(e));
        self.sent
            .lock()
            .unwrap()
            .push((webhook_url.to_string(), payload.clone()));
        !rejected
    }
}

#[derive(Default)]
pub struct FakeConversions {
    pub fail: bool,
    pub events: Mutex<Vec<(String, String, ConversionEvent)>>,
}

impl ConversionsApi for FakeConversions {
    async fn send_event(&self, pixel_id: &str, access_token: &str, event: &ConversionEvent) -> bool {
        self.events.lock().unwrap().push((
            pixel_id.to_string(),
            access_token.to_string(),
            event.clone(),
        ));
        !self.fail
    }
}

#[derive(Default)]
pub struct FakeVideo {
    pub attendance: u64,
    pub registered: Mutex<Vec<(String, CanonicalLead)>>,
}

impl VideoProvider for FakeVideo {
    async fn list_upcoming(&self) -> Vec<UpcomingWebinar> {
        vec![UpcomingWebinar {
            id: "8123".into(),
            label: "Launch (2026-11-01T15:00:00Z)".into(),
        }]
    }

    async fn register_registrant(&self, webinar_id: &str, lead: &CanonicalLead) -> bool {
        self.registered
            .lock()
            .unwrap()
            .push((webinar_id.to_string(), lead.clone()));
        true
    }

    async fn attendance_count(&self, _webinar_id: &str) -> u64 {
        self.attendance
    }
}
