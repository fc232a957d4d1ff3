//! SurrealDB implementation of [`WebinarRepository`].

use chrono::{DateTime, Utc};
use registra_core::error::RegistraResult;
use registra_core::models::form::FormSchema;
use registra_core::models::webinar::{CreateWebinar, TrackingScript, UpdateWebinar, Webinar};
use registra_core::repository::{PaginatedResult, Pagination, WebinarRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::CountRow;
use crate::error::{DbError, parse_uuid, write_error};

const SELECT_WITH_ID: &str = "SELECT meta::id(id) AS record_id, * FROM webinar";

#[derive(Debug, SurrealValue)]
struct WebinarRowWithId {
    record_id: String,
    tenant_id: String,
    title: String,
    subtitle: Option<String>,
    description: Option<String>,
    slug: String,
    video_webinar_id: Option<String>,
    hero_image: Option<String>,
    header_logo: Option<String>,
    form_schema: String,
    tracking_scripts: String,
    meta_title: Option<String>,
    meta_description: Option<String>,
    enrichment_webhook_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WebinarRowWithId {
    fn try_into_webinar(self) -> Result<Webinar, DbError> {
        let form_schema: FormSchema = serde_json::from_str(&self.form_schema)?;
        let tracking_scripts: Vec<TrackingScript> = serde_json::from_str(&self.tracking_scripts)?;
        Ok(Webinar {
            id: parse_uuid(&self.record_id, "webinar")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            slug: self.slug,
            video_webinar_id: self.video_webinar_id,
            hero_image: self.hero_image,
            header_logo: self.header_logo,
            form_schema,
            tracking_scripts,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            enrichment_webhook_url: self.enrichment_webhook_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Optional text columns an update may set or clear.
const OPTIONAL_TEXT: [&str; 8] = [
    "subtitle",
    "description",
    "video_webinar_id",
    "hero_image",
    "header_logo",
    "meta_title",
    "meta_description",
    "enrichment_webhook_url",
];

/// SurrealDB implementation of the Webinar repository.
#[derive(Clone)]
pub struct SurrealWebinarRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealWebinarRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch_one(&self, id: &str) -> Result<Option<Webinar>, DbError> {
        let mut result = self
            .db
            .query(format!("{SELECT_WITH_ID} WHERE id = type::record('webinar', $id)"))
            .bind(("id", id.to_string()))
            .await?;
        let rows: Vec<WebinarRowWithId> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(WebinarRowWithId::try_into_webinar)
            .transpose()
    }

    async fn find_by_slug(&self, tenant_id: Uuid, slug: &str) -> Result<Option<Webinar>, DbError> {
        let mut result = self
            .db
            .query(format!(
                "{SELECT_WITH_ID} WHERE tenant_id = $tenant_id AND slug = $slug"
            ))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("slug", slug.to_string()))
            .await?;
        let rows: Vec<WebinarRowWithId> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(WebinarRowWithId::try_into_webinar)
            .transpose()
    }

    async fn ensure_slug_free(
        &self,
        tenant_id: Uuid,
        slug: &str,
        except: Option<Uuid>,
    ) -> Result<(), DbError> {
        match self.find_by_slug(tenant_id, slug).await? {
            Some(existing) if Some(existing.id) != except => Err(DbError::Conflict {
                entity: format!("webinar slug '{slug}'"),
            }),
            _ => Ok(()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl<C: Connection> WebinarRepository for SurrealWebinarRepository<C> {
    async fn create(&self, input: CreateWebinar) -> RegistraResult<Webinar> {
        self.ensure_slug_free(input.tenant_id, &input.slug, None)
            .await?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let form_schema = serde_json::to_string(&input.form_schema).map_err(DbError::from)?;
        let tracking_scripts =
            serde_json::to_string(&input.tracking_scripts).map_err(DbError::from)?;

        self.db
            .query(
                "CREATE type::record('webinar', $id) SET \
                 tenant_id = $tenant_id, title = $title, \
                 subtitle = $subtitle, description = $description, \
                 slug = $slug, video_webinar_id = $video_webinar_id, \
                 hero_image = $hero_image, header_logo = $header_logo, \
                 form_schema = $form_schema, \
                 tracking_scripts = $tracking_scripts, \
                 meta_title = $meta_title, \
                 meta_description = $meta_description, \
                 enrichment_webhook_url = $enrichment_webhook_url",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("title", input.title))
            .bind(("subtitle", non_blank(input.subtitle)))
            .bind(("description", non_blank(input.description)))
            .bind(("slug", input.slug))
            .bind(("video_webinar_id", non_blank(input.video_webinar_id)))
            .bind(("hero_image", non_blank(input.hero_image)))
            .bind(("header_logo", non_blank(input.header_logo)))
            .bind(("form_schema", form_schema))
            .bind(("tracking_scripts", tracking_scripts))
            .bind(("meta_title", non_blank(input.meta_title)))
            .bind(("meta_description", non_blank(input.meta_description)))
            .bind((
                "enrichment_webhook_url",
                non_blank(input.enrichment_webhook_url),
            ))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| write_error("webinar slug", e))?;

        Ok(self.fetch_one(&id_str).await?.ok_or(DbError::NotFound {
            entity: "webinar".into(),
            id: id_str,
        })?)
    }

    async fn get_by_id(&self, id: Uuid) -> RegistraResult<Webinar> {
        let id_str = id.to_string();
        Ok(self.fetch_one(&id_str).await?.ok_or(DbError::NotFound {
            entity: "webinar".into(),
            id: id_str,
        })?)
    }

    async fn get_by_slug(&self, tenant_id: Uuid, slug: &str) -> RegistraResult<Webinar> {
        Ok(self
            .find_by_slug(tenant_id, slug)
            .await?
            .ok_or_else(|| DbError::NotFound {
                entity: "webinar".into(),
                id: format!("tenant={tenant_id},slug={slug}"),
            })?)
    }

    /// `Some("")` clears an optional text column.
    async fn update(&self, id: Uuid, input: UpdateWebinar) -> RegistraResult<Webinar> {
        let id_str = id.to_string();
        let current = self.get_by_id(id).await?;
        if let Some(slug) = &input.slug {
            self.ensure_slug_free(current.tenant_id, slug, Some(id))
                .await?;
        }

        let optional = [
            input.subtitle,
            input.description,
            input.video_webinar_id,
            input.hero_image,
            input.header_logo,
            input.meta_title,
            input.meta_description,
            input.enrichment_webhook_url,
        ];

        let mut sets: Vec<String> = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title".into());
        }
        if input.slug.is_some() {
            sets.push("slug = $slug".into());
        }
        if input.form_schema.is_some() {
            sets.push("form_schema = $form_schema".into());
        }
        if input.tracking_scripts.is_some() {
            sets.push("tracking_scripts = $tracking_scripts".into());
        }
        for (column, value) in OPTIONAL_TEXT.iter().zip(&optional) {
            match value {
                Some(v) if v.trim().is_empty() => sets.push(format!("{column} = NONE")),
                Some(_) => sets.push(format!("{column} = ${column}")),
                None => {}
            }
        }
        sets.push("updated_at = time::now()".into());

        let query = format!("UPDATE type::record('webinar', $id) SET {}", sets.join(", "));
        let mut builder = self.db.query(query).bind(("id", id_str.clone()));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(slug) = input.slug {
            builder = builder.bind(("slug", slug));
        }
        if let Some(schema) = input.form_schema {
            let encoded = serde_json::to_string(&schema).map_err(DbError::from)?;
            builder = builder.bind(("form_schema", encoded));
        }
        if let Some(scripts) = input.tracking_scripts {
            let encoded = serde_json::to_string(&scripts).map_err(DbError::from)?;
            builder = builder.bind(("tracking_scripts", encoded));
        }
        for (column, value) in OPTIONAL_TEXT.iter().zip(optional) {
            if let Some(v) = non_blank(value) {
                builder = builder.bind((*column, v));
            }
        }

        builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| write_error("webinar slug", e))?;

        Ok(self.fetch_one(&id_str).await?.ok_or(DbError::NotFound {
            entity: "webinar".into(),
            id: id_str,
        })?)
    }

    async fn delete(&self, id: Uuid) -> RegistraResult<()> {
        self.db
            .query(
                "DELETE submission WHERE webinar_id = $id; \
                 DELETE type::record('webinar', $id);",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> RegistraResult<PaginatedResult<Webinar>> {
        let tenant_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM webinar WHERE tenant_id = $tenant_id GROUP ALL")
            .bind(("tenant_id", tenant_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(format!(
                "{SELECT_WITH_ID} WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC LIMIT $limit START $offset"
            ))
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WebinarRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(WebinarRowWithId::try_into_webinar)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
