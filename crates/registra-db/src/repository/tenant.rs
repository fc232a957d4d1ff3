//! SurrealDB implementation of [`TenantRepository`].

use chrono::{DateTime, Utc};
use registra_core::error::RegistraResult;
use registra_core::models::tenant::{CreateTenant, SocialLink, Tenant, UpdateTenant};
use registra_core::repository::{PaginatedResult, Pagination, TenantRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::CountRow;
use crate::error::{DbError, parse_uuid, write_error};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TenantRow {
    name: String,
    slug: String,
    logo: Option<String>,
    social_links: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self, id: Uuid) -> Result<Tenant, DbError> {
        let social_links: Vec<SocialLink> = serde_json::from_str(&self.social_links)?;
        Ok(Tenant {
            id,
            name: self.name,
            slug: self.slug,
            logo: self.logo,
            social_links,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TenantRowWithId {
    record_id: String,
    name: String,
    slug: String,
    logo: Option<String>,
    social_links: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRowWithId {
    fn try_into_tenant(self) -> Result<Tenant, DbError> {
        let id = parse_uuid(&self.record_id, "tenant")?;
        TenantRow {
            name: self.name,
            slug: self.slug,
            logo: self.logo,
            social_links: self.social_links,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_tenant(id)
    }
}

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, DbError> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM tenant WHERE slug = $slug")
            .bind(("slug", slug.to_string()))
            .await?;

        let rows: Vec<TenantRowWithId> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(TenantRowWithId::try_into_tenant)
            .transpose()
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> RegistraResult<Tenant> {
        if self.find_by_slug(&input.slug).await?.is_some() {
            return Err(DbError::Conflict {
                entity: format!("tenant slug '{}'", input.slug),
            }
            .into());
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let social_links = serde_json::to_string(&input.social_links).map_err(DbError::from)?;

        let result = self
            .db
            .query(
                "CREATE type::record('tenant', $id) SET \
                 name = $name, slug = $slug, logo = $logo, \
                 social_links = $social_links",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("logo", input.logo))
            .bind(("social_links", social_links))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| write_error("tenant slug", e))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> RegistraResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn get_by_slug(&self, slug: &str) -> RegistraResult<Tenant> {
        self.find_by_slug(slug).await?.ok_or_else(|| {
            DbError::NotFound {
                entity: "tenant".into(),
                id: format!("slug={slug}"),
            }
            .into()
        })
    }

    async fn update(&self, id: Uuid, input: UpdateTenant) -> RegistraResult<Tenant> {
        let id_str = id.to_string();

        if let Some(slug) = &input.slug {
            if let Some(existing) = self.find_by_slug(slug).await? {
                if existing.id != id {
                    return Err(DbError::Conflict {
                        entity: format!("tenant slug '{slug}'"),
                    }
                    .into());
                }
            }
        }

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.slug.is_some() {
            sets.push("slug = $slug");
        }
        if input.logo.is_some() {
            sets.push("logo = $logo");
        }
        if input.social_links.is_some() {
            sets.push("social_links = $social_links");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('tenant', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(slug) = input.slug {
            builder = builder.bind(("slug", slug));
        }
        if let Some(logo) = input.logo {
            builder = builder.bind(("logo", logo));
        }
        if let Some(links) = input.social_links {
            let encoded = serde_json::to_string(&links).map_err(DbError::from)?;
            builder = builder.bind(("social_links", encoded));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| write_error("tenant slug", e))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn delete(&self, id: Uuid) -> RegistraResult<()> {
        self.db
            .query(
                "LET $webinars = (SELECT VALUE meta::id(id) FROM webinar \
                 WHERE tenant_id = $id); \
                 DELETE submission WHERE webinar_id IN $webinars; \
                 DELETE webinar WHERE tenant_id = $id; \
                 DELETE type::record('tenant', $id);",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> RegistraResult<PaginatedResult<Tenant>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM tenant GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tenant \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(TenantRowWithId::try_into_tenant)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
