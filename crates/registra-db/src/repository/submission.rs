//! SurrealDB implementation of [`SubmissionRepository`].
//!
//! `sent_to_clay_at` is the dispatch watermark. It is only ever set
//! while still unset, so a delivered lead keeps its first timestamp.

use chrono::{DateTime, Utc};
use registra_core::error::RegistraResult;
use registra_core::models::submission::{CreateSubmission, Submission, Utm};
use registra_core::repository::{PaginatedResult, Pagination, SubmissionRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::CountRow;
use crate::error::{DbError, parse_uuid};

const SELECT_WITH_ID: &str = "SELECT meta::id(id) AS record_id, * FROM submission";

#[derive(Debug, SurrealValue)]
struct SubmissionRowWithId {
    record_id: String,
    webinar_id: String,
    data: serde_json::Value,
    utm_source: Option<String>,
    utm_medium: Option<String>,
    utm_campaign: Option<String>,
    utm_term: Option<String>,
    utm_content: Option<String>,
    sent_to_clay_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl SubmissionRowWithId {
    fn try_into_submission(self) -> Result<Submission, DbError> {
        let data = match self.data {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => {
                return Err(DbError::Decode(format!(
                    "submission data is not an object: {other}"
                )));
            }
        };
        Ok(Submission {
            id: parse_uuid(&self.record_id, "submission")?,
            webinar_id: parse_uuid(&self.webinar_id, "webinar")?,
            data,
            utm: Utm {
                utm_source: self.utm_source,
                utm_medium: self.utm_medium,
                utm_campaign: self.utm_campaign,
                utm_term: self.utm_term,
                utm_content: self.utm_content,
            },
            sent_to_clay_at: self.sent_to_clay_at,
            created_at: self.created_at,
        })
    }
}

fn decode_rows(rows: Vec<SubmissionRowWithId>) -> Result<Vec<Submission>, DbError> {
    rows.into_iter()
        .map(SubmissionRowWithId::try_into_submission)
        .collect()
}

/// SurrealDB implementation of the Submission repository.
#[derive(Clone)]
pub struct SurrealSubmissionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSubmissionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch_one(&self, id: &str) -> Result<Option<Submission>, DbError> {
        let mut result = self
            .db
            .query(format!(
                "{SELECT_WITH_ID} WHERE id = type::record('submission', $id)"
            ))
            .bind(("id", id.to_string()))
            .await?;
        let rows: Vec<SubmissionRowWithId> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(SubmissionRowWithId::try_into_submission)
            .transpose()
    }
}

impl<C: Connection> SubmissionRepository for SurrealSubmissionRepository<C> {
    async fn create(&self, input: CreateSubmission) -> RegistraResult<Submission> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let Utm {
            utm_source,
            utm_medium,
            utm_campaign,
            utm_term,
            utm_content,
        } = input.utm;

        self.db
            .query(
                "CREATE type::record('submission', $id) SET \
                 webinar_id = $webinar_id, data = $data, \
                 utm_source = $utm_source, utm_medium = $utm_medium, \
                 utm_campaign = $utm_campaign, utm_term = $utm_term, \
                 utm_content = $utm_content",
            )
            .bind(("id", id_str.clone()))
            .bind(("webinar_id", input.webinar_id.to_string()))
            .bind(("data", serde_json::Value::Object(input.data)))
            .bind(("utm_source", utm_source))
            .bind(("utm_medium", utm_medium))
            .bind(("utm_campaign", utm_campaign))
            .bind(("utm_term", utm_term))
            .bind(("utm_content", utm_content))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(self.fetch_one(&id_str).await?.ok_or(DbError::NotFound {
            entity: "submission".into(),
            id: id_str,
        })?)
    }

    async fn get_by_id(&self, id: Uuid) -> RegistraResult<Submission> {
        let id_str = id.to_string();
        Ok(self.fetch_one(&id_str).await?.ok_or(DbError::NotFound {
            entity: "submission".into(),
            id: id_str,
        })?)
    }

    async fn list_by_webinar(
        &self,
        webinar_id: Uuid,
        pagination: Pagination,
    ) -> RegistraResult<PaginatedResult<Submission>> {
        let webinar_id_str = webinar_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM submission \
                 WHERE webinar_id = $webinar_id GROUP ALL",
            )
            .bind(("webinar_id", webinar_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(format!(
                "{SELECT_WITH_ID} WHERE webinar_id = $webinar_id \
                 ORDER BY created_at DESC LIMIT $limit START $offset"
            ))
            .bind(("webinar_id", webinar_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<SubmissionRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(PaginatedResult {
            items: decode_rows(rows)?,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_all_by_webinar(&self, webinar_id: Uuid) -> RegistraResult<Vec<Submission>> {
        let mut result = self
            .db
            .query(format!(
                "{SELECT_WITH_ID} WHERE webinar_id = $webinar_id \
                 ORDER BY created_at ASC"
            ))
            .bind(("webinar_id", webinar_id.to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<SubmissionRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(decode_rows(rows)?)
    }

    async fn list_pending_dispatch(&self, webinar_id: Uuid) -> RegistraResult<Vec<Submission>> {
        let mut result = self
            .db
            .query(format!(
                "{SELECT_WITH_ID} WHERE webinar_id = $webinar_id \
                 AND sent_to_clay_at = NONE ORDER BY created_at ASC"
            ))
            .bind(("webinar_id", webinar_id.to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<SubmissionRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(decode_rows(rows)?)
    }

    async fn count_pending_dispatch(&self, webinar_id: Uuid) -> RegistraResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM submission \
                 WHERE webinar_id = $webinar_id AND sent_to_clay_at = NONE \
                 GROUP ALL",
            )
            .bind(("webinar_id", webinar_id.to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn mark_dispatched(&self, id: Uuid, at: DateTime<Utc>) -> RegistraResult<()> {
        let id_str = id.to_string();
        if self.fetch_one(&id_str).await?.is_none() {
            return Err(DbError::NotFound {
                entity: "submission".into(),
                id: id_str,
            }
            .into());
        }

        self.db
            .query(
                "UPDATE type::record('submission', $id) \
                 SET sent_to_clay_at = $at WHERE sent_to_clay_at = NONE",
            )
            .bind(("id", id_str))
            .bind(("at", at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }
}
