//! Admin API: tenants, webinars, submissions and delivery.

use axum::{
    Json,
    extract::{Path, Query, Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use registra_core::error::RegistraError;
use registra_core::integrations::{UpcomingWebinar, VideoProvider};
use registra_core::models::submission::Submission;
use registra_core::models::tenant::{CreateTenant, Tenant};
use registra_core::models::webinar::{CreateWebinar, UpdateWebinar, Webinar};
use registra_core::repository::{PaginatedResult, Pagination, SubmissionRepository};
use registra_core::schema::{Column, table_columns};
use registra_intake::{DispatchReport, StatsWindow, WebinarStats};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::export::submissions_csv;
use crate::state::AppState;

const MAX_PAGE_SIZE: u64 = 200;

/// Reject requests without the configured bearer token.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = match (state.admin_token.as_deref(), bearer_token(&request)) {
        (Some(expected), Some(presented)) => token_matches(expected, presented),
        _ => false,
    };
    if authorized {
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Admin request rejected");
    let mut response = (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthenticated." })),
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}

/// Compares SHA-256 digests with a XOR fold, so the time taken does not
/// depend on how much of the token matched.
fn token_matches(expected: &str, presented: &str) -> bool {
    let expected = Sha256::digest(expected.as_bytes());
    let presented = Sha256::digest(presented.as_bytes());
    expected
        .iter()
        .zip(presented.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    offset: Option<u64>,
    #[serde(default)]
    limit: Option<u64>,
}

impl From<PageParams> for Pagination {
    fn from(params: PageParams) -> Self {
        let defaults = Pagination::default();
        Pagination {
            offset: params.offset.unwrap_or(defaults.offset),
            limit: params.limit.unwrap_or(defaults.limit).clamp(1, MAX_PAGE_SIZE),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    offset: u64,
    limit: u64,
}

impl<T> From<PaginatedResult<T>> for Page<T> {
    fn from(result: PaginatedResult<T>) -> Self {
        Self {
            items: result.items,
            total: result.total,
            offset: result.offset,
            limit: result.limit,
        }
    }
}

// -----------------------------------------------------------------------
// Tenants
// -----------------------------------------------------------------------

pub async fn create_tenant(
    State(state): State<AppState>,
    Json(input): Json<CreateTenant>,
) -> Result<(StatusCode, Json<Tenant>), ApiError> {
    let tenant = state.catalog().create_tenant(input).await?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

pub async fn list_tenants(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Tenant>>, ApiError> {
    let page = state.catalog().list_tenants(params.into()).await?;
    Ok(Json(page.into()))
}

pub async fn get_tenant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tenant>, ApiError> {
    Ok(Json(state.catalog().get_tenant(id).await?))
}

pub async fn delete_tenant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.catalog().delete_tenant(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// -----------------------------------------------------------------------
// Webinars
// -----------------------------------------------------------------------

pub async fn create_webinar(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(input): Json<CreateWebinar>,
) -> Result<(StatusCode, Json<Webinar>), ApiError> {
    let webinar = state.catalog().create_webinar(tenant_id, input).await?;
    Ok((StatusCode::CREATED, Json(webinar)))
}

pub async fn list_webinars(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Webinar>>, ApiError> {
    let page = state
        .catalog()
        .list_webinars(tenant_id, params.into())
        .await?;
    Ok(Json(page.into()))
}

pub async fn get_webinar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Webinar>, ApiError> {
    Ok(Json(state.catalog().get_webinar(id).await?))
}

pub async fn update_webinar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateWebinar>,
) -> Result<Json<Webinar>, ApiError> {
    Ok(Json(state.catalog().update_webinar(id, input).await?))
}

pub async fn delete_webinar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.catalog().delete_webinar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// -----------------------------------------------------------------------
// Submissions
// -----------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SubmissionTable {
    columns: Vec<Column>,
    #[serde(flatten)]
    page: Page<Submission>,
}

pub async fn list_submissions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<SubmissionTable>, ApiError> {
    let webinar = state.catalog().get_webinar(id).await?;
    let page = state
        .submissions
        .list_by_webinar(webinar.id, params.into())
        .await?;
    Ok(Json(SubmissionTable {
        columns: table_columns([&webinar.form_schema]),
        page: page.into(),
    }))
}

pub async fn export_submissions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let webinar = state.catalog().get_webinar(id).await?;
    let submissions = state.submissions.list_all_by_webinar(webinar.id).await?;
    let body = submissions_csv(&webinar, &submissions)?;

    let disposition = format!("attachment; filename=\"{}-submissions.csv\"", webinar.slug);
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| RegistraError::Internal(e.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// `?from=&to=` (RFC 3339) bound the counters by creation time.
pub async fn webinar_stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(window): Query<StatsWindow>,
) -> Result<Json<WebinarStats>, ApiError> {
    Ok(Json(state.stats().for_webinar(id, window).await?))
}

// -----------------------------------------------------------------------
// Delivery
// -----------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PendingCount {
    pending: u64,
}

pub async fn pending_dispatch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PendingCount>, ApiError> {
    let pending = state.dispatch().pending_count(id).await?;
    Ok(Json(PendingCount { pending }))
}

pub async fn run_dispatch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DispatchReport>, ApiError> {
    Ok(Json(state.dispatch().dispatch_pending(id).await?))
}

pub async fn upcoming_video_webinars(State(state): State<AppState>) -> Json<Vec<UpcomingWebinar>> {
    Json(state.zoom.list_upcoming().await)
}
