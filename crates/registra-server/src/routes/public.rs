//! Public registration pages.
//!
//! The same two handlers serve the host-routed paths (`/webinars/{slug}`,
//! tenant from the middleware) and the path-routed fallback
//! (`/client/{tenant}/webinars/{slug}`).

use std::collections::BTreeMap;

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::{HeaderMap, Uri, header},
    response::{IntoResponse, Redirect, Response},
};
use registra_core::error::RegistraError;
use registra_core::models::form::FieldSchema;
use registra_core::models::submission::UTM_KEYS;
use registra_core::models::tenant::{SocialLink, Tenant};
use registra_core::models::webinar::{TrackingScript, Webinar};
use registra_core::repository::WebinarRepository;
use registra_core::schema::RenderHint;
use registra_core::tenancy::resolve_slug;
use registra_intake::RequestContext;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use crate::tenancy::CurrentTenant;

/// Query flag set on the redirect after a successful registration.
pub const REGISTERED_FLAG: &str = "registered";

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    registered: Option<String>,
}

#[derive(Debug, Serialize)]
struct TenantView<'a> {
    name: &'a str,
    slug: &'a str,
    logo: Option<&'a str>,
    social_links: &'a [SocialLink],
}

#[derive(Debug, Serialize)]
struct WebinarView<'a> {
    title: &'a str,
    subtitle: Option<&'a str>,
    description: Option<&'a str>,
    slug: &'a str,
    hero_image: Option<&'a str>,
    header_logo: Option<&'a str>,
    meta_title: &'a str,
    meta_description: Option<&'a str>,
    tracking_scripts: Vec<&'a TrackingScript>,
}

#[derive(Debug, Serialize)]
struct FieldView<'a> {
    #[serde(flatten)]
    field: &'a FieldSchema,
    #[serde(flatten)]
    render: RenderHint,
}

#[derive(Debug, Serialize)]
struct PageView<'a> {
    tenant: TenantView<'a>,
    webinar: WebinarView<'a>,
    fields: Vec<FieldView<'a>>,
    /// True right after a successful registration.
    registered: bool,
}

fn page_view<'a>(tenant: &'a Tenant, webinar: &'a Webinar, registered: bool) -> PageView<'a> {
    PageView {
        tenant: TenantView {
            name: &tenant.name,
            slug: &tenant.slug,
            logo: tenant.logo.as_deref(),
            social_links: &tenant.social_links,
        },
        webinar: WebinarView {
            title: &webinar.title,
            subtitle: webinar.subtitle.as_deref(),
            description: webinar.description.as_deref(),
            slug: &webinar.slug,
            hero_image: webinar.hero_image.as_deref(),
            header_logo: webinar.header_logo.as_deref().or(tenant.logo.as_deref()),
            meta_title: webinar.meta_title.as_deref().unwrap_or(&webinar.title),
            meta_description: webinar.meta_description.as_deref(),
            tracking_scripts: webinar.tracking_scripts.iter().filter(|s| s.enabled).collect(),
        },
        fields: webinar
            .form_schema
            .iter()
            .map(|field| FieldView {
                field,
                render: field.field_type.render_hint(),
            })
            .collect(),
        registered,
    }
}

async fn path_tenant(state: &AppState, tenant_slug: &str) -> Result<Tenant, ApiError> {
    resolve_slug(&state.tenants, tenant_slug)
        .await
        .ok_or_else(|| {
            ApiError(RegistraError::NotFound {
                entity: "tenant".into(),
                id: format!("slug={tenant_slug}"),
            })
        })
}

async fn show(
    state: &AppState,
    tenant: &Tenant,
    slug: &str,
    query: &PageQuery,
) -> Result<Response, ApiError> {
    let webinar = state.webinars.get_by_slug(tenant.id, slug).await?;
    let registered = query.registered.as_deref() == Some("1");
    Ok(Json(page_view(tenant, &webinar, registered)).into_response())
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn request_context(headers: &HeaderMap, uri: &Uri) -> RequestContext {
    let ip_address = header_value(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .or_else(|| header_value(headers, "x-real-ip"));
    let source_url = header_value(headers, header::REFERER.as_str()).or_else(|| {
        header_value(headers, header::HOST.as_str()).map(|host| format!("https://{host}{}", uri.path()))
    });
    RequestContext {
        ip_address,
        user_agent: header_value(headers, header::USER_AGENT.as_str()),
        source_url,
    }
}

/// Fill UTM keys the form body left blank from the request query, so a
/// form posting to `...?utm_source=x` keeps its attribution.
fn merge_query_utm(input: &mut BTreeMap<String, String>, uri: &Uri) {
    let query: BTreeMap<String, String> = Query::try_from_uri(uri)
        .map(|Query(q)| q)
        .unwrap_or_default();
    for key in UTM_KEYS {
        let blank = input.get(key).is_none_or(|v| v.trim().is_empty());
        if let (true, Some(value)) = (blank, query.get(key)) {
            input.insert(key.to_string(), value.clone());
        }
    }
}

/// The form path with the incoming query kept (`original_host` must
/// survive the redirect) and the success flag appended.
fn registered_location(uri: &Uri) -> String {
    let flag = format!("{REGISTERED_FLAG}=1");
    let mut pairs: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && pair.split('=').next() != Some(REGISTERED_FLAG))
        .collect();
    pairs.push(&flag);
    format!("{}?{}", uri.path(), pairs.join("&"))
}

async fn register(
    state: &AppState,
    tenant: &Tenant,
    slug: &str,
    headers: &HeaderMap,
    uri: &Uri,
    mut input: BTreeMap<String, String>,
) -> Result<Response, ApiError> {
    merge_query_utm(&mut input, uri);
    let accepted = state.ingest().submit(tenant, slug, &input).await?;

    let follow_up = state.follow_up.clone();
    let context = request_context(headers, uri);
    tokio::spawn(async move {
        follow_up
            .run(&accepted.webinar, &accepted.submission, &context)
            .await;
    });

    debug!(tenant_id = %tenant.id, slug, "Registration accepted");
    Ok(Redirect::to(&registered_location(uri)).into_response())
}

// -----------------------------------------------------------------------
// Host-routed
// -----------------------------------------------------------------------

pub async fn show_webinar(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    show(&state, &tenant, &slug, &query).await
}

pub async fn submit_registration(
    State(state): State<AppState>,
    CurrentTenant(tenant): CurrentTenant,
    Path(slug): Path<String>,
    headers: HeaderMap,
    uri: Uri,
    Form(input): Form<BTreeMap<String, String>>,
) -> Result<Response, ApiError> {
    register(&state, &tenant, &slug, &headers, &uri, input).await
}

// -----------------------------------------------------------------------
// Path-routed fallback
// -----------------------------------------------------------------------

pub async fn show_client_webinar(
    State(state): State<AppState>,
    Path((tenant_slug, slug)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let tenant = path_tenant(&state, &tenant_slug).await?;
    show(&state, &tenant, &slug, &query).await
}

pub async fn submit_client_registration(
    State(state): State<AppState>,
    Path((tenant_slug, slug)): Path<(String, String)>,
    headers: HeaderMap,
    uri: Uri,
    Form(input): Form<BTreeMap<String, String>>,
) -> Result<Response, ApiError> {
    let tenant = path_tenant(&state, &tenant_slug).await?;
    register(&state, &tenant, &slug, &headers, &uri, input).await
}
