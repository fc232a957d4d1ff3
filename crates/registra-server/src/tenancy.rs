//! Tenant context at the HTTP boundary.
//!
//! The middleware resolves the tenant once per request and stores it in
//! the request extensions; handlers take it through [`CurrentTenant`].

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::{HeaderMap, header::HOST, request::Parts},
    middleware::Next,
    response::Response,
};
use registra_core::error::RegistraError;
use registra_core::models::tenant::Tenant;
use registra_core::tenancy::{
    ORIGINAL_HOST_HEADER, ORIGINAL_HOST_QUERY, effective_host, resolve_tenant,
};

use crate::error::ApiError;
use crate::state::AppState;

/// The tenant resolved for this request.
#[derive(Debug, Clone)]
pub struct CurrentTenant(pub Tenant);

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Resolve the tenant from the effective host. Leaves the request
/// untouched when nothing matches.
pub async fn resolve_host_tenant(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let query: HashMap<String, String> = Query::try_from_uri(request.uri())
        .map(|Query(q)| q)
        .unwrap_or_default();
    let literal = header(request.headers(), HOST.as_str())
        .or_else(|| request.uri().host())
        .map(str::to_string);
    let host = effective_host(
        header(request.headers(), ORIGINAL_HOST_HEADER),
        query.get(ORIGINAL_HOST_QUERY).map(String::as_str),
        literal.as_deref(),
    )
    .map(str::to_string);

    if let Some(host) = host {
        if let Some(tenant) = resolve_tenant(&state.tenants, &host, &state.ignored).await {
            request.extensions_mut().insert(CurrentTenant(tenant));
        }
    }

    next.run(request).await
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentTenant {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentTenant>()
            .cloned()
            .ok_or(ApiError(RegistraError::TenantContext))
    }
}
