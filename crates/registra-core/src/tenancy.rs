//! Host-based tenant resolution.
//!
//! Public pages live on `{tenant}.{app domain}`. Some customer sites reach
//! us through static proxy rewrites that lose the original host, so the
//! effective host is taken from, in order: the `X-Original-Host` header,
//! the `original_host` query parameter, then the literal `Host`.

use tracing::{info, warn};

use crate::error::RegistraError;
use crate::models::tenant::Tenant;
use crate::repository::TenantRepository;

/// Header carrying the host a proxy received the request on.
pub const ORIGINAL_HOST_HEADER: &str = "x-original-host";
/// Query-parameter fallback for proxies that cannot set headers.
pub const ORIGINAL_HOST_QUERY: &str = "original_host";

/// Leftmost labels that never name a tenant.
#[derive(Debug, Clone)]
pub struct IgnoredSubdomains(Vec<String>);

impl IgnoredSubdomains {
    /// The app's own label plus `www` and `localhost`.
    pub fn new(app_label: &str) -> Self {
        Self(vec![
            app_label.to_ascii_lowercase(),
            "www".into(),
            "localhost".into(),
        ])
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }
}

impl Default for IgnoredSubdomains {
    fn default() -> Self {
        Self::new("webinars")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Pick the host to resolve from, by precedence.
pub fn effective_host<'a>(
    header: Option<&'a str>,
    query: Option<&'a str>,
    literal: Option<&'a str>,
) -> Option<&'a str> {
    non_blank(header)
        .or_else(|| non_blank(query))
        .or_else(|| non_blank(literal))
}

/// The leftmost host label, unless it is ignored.
///
/// Ports are stripped and the label is lowercased. IP literals never
/// name a tenant.
pub fn candidate_subdomain(host: &str, ignored: &IgnoredSubdomains) -> Option<String> {
    let host = host.trim().to_ascii_lowercase();
    let host = host.split(':').next().unwrap_or_default();
    if host.is_empty() || host.parse::<std::net::Ipv4Addr>().is_ok() {
        return None;
    }
    let label = host.split('.').next()?.to_string();
    if label.is_empty() || ignored.contains(&label) {
        return None;
    }
    Some(label)
}

/// Resolve the tenant for a host. Unknown hosts and lookup failures yield
/// `None`; a handler that needs a tenant answers 404 on its own.
pub async fn resolve_tenant<R: TenantRepository>(
    repo: &R,
    host: &str,
    ignored: &IgnoredSubdomains,
) -> Option<Tenant> {
    let subdomain = candidate_subdomain(host, ignored)?;
    resolve_slug(repo, &subdomain).await
}

/// Resolve an explicit tenant slug (path-based routing).
pub async fn resolve_slug<R: TenantRepository>(repo: &R, slug: &str) -> Option<Tenant> {
    match repo.get_by_slug(slug).await {
        Ok(tenant) => {
            info!(
                subdomain = %slug,
                tenant_id = %tenant.id,
                tenant_name = %tenant.name,
                "Tenant resolved"
            );
            Some(tenant)
        }
        Err(RegistraError::NotFound { .. }) => None,
        Err(e) => {
            warn!(subdomain = %slug, error = %e, "Tenant lookup failed");
            None
        }
    }
}
