//! Environment-driven configuration.
//!
//! Every setting has a development default. A variable that is set but
//! does not parse is an error rather than a silent fallback.

use std::{env, fmt::Display, str::FromStr};

use registra_db::DbConfig;
use registra_integrations::{IntegrationsConfig, MetaConfig, ZoomConfig};
use tracing::info;

use crate::error::ServerError;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Leftmost host label of the app itself; never a tenant.
    pub app_label: String,
    /// Bearer token for `/admin`. `None` locks the admin API.
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            app_label: "webinars".into(),
            admin_token: None,
        }
    }
}

/// Everything the process needs to start.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub db: DbConfig,
    pub integrations: IntegrationsConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        let server_defaults = ServerConfig::default();
        let db_defaults = DbConfig::default();
        let int_defaults = IntegrationsConfig::default();
        let zoom_defaults = ZoomConfig::default();
        let meta_defaults = MetaConfig::default();

        Ok(Self {
            server: ServerConfig {
                port: try_load("REGISTRA_PORT", server_defaults.port)?,
                app_label: try_load("REGISTRA_APP_LABEL", server_defaults.app_label)?,
                admin_token: optional("REGISTRA_ADMIN_TOKEN"),
            },
            db: DbConfig {
                url: try_load("SURREAL_URL", db_defaults.url)?,
                namespace: try_load("SURREAL_NS", db_defaults.namespace)?,
                database: try_load("SURREAL_DB", db_defaults.database)?,
                username: try_load("SURREAL_USER", db_defaults.username)?,
                password: try_load("SURREAL_PASS", db_defaults.password)?,
            },
            integrations: IntegrationsConfig {
                http_timeout_secs: try_load("HTTP_TIMEOUT_SECS", int_defaults.http_timeout_secs)?,
                clay_enabled: try_load("CLAY_ENABLED", int_defaults.clay_enabled)?,
                zoom: ZoomConfig {
                    account_id: optional("ZOOM_ACCOUNT_ID").unwrap_or_default(),
                    client_id: optional("ZOOM_CLIENT_ID").unwrap_or_default(),
                    client_secret: optional("ZOOM_CLIENT_SECRET").unwrap_or_default(),
                    api_base_url: try_load("ZOOM_API_BASE_URL", zoom_defaults.api_base_url)?,
                    oauth_url: try_load("ZOOM_OAUTH_URL", zoom_defaults.oauth_url)?,
                    token_ttl_secs: try_load("ZOOM_TOKEN_TTL_SECS", zoom_defaults.token_ttl_secs)?,
                },
                meta: MetaConfig {
                    graph_base_url: try_load("META_GRAPH_BASE_URL", meta_defaults.graph_base_url)?,
                    api_version: try_load("META_API_VERSION", meta_defaults.api_version)?,
                    access_token: optional("META_CONVERSIONS_ACCESS_TOKEN"),
                },
            },
        })
    }
}

/// A non-empty variable, if set.
fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn try_load<T>(key: &str, default: T) -> Result<T, ServerError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match optional(key) {
        Some(raw) => raw.parse().map_err(|e| ServerError::Config {
            key: key.to_string(),
            reason: format!("{e}"),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
