//! Integration configuration.

/// Settings shared by every outbound client.
#[derive(Debug, Clone)]
pub struct IntegrationsConfig {
    /// Per-call timeout in seconds (default: 10).
    pub http_timeout_secs: u64,
    /// When false, enrichment sends are skipped and reported as failures.
    pub clay_enabled: bool,
    pub zoom: ZoomConfig,
    pub meta: MetaConfig,
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: 10,
            clay_enabled: true,
            zoom: ZoomConfig::default(),
            meta: MetaConfig::default(),
        }
    }
}

/// Server-to-server OAuth app credentials for the video provider.
#[derive(Debug, Clone)]
pub struct ZoomConfig {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    /// REST base URL (default: `https://api.zoom.us/v2`).
    pub api_base_url: String,
    /// Token endpoint (default: `https://zoom.us/oauth/token`).
    pub oauth_url: String,
    /// How long a fetched access token is reused, in seconds
    /// (default: 3480 = 58 minutes; tokens live one hour).
    pub token_ttl_secs: u64,
}

impl ZoomConfig {
    pub fn is_configured(&self) -> bool {
        !self.account_id.is_empty() && !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            api_base_url: "https://api.zoom.us/v2".into(),
            oauth_url: "https://zoom.us/oauth/token".into(),
            token_ttl_secs: 58 * 60,
        }
    }
}

/// Conversions API settings.
#[derive(Debug, Clone)]
pub struct MetaConfig {
    /// Graph API base URL (default: `https://graph.facebook.com`).
    pub graph_base_url: String,
    /// Graph API version path segment (default: `v18.0`).
    pub api_version: String,
    /// Access token. `None` disables conversion events.
    pub access_token: Option<String>,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            graph_base_url: "https://graph.facebook.com".into(),
            api_version: "v18.0".into(),
            access_token: None,
        }
    }
}
