//! Tenant domain model.
//!
//! A tenant is a customer organization reachable through its own
//! subdomain. Every webinar (and through it every submission) is scoped
//! to exactly one tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer organization with its own subdomain and webinars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Human-readable name, forwarded to integrations as `client_name`.
    pub name: String,
    /// Subdomain key (e.g., `acme` for `acme.example.com`).
    pub slug: String,
    /// Optional logo asset reference.
    pub logo: Option<String>,
    /// Ordered social-media links shown on the public page.
    pub social_links: Vec<SocialLink>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A social-media link on a tenant's public page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Network identifier (e.g., `linkedin`, `instagram`).
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

/// Fields that can be updated on an existing tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub logo: Option<String>,
    pub social_links: Option<Vec<SocialLink>>,
}
