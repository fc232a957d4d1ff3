//! Webinar domain model.
//!
//! A webinar owns its registration form (an embedded [`FormSchema`]) and
//! the per-webinar integration settings: the linked video-provider
//! session, tracking pixels and the enrichment webhook.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::form::FormSchema;

/// Ad platform a tracking pixel reports to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingPlatform {
    Facebook,
    Linkedin,
}

/// A tracking pixel configured on a webinar page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingScript {
    pub platform: TrackingPlatform,
    /// Facebook pixel id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_id: Option<String>,
    /// LinkedIn partner id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<String>,
    /// LinkedIn conversion id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_id: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl TrackingScript {
    /// Pixel id of an enabled Facebook script, if this is one.
    pub fn active_facebook_pixel(&self) -> Option<&str> {
        match (self.platform, self.enabled, self.pixel_id.as_deref()) {
            (TrackingPlatform::Facebook, true, Some(id)) if !id.trim().is_empty() => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webinar {
    pub id: Uuid,
    /// The tenant this webinar belongs to.
    pub tenant_id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    /// URL-safe identifier, unique within the tenant.
    pub slug: String,
    /// Identifier of the linked video-provider webinar.
    pub video_webinar_id: Option<String>,
    pub hero_image: Option<String>,
    pub header_logo: Option<String>,
    pub form_schema: FormSchema,
    pub tracking_scripts: Vec<TrackingScript>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    /// Webhook receiving enrichment leads for this webinar.
    pub enrichment_webhook_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new webinar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWebinar {
    /// Overridden by the owning tenant on creation.
    #[serde(default)]
    pub tenant_id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_webinar_id: Option<String>,
    #[serde(default)]
    pub hero_image: Option<String>,
    #[serde(default)]
    pub header_logo: Option<String>,
    #[serde(default)]
    pub form_schema: FormSchema,
    #[serde(default)]
    pub tracking_scripts: Vec<TrackingScript>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub enrichment_webhook_url: Option<String>,
}

/// Fields that can be updated on an existing webinar.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateWebinar {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub video_webinar_id: Option<String>,
    pub hero_image: Option<String>,
    pub header_logo: Option<String>,
    pub form_schema: Option<FormSchema>,
    pub tracking_scripts: Option<Vec<TrackingScript>>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub enrichment_webhook_url: Option<String>,
}
