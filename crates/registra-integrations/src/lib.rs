//! Registra Integrations — outbound HTTP clients.
//!
//! Implements the `registra-core` integration traits:
//! - [`ClayClient`]: lead enrichment webhook
//! - [`MetaConversionsClient`]: server-side conversion events
//! - [`ZoomClient`]: registrant sync, upcoming webinars and attendance
//!
//! Every client reports plain success or failure to its caller and logs
//! the details itself.

pub mod clay;
pub mod config;
pub mod error;
mod http;
pub mod meta;
pub mod zoom;

pub use clay::ClayClient;
pub use config::{IntegrationsConfig, MetaConfig, ZoomConfig};
pub use error::IntegrationError;
pub use http::build_client;
pub use meta::MetaConversionsClient;
pub use zoom::ZoomClient;
