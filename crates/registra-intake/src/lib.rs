//! Registra Intake — everything that happens to a registration.
//!
//! - [`catalog`]: tenant and webinar administration, including form schema
//!   checks and registrant-sync augmentation
//! - [`ingest`]: the submission write path
//! - [`dispatch`]: delivery of pending leads to the enrichment webhook
//! - [`follow_up`]: best-effort provider sync after a registration
//! - [`stats`]: read-time submission statistics
//!
//! Services are generic over the `registra-core` repository and
//! integration traits, so this crate has no dependency on the database
//! or on any HTTP client.

pub mod catalog;
pub mod dispatch;
pub mod follow_up;
pub mod ingest;
pub mod stats;

pub use catalog::Catalog;
pub use dispatch::{DispatchReport, DispatchService};
pub use follow_up::{FollowUp, FollowUpConfig, FollowUpReport, RequestContext};
pub use ingest::{Accepted, SubmissionService};
pub use stats::{StatsService, StatsWindow, SubmissionStats, WebinarStats};
