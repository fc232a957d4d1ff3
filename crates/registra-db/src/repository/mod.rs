//! SurrealDB repository implementations.

mod submission;
mod tenant;
mod webinar;

pub use submission::SurrealSubmissionRepository;
pub use tenant::SurrealTenantRepository;
pub use webinar::SurrealWebinarRepository;

use surrealdb_types::SurrealValue;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub(crate) total: u64,
}
