//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode. UUIDs are stored as
//! strings. Ordered lists (form schema, tracking scripts, social links)
//! are stored as encoded JSON strings so that their element shape is
//! preserved exactly; submission answers are a flexible object.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenants
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD slug ON TABLE tenant TYPE string;
DEFINE FIELD logo ON TABLE tenant TYPE option<string>;
DEFINE FIELD social_links ON TABLE tenant TYPE string DEFAULT '[]';
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_slug ON TABLE tenant COLUMNS slug UNIQUE;

-- =======================================================================
-- Webinars (tenant scope)
-- =======================================================================
DEFINE TABLE webinar SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE webinar TYPE string;
DEFINE FIELD title ON TABLE webinar TYPE string;
DEFINE FIELD subtitle ON TABLE webinar TYPE option<string>;
DEFINE FIELD description ON TABLE webinar TYPE option<string>;
DEFINE FIELD slug ON TABLE webinar TYPE string;
DEFINE FIELD video_webinar_id ON TABLE webinar TYPE option<string>;
DEFINE FIELD hero_image ON TABLE webinar TYPE option<string>;
DEFINE FIELD header_logo ON TABLE webinar TYPE option<string>;
DEFINE FIELD form_schema ON TABLE webinar TYPE string DEFAULT '[]';
DEFINE FIELD tracking_scripts ON TABLE webinar TYPE string DEFAULT '[]';
DEFINE FIELD meta_title ON TABLE webinar TYPE option<string>;
DEFINE FIELD meta_description ON TABLE webinar TYPE option<string>;
DEFINE FIELD enrichment_webhook_url ON TABLE webinar \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE webinar TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE webinar TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_webinar_tenant_slug ON TABLE webinar \
    COLUMNS tenant_id, slug UNIQUE;
DEFINE INDEX idx_webinar_slug ON TABLE webinar COLUMNS slug;

-- =======================================================================
-- Submissions (webinar scope)
-- =======================================================================
DEFINE TABLE submission SCHEMAFULL;
DEFINE FIELD webinar_id ON TABLE submission TYPE string;
DEFINE FIELD data ON TABLE submission TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD utm_source ON TABLE submission TYPE option<string>;
DEFINE FIELD utm_medium ON TABLE submission TYPE option<string>;
DEFINE FIELD utm_campaign ON TABLE submission TYPE option<string>;
DEFINE FIELD utm_term ON TABLE submission TYPE option<string>;
DEFINE FIELD utm_content ON TABLE submission TYPE option<string>;
DEFINE FIELD sent_to_clay_at ON TABLE submission \
    TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE submission TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_submission_webinar ON TABLE submission \
    COLUMNS webinar_id;
";

/// Run all pending migrations against the database.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "v{} '{}': {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "recording v{}: {}",
                    migration.version, e,
                ))
            })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
