//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity. UUIDs and
//! group ids are stored as strings (they double as record ids).

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
    #[allow(dead_code)]
    name: String,
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
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations (host content tree, observed by the engine)
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD title ON TABLE organization TYPE string;
DEFINE FIELD parent_id ON TABLE organization TYPE option<string>;
DEFINE FIELD is_root ON TABLE organization TYPE bool DEFAULT false;
DEFINE FIELD active ON TABLE organization TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_organization_parent ON TABLE organization \
    COLUMNS parent_id;

-- =======================================================================
-- Engine-managed platform groups
-- =======================================================================
DEFINE TABLE platform_group SCHEMAFULL;
DEFINE FIELD title ON TABLE platform_group TYPE string;
DEFINE FIELD created_at ON TABLE platform_group TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE platform_group TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Group membership
-- =======================================================================
DEFINE TABLE group_member SCHEMAFULL;
DEFINE FIELD group_id ON TABLE group_member TYPE string;
DEFINE FIELD user_id ON TABLE group_member TYPE string;
DEFINE FIELD added_at ON TABLE group_member TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_group_member ON TABLE group_member \
    COLUMNS group_id, user_id UNIQUE;
";

/// Apply any pending schema migrations.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Schema(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Schema(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Schema(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
