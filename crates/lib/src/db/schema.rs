//! SQL schema definitions.
//!
//! The schema differs between SQLite and PostgreSQL only in how
//! auto-incrementing keys are declared, so table DDL is chosen per
//! [`DbKind`] while indexes are shared.
//!
//! The `schema_version` table records which schema a database was created
//! with; [`initialize`] refuses to open one recorded at another version.

use crate::Result;

use super::{Database, DatabaseError, DbKind, SqlxResultExt};

/// Current schema version.
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA_VERSION_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    version BIGINT PRIMARY KEY
)";

/// Table DDL for SQLite.
pub const SQLITE_TABLES: &[&str] = &[
    SCHEMA_VERSION_TABLE,
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        password_salt TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS images (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id BIGINT NOT NULL,
        image TEXT NOT NULL
    )",
];

/// Table DDL for PostgreSQL.
pub const POSTGRES_TABLES: &[&str] = &[
    SCHEMA_VERSION_TABLE,
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        password_salt TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS images (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL,
        image TEXT NOT NULL
    )",
];

/// SQL statements to create indexes.
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_images_user_id ON images(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_images_id_user_id ON images(id, user_id)",
];

/// Table DDL for the given dialect.
pub fn create_tables(kind: DbKind) -> &'static [&'static str] {
    match kind {
        DbKind::Sqlite => SQLITE_TABLES,
        DbKind::Postgres => POSTGRES_TABLES,
    }
}

/// Initialize the database schema.
///
/// Creates tables and indexes if they don't exist. A database recorded at
/// any other schema version is refused.
pub async fn initialize(db: &Database) -> Result<()> {
    let pool = db.pool();

    for statement in create_tables(db.kind()) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .sql_context(&format!("Schema creation failed - SQL: {statement}"))?;
    }

    let row: Option<(i64,)> = sqlx::query_as("SELECT version FROM schema_version")
        .fetch_optional(pool)
        .await
        .sql_context("Failed to check schema version")?;

    match row {
        None => {
            sqlx::query("INSERT INTO schema_version (version) VALUES ($1)")
                .bind(SCHEMA_VERSION)
                .execute(pool)
                .await
                .sql_context("Failed to initialize schema version")?;
        }
        Some((current,)) if current == SCHEMA_VERSION => {}
        Some((current,)) => {
            return Err(DatabaseError::UnknownMigration {
                from: current,
                to: SCHEMA_VERSION,
            }
            .into());
        }
    }

    for statement in CREATE_INDEXES {
        sqlx::query(statement)
            .execute(pool)
            .await
            .sql_context(&format!("Index creation failed - SQL: {statement}"))?;
    }

    tracing::debug!(kind = db.kind().as_str(), version = SCHEMA_VERSION, "Schema ready");
    Ok(())
}

/// Read the schema version currently recorded in the database.
pub async fn current_version(db: &Database) -> Result<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT version FROM schema_version")
        .fetch_optional(db.pool())
        .await
        .sql_context("Failed to check schema version")?;
    Ok(row.map(|(v,)| v))
}
