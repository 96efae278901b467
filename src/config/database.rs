//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Creation is idempotent, which lets the binary run against an
//! existing database file.

use crate::entities::{Appointment, Attendance, Company, Doctor, Employee, Hospital, Payroll, Revenue};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Database URL used when neither the settings file nor `DATABASE_URL` names one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/bethel_city.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling
/// back to the given configured value.
#[must_use]
pub fn resolve_database_url(configured: &str) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| configured.to_string())
}

/// File backing a `SQLite` URL, or `None` for in-memory and non-SQLite URLs.
#[must_use]
pub fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    if path.is_empty() || path == ":memory:" || query.contains("mode=memory") {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Creates the directory holding the database file, since `SQLite` will not.
///
/// # Errors
/// Returns [`crate::errors::Error::Io`] if the directory cannot be created.
pub fn ensure_database_dir(database_url: &str) -> Result<()> {
    if let Some(parent) = sqlite_file_path(database_url)
        .as_deref()
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
        debug!("Database directory ready: {}", parent.display());
    }
    Ok(())
}

/// Establishes a connection to the database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates every collection table that does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Company).await?;
    create_table(db, &schema, Employee).await?;
    create_table(db, &schema, Attendance).await?;
    create_table(db, &schema, Payroll).await?;
    create_table(db, &schema, Revenue).await?;
    create_table(db, &schema, Hospital).await?;
    create_table(db, &schema, Doctor).await?;
    create_table(db, &schema, Appointment).await?;

    info!("Database tables ensured.");
    Ok(())
}
