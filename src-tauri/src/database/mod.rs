//! Database module
//!
//! This module provides all persistence functionality:
//! - Versioned schemas for the launcher and diary databases
//! - Model definitions
//! - A generic keyed-partition store and the two stores built on it

pub mod ids;
pub mod journal_store;
pub mod launcher_store;
pub mod models;
pub mod partition;
pub mod schema;

pub use ids::IdClock;
pub use journal_store::JournalStore;
pub use launcher_store::LocalStore;
pub use models::*;
pub use partition::{PartitionStore, Record};
pub use schema::{initialize_database, Schema, DIARY_SCHEMA, LAUNCHER_SCHEMA};

use crate::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Build connection options shared by migration and application connections.
fn connect_options(db_path: &Path) -> std::result::Result<SqliteConnectOptions, sqlx::Error> {
    SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display())).map(
        |opts| {
            opts.create_if_missing(true)
                .busy_timeout(Duration::from_secs(5))
                .journal_mode(SqliteJournalMode::Wal)
        },
    )
}

/// Create and initialize a database connection pool for `schema`.
///
/// Migrations run on a dedicated single-connection pool that is closed
/// before the application pool is created, so every pooled connection sees
/// the final schema.
pub async fn create_pool(db_path: &Path, schema: &Schema) -> Result<SqlitePool> {
    tracing::info!(
        "Creating {} database connection pool at: {:?}",
        schema.name,
        db_path
    );

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let migration_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options(db_path)?)
        .await?;

    initialize_database(&migration_pool, schema).await?;
    migration_pool.close().await;

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options(db_path)?)
        .await?;

    tracing::info!("{} database pool created successfully", schema.name);

    Ok(pool)
}

/// Open a store's database, reporting any failure as [`AppError::StorageUnavailable`]
pub async fn open_store(db_path: &Path, schema: &Schema) -> Result<SqlitePool> {
    create_pool(db_path, schema).await.map_err(|e| {
        tracing::error!("Failed to open {} database: {}", schema.name, e);
        AppError::StorageUnavailable(format!("{} database: {}", schema.name, e))
    })
}
