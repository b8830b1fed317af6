//! Database schema and migrations
//!
//! Each logical database is described by a [`Schema`]: a name and an ordered
//! list of versioned migrations. Opening a database applies every migration
//! above the recorded version exactly once.

use crate::error::Result;
use sqlx::{sqlite::SqlitePool, Row};

/// Versioned structure of one logical database
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub migrations: &'static [(i32, &'static str)],
}

impl Schema {
    /// Highest version this schema migrates to
    pub fn version(&self) -> i32 {
        self.migrations
            .iter()
            .map(|(version, _)| *version)
            .max()
            .unwrap_or(0)
    }
}

/// Shortcuts, fixed slots and configuration
pub const LAUNCHER_SCHEMA: Schema = Schema {
    name: "launcher",
    migrations: &[(1, include_str!("migrations/launcher_001_initial_schema.sql"))],
};

/// Journal entries
pub const DIARY_SCHEMA: Schema = Schema {
    name: "diary",
    migrations: &[
        (1, include_str!("migrations/diary_001_initial_schema.sql")),
        (2, include_str!("migrations/diary_002_entry_tags.sql")),
    ],
};

/// Initialize database with schema
pub async fn initialize_database(pool: &SqlitePool, schema: &Schema) -> Result<()> {
    tracing::info!("Initializing {} database schema", schema.name);

    // Enable WAL mode for better performance and crash safety
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    // Create migrations table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Get current version
    let current_version: i32 = sqlx::query("SELECT COALESCE(MAX(version), 0) FROM migrations")
        .fetch_one(pool)
        .await?
        .get(0);

    tracing::info!(
        "Current {} database version: {} (latest {})",
        schema.name,
        current_version,
        schema.version()
    );

    apply_migrations(pool, schema, current_version).await?;

    tracing::info!("{} database initialization complete", schema.name);
    Ok(())
}

async fn apply_migrations(pool: &SqlitePool, schema: &Schema, current_version: i32) -> Result<()> {
    for &(version, sql) in schema.migrations {
        if version > current_version {
            tracing::info!("Applying {} migration version {}", schema.name, version);

            let mut tx = pool.begin().await?;

            for statement in sql.split(';').filter(|s| !s.trim().is_empty()) {
                sqlx::query(statement).execute(&mut *tx).await?;
            }

            sqlx::query("INSERT INTO migrations (version) VALUES (?)")
                .bind(version)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;

            tracing::info!("Migration version {} applied successfully", version);
        }
    }

    Ok(())
}
