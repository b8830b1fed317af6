//! Local store for the launcher page
//!
//! Three partitions share the launcher database: free-form shortcuts
//! (integer key), the fixed slots (composite `category_type` key) and the
//! configuration singleton (fixed key). Every save is a full overwrite.

use super::models::*;
use super::partition::{PartitionStore, Record, SqliteQuery};
use super::schema::LAUNCHER_SCHEMA;
use crate::config;
use crate::error::Result;
use std::path::Path;

impl Record for Shortcut {
    type Key = i64;

    const PARTITION: &'static str = "shortcuts";
    const KEY_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] =
        &["id", "title", "link", "color", "created_at", "updated_at"];

    fn key(&self) -> i64 {
        self.id
    }

    fn bind_values<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.id)
            .bind(self.title.clone())
            .bind(self.link.clone())
            .bind(self.color.clone())
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

impl Record for FixedSlotRecord {
    type Key = String;

    const PARTITION: &'static str = "fixed_shortcuts";
    const KEY_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "category",
        "slot_type",
        "title",
        "link",
        "color",
        "updated_at",
    ];

    fn key(&self) -> String {
        self.id.clone()
    }

    fn bind_values<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.id.clone())
            .bind(self.category.as_str())
            .bind(self.slot_type.as_str())
            .bind(self.slot.title.clone())
            .bind(self.slot.link.clone())
            .bind(self.slot.color.clone())
            .bind(self.slot.updated_at)
    }
}

impl Record for ConfigRecord {
    type Key = String;

    const PARTITION: &'static str = "config";
    const KEY_COLUMN: &'static str = "key";
    const COLUMNS: &'static [&'static str] = &["key", "value"];

    fn key(&self) -> String {
        self.key.clone()
    }

    fn bind_values<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.key.clone()).bind(self.value.clone())
    }
}

/// Durable storage for shortcuts, fixed slots and configuration
#[derive(Clone)]
pub struct LocalStore {
    partitions: PartitionStore,
}

impl LocalStore {
    pub fn new(partitions: PartitionStore) -> Self {
        Self { partitions }
    }

    /// Open (creating if needed) the launcher database at `db_path`
    pub async fn initialize(db_path: &Path) -> Result<Self> {
        let pool = super::open_store(db_path, &LAUNCHER_SCHEMA).await?;
        Ok(Self::new(PartitionStore::new(pool)))
    }

    /// Replace every stored shortcut with `shortcuts`
    pub async fn save_shortcuts(&self, shortcuts: &[Shortcut]) -> Result<()> {
        self.partitions.replace_all(shortcuts).await?;
        tracing::debug!("Saved {} shortcuts", shortcuts.len());
        Ok(())
    }

    /// All shortcuts in insertion order
    pub async fn load_shortcuts(&self) -> Result<Vec<Shortcut>> {
        self.partitions.get_all::<Shortcut>().await
    }

    /// Replace the stored fixed slots, flattening the nested map
    pub async fn save_fixed_shortcuts(&self, fixed: &FixedShortcuts) -> Result<()> {
        let records: Vec<FixedSlotRecord> = fixed
            .iter()
            .flat_map(|(category, types)| {
                types.iter().map(move |(slot_type, slot)| {
                    FixedSlotRecord::new(*category, *slot_type, slot.clone())
                })
            })
            .collect();

        self.partitions.replace_all(&records).await?;
        tracing::debug!("Saved {} fixed shortcuts", records.len());
        Ok(())
    }

    /// Stored fixed slots as a nested category → type map (empty when none)
    pub async fn load_fixed_shortcuts(&self) -> Result<FixedShortcuts> {
        let records = self.partitions.get_all::<FixedSlotRecord>().await?;

        let mut fixed = FixedShortcuts::new();
        for record in records {
            fixed
                .entry(record.category)
                .or_default()
                .insert(record.slot_type, record.slot);
        }
        Ok(fixed)
    }

    /// Upsert the configuration singleton
    pub async fn save_config(&self, configuration: &Configuration) -> Result<()> {
        let record = ConfigRecord {
            key: config::CONFIG_RECORD_KEY.to_string(),
            value: serde_json::to_string(configuration)?,
        };
        self.partitions.put(&record).await
    }

    /// Stored configuration, or `None` when it was never saved
    pub async fn load_config(&self) -> Result<Option<Configuration>> {
        let record = self
            .partitions
            .get::<ConfigRecord>(&config::CONFIG_RECORD_KEY.to_string())
            .await?;

        match record {
            Some(record) => Ok(Some(serde_json::from_str(&record.value)?)),
            None => Ok(None),
        }
    }

    /// Largest shortcut id ever stored
    pub async fn max_shortcut_id(&self) -> Result<Option<i64>> {
        self.partitions.max_key::<Shortcut>().await
    }
}
