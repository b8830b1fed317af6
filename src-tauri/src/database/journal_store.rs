//! Journal store
//!
//! Diary entries keyed by a millisecond id with lookups by day, day range
//! and tag. Entries live in their own database so the diary can be cleared
//! or restored without touching the launcher.

use super::ids::IdClock;
use super::models::DiaryEntry;
use super::partition::{PartitionStore, Record, SqliteQuery};
use super::schema::DIARY_SCHEMA;
use crate::error::{AppError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use std::path::Path;
use std::sync::Arc;

impl Record for DiaryEntry {
    type Key = i64;

    const PARTITION: &'static str = "entries";
    const KEY_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] =
        &["id", "date", "content", "tags", "created_at", "updated_at"];

    fn key(&self) -> i64 {
        self.id
    }

    fn bind_values<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.id)
            .bind(self.date)
            .bind(self.content.clone())
            .bind(Json(self.tags.clone()))
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

/// Durable storage for diary entries
#[derive(Clone)]
pub struct JournalStore {
    partitions: PartitionStore,
    ids: Arc<IdClock>,
}

impl JournalStore {
    /// Wrap an initialized diary database, seeding the id clock from stored ids
    pub async fn new(partitions: PartitionStore) -> Result<Self> {
        let ids = IdClock::starting_after(partitions.max_key::<DiaryEntry>().await?.unwrap_or(0));
        Ok(Self {
            partitions,
            ids: Arc::new(ids),
        })
    }

    /// Open (creating if needed) the diary database at `db_path`
    pub async fn initialize(db_path: &Path) -> Result<Self> {
        let pool = super::open_store(db_path, &DIARY_SCHEMA).await?;
        Self::new(PartitionStore::new(pool)).await
    }

    /// Store a new entry dated today
    pub async fn add_entry(&self, content: &str, tags: Vec<String>) -> Result<DiaryEntry> {
        self.add_entry_at(content, tags, Utc::now()).await
    }

    /// Store a new entry created at `now`
    pub async fn add_entry_at(
        &self,
        content: &str,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<DiaryEntry> {
        let entry = DiaryEntry {
            id: self.ids.next(),
            date: now.date_naive(),
            content: content.trim().to_string(),
            tags,
            created_at: now,
            updated_at: now,
        };

        self.partitions.insert(&entry).await?;
        self.sync_tags(entry.id, &entry.tags).await?;

        tracing::debug!("Added diary entry {} for {}", entry.id, entry.date);
        Ok(entry)
    }

    pub async fn get_entry(&self, id: i64) -> Result<DiaryEntry> {
        self.partitions
            .get::<DiaryEntry>(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("diary entry {}", id)))
    }

    pub async fn get_entries_by_date(&self, date: NaiveDate) -> Result<Vec<DiaryEntry>> {
        self.partitions.find_by("date", date).await
    }

    /// Entries dated within `[start, end]`
    pub async fn get_entries_by_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DiaryEntry>> {
        self.partitions.find_between("date", start, end).await
    }

    /// Entries carrying `tag` among their tags
    pub async fn get_entries_by_tag(&self, tag: &str) -> Result<Vec<DiaryEntry>> {
        self.partitions
            .find_where(
                "id IN (SELECT entry_id FROM entry_tags WHERE tag = ?)",
                tag.to_string(),
            )
            .await
    }

    pub async fn get_all_entries(&self) -> Result<Vec<DiaryEntry>> {
        self.partitions.get_all().await
    }

    /// Replace content and tags of an existing entry
    pub async fn update_entry(&self, id: i64, content: &str, tags: Vec<String>) -> Result<DiaryEntry> {
        let mut entry = self.get_entry(id).await?;
        entry.content = content.trim().to_string();
        entry.tags = tags;
        entry.updated_at = Utc::now();

        self.partitions.put(&entry).await?;
        self.sync_tags(id, &entry.tags).await?;

        tracing::debug!("Updated diary entry {}", id);
        Ok(entry)
    }

    /// Remove an entry; removing a missing id is not an error
    pub async fn delete_entry(&self, id: i64) -> Result<()> {
        let removed = self.partitions.delete::<DiaryEntry>(&id).await?;
        sqlx::query("DELETE FROM entry_tags WHERE entry_id = ?")
            .bind(id)
            .execute(self.partitions.pool())
            .await?;
        if !removed {
            tracing::debug!("Diary entry {} was already absent", id);
        }
        Ok(())
    }

    pub async fn clear_all(&self) -> Result<()> {
        let removed = self.partitions.clear::<DiaryEntry>().await?;
        sqlx::query("DELETE FROM entry_tags")
            .execute(self.partitions.pool())
            .await?;
        tracing::info!("Removed all {} diary entries", removed);
        Ok(())
    }

    pub async fn count(&self) -> Result<i64> {
        self.partitions.count::<DiaryEntry>().await
    }

    /// Make the tag index rows of entry `id` match `tags`
    async fn sync_tags(&self, id: i64, tags: &[String]) -> Result<()> {
        let mut tx = self.partitions.pool().begin().await?;

        sqlx::query("DELETE FROM entry_tags WHERE entry_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for tag in tags {
            sqlx::query("INSERT OR IGNORE INTO entry_tags (entry_id, tag) VALUES (?, ?)")
                .bind(id)
                .bind(tag)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::initialize_database;
    use chrono::TimeZone;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_store() -> JournalStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool, &DIARY_SCHEMA).await.unwrap();

        JournalStore::new(PartitionStore::new(pool)).await.unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_add_entry_trims_and_dates() {
        let store = create_test_store().await;

        let entry = store
            .add_entry("  Deploy finished \n", vec!["work".to_string()])
            .await
            .unwrap();

        assert_eq!(entry.content, "Deploy finished");
        assert_eq!(entry.date, Utc::now().date_naive());
        assert!(entry.created_at <= entry.updated_at);

        let all = store.get_all_entries().await.unwrap();
        assert_eq!(all, vec![entry]);
    }

    #[tokio::test]
    async fn test_ids_are_unique_for_rapid_adds() {
        let store = create_test_store().await;

        for i in 0..20 {
            store.add_entry(&format!("note {}", i), vec![]).await.unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_lookup_by_date_and_range() {
        let store = create_test_store().await;

        store.add_entry_at("first", vec![], at(2024, 6, 1, 9)).await.unwrap();
        store.add_entry_at("second", vec![], at(2024, 6, 2, 9)).await.unwrap();
        store.add_entry_at("third", vec![], at(2024, 6, 2, 18)).await.unwrap();
        store.add_entry_at("fourth", vec![], at(2024, 6, 5, 9)).await.unwrap();

        let june_2 = store.get_entries_by_date(day(2024, 6, 2)).await.unwrap();
        assert_eq!(june_2.len(), 2);

        let range = store
            .get_entries_by_range(day(2024, 6, 1), day(2024, 6, 2))
            .await
            .unwrap();
        assert_eq!(range.len(), 3);

        let empty = store.get_entries_by_date(day(2024, 6, 3)).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_by_tag() {
        let store = create_test_store().await;

        store
            .add_entry("standup", vec!["work".to_string(), "daily".to_string()])
            .await
            .unwrap();
        store.add_entry("gym", vec!["health".to_string()]).await.unwrap();

        let work = store.get_entries_by_tag("work").await.unwrap();
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].content, "standup");

        assert!(store.get_entries_by_tag("travel").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tag_lookup_follows_update_and_delete() {
        let store = create_test_store().await;

        let entry = store
            .add_entry("planning", vec!["work".to_string(), "work".to_string()])
            .await
            .unwrap();
        let other = store.add_entry("retro", vec!["work".to_string()]).await.unwrap();

        store
            .update_entry(entry.id, "planning", vec!["personal".to_string()])
            .await
            .unwrap();

        let work = store.get_entries_by_tag("work").await.unwrap();
        assert_eq!(work.iter().map(|e| e.id).collect::<Vec<_>>(), vec![other.id]);
        let personal = store.get_entries_by_tag("personal").await.unwrap();
        assert_eq!(personal.len(), 1);
        assert_eq!(personal[0].id, entry.id);

        store.delete_entry(other.id).await.unwrap();
        assert!(store.get_entries_by_tag("work").await.unwrap().is_empty());

        store.clear_all().await.unwrap();
        let leftover: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entry_tags")
            .fetch_one(store.partitions.pool())
            .await
            .unwrap();
        assert_eq!(leftover, 0);
    }

    #[tokio::test]
    async fn test_update_preserves_identity() {
        let store = create_test_store().await;

        let entry = store.add_entry("draft", vec![]).await.unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;

        let updated = store
            .update_entry(entry.id, " final ", vec!["done".to_string()])
            .await
            .unwrap();

        assert_eq!(updated.id, entry.id);
        assert_eq!(updated.date, entry.date);
        assert_eq!(updated.created_at, entry.created_at);
        assert!(updated.updated_at > entry.updated_at);

        let stored = store.get_entry(entry.id).await.unwrap();
        assert_eq!(stored.content, "final");
        assert_eq!(stored.tags, vec!["done".to_string()]);
        assert_eq!(stored.created_at, entry.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_entry() {
        let store = create_test_store().await;

        let result = store.update_entry(42, "nothing", vec![]).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_entry_is_silent() {
        let store = create_test_store().await;
        store.add_entry("keep me", vec![]).await.unwrap();

        store.delete_entry(12345).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let store = create_test_store().await;
        store.add_entry("one", vec![]).await.unwrap();
        store.add_entry("two", vec![]).await.unwrap();

        store.clear_all().await.unwrap();

        assert!(store.get_all_entries().await.unwrap().is_empty());
    }
}
