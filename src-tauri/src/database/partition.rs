//! Generic keyed-partition store
//!
//! A partition is one table whose rows map to a [`Record`] type through a
//! key column. The launcher and diary databases both go through
//! [`PartitionStore`], so open/transaction/index boilerplate lives here
//! once instead of per record kind.

use crate::error::{AppError, Result};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Encode, FromRow, Sqlite, SqlitePool, Type};
use std::fmt::Display;

/// Query with SQLite arguments, as produced by [`sqlx::query`]
pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// A type stored as rows of one partition
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static {
    type Key: for<'q> Encode<'q, Sqlite> + Type<Sqlite> + Display + Clone + Send + Sync + 'static;

    /// Table holding the records
    const PARTITION: &'static str;
    /// Primary key column
    const KEY_COLUMN: &'static str;
    /// Every stored column, key included, in the order `bind_values` binds them
    const COLUMNS: &'static [&'static str];

    fn key(&self) -> Self::Key;

    /// Bind one value per entry of [`Record::COLUMNS`]
    fn bind_values<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;
}

/// Keyed-partition access over one database pool
#[derive(Clone)]
pub struct PartitionStore {
    pool: SqlitePool,
}

impl PartitionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All records in rowid order.
    ///
    /// This is insertion order unless the key column is an
    /// `INTEGER PRIMARY KEY`, which makes it an alias of the rowid.
    pub async fn get_all<R: Record>(&self) -> Result<Vec<R>> {
        let sql = format!("SELECT * FROM {} ORDER BY rowid", R::PARTITION);
        let records = sqlx::query_as::<_, R>(&sql).fetch_all(&self.pool).await?;
        Ok(records)
    }

    /// Record stored under `key`, if any
    pub async fn get<R: Record>(&self, key: &R::Key) -> Result<Option<R>> {
        let sql = format!("SELECT * FROM {} WHERE {} = ?", R::PARTITION, R::KEY_COLUMN);
        let record = sqlx::query_as::<_, R>(&sql)
            .bind(key.clone())
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// Records whose indexed `column` equals `value`
    pub async fn find_by<R, V>(&self, column: &str, value: V) -> Result<Vec<R>>
    where
        R: Record,
        V: for<'q> Encode<'q, Sqlite> + Type<Sqlite> + Send + 'static,
    {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ? ORDER BY rowid",
            R::PARTITION,
            column
        );
        let records = sqlx::query_as::<_, R>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    /// Records whose indexed `column` lies in `[start, end]`
    pub async fn find_between<R, V>(&self, column: &str, start: V, end: V) -> Result<Vec<R>>
    where
        R: Record,
        V: for<'q> Encode<'q, Sqlite> + Type<Sqlite> + Send + 'static,
    {
        let sql = format!(
            "SELECT * FROM {} WHERE {} BETWEEN ? AND ? ORDER BY rowid",
            R::PARTITION,
            column
        );
        let records = sqlx::query_as::<_, R>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    /// Records matching a caller-supplied condition with one bound value
    pub async fn find_where<R, V>(&self, condition: &str, value: V) -> Result<Vec<R>>
    where
        R: Record,
        V: for<'q> Encode<'q, Sqlite> + Type<Sqlite> + Send + 'static,
    {
        let sql = format!(
            "SELECT * FROM {} WHERE {} ORDER BY rowid",
            R::PARTITION,
            condition
        );
        let records = sqlx::query_as::<_, R>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    /// Insert a new record; an existing key is a [`AppError::DuplicateKey`]
    pub async fn insert<R: Record>(&self, record: &R) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            R::PARTITION,
            R::COLUMNS.join(", "),
            placeholders(R::COLUMNS.len())
        );

        record
            .bind_values(sqlx::query(&sql))
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::DuplicateKey(format!("{} {}", R::PARTITION, record.key()))
                }
                other => AppError::Database(other),
            })?;

        tracing::debug!("Inserted {} record {}", R::PARTITION, record.key());
        Ok(())
    }

    /// Insert or overwrite the record stored under its key
    pub async fn put<R: Record>(&self, record: &R) -> Result<()> {
        let updates = R::COLUMNS
            .iter()
            .filter(|column| **column != R::KEY_COLUMN)
            .map(|column| format!("{column} = excluded.{column}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) DO UPDATE SET {}",
            R::PARTITION,
            R::COLUMNS.join(", "),
            placeholders(R::COLUMNS.len()),
            R::KEY_COLUMN,
            updates
        );

        record
            .bind_values(sqlx::query(&sql))
            .execute(&self.pool)
            .await?;

        tracing::debug!("Put {} record {}", R::PARTITION, record.key());
        Ok(())
    }

    /// Delete by key; returns whether a record was removed
    pub async fn delete<R: Record>(&self, key: &R::Key) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE {} = ?", R::PARTITION, R::KEY_COLUMN);
        let rows = sqlx::query(&sql)
            .bind(key.clone())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!("Deleted {} record {} ({} rows)", R::PARTITION, key, rows);
        Ok(rows > 0)
    }

    /// Remove every record of the partition
    pub async fn clear<R: Record>(&self) -> Result<u64> {
        let sql = format!("DELETE FROM {}", R::PARTITION);
        let rows = sqlx::query(&sql).execute(&self.pool).await?.rows_affected();

        tracing::debug!("Cleared {} ({} rows)", R::PARTITION, rows);
        Ok(rows)
    }

    /// Replace the whole partition with `records`.
    ///
    /// Clear and inserts run as separate statements: a failure part-way
    /// leaves the partition holding only the records inserted so far.
    pub async fn replace_all<R: Record>(&self, records: &[R]) -> Result<()> {
        self.clear::<R>().await?;
        for record in records {
            self.insert(record).await?;
        }

        tracing::debug!("Replaced {} with {} records", R::PARTITION, records.len());
        Ok(())
    }

    pub async fn count<R: Record>(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::PARTITION);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// Largest integer key stored, if any
    pub async fn max_key<R: Record>(&self) -> Result<Option<i64>> {
        let sql = format!("SELECT MAX({}) FROM {}", R::KEY_COLUMN, R::PARTITION);
        let max: Option<i64> = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(max)
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
