//! Backup service
//!
//! Exports store contents as pretty-printed JSON arrays named
//! `<artifact>-backup-YYYY-MM-DD.json` and reads user-supplied documents
//! back. Only a top-level array is accepted; every element is decoded
//! before the caller touches its store, so a rejected document never leaves
//! a half-imported store behind.

use crate::config;
use crate::error::{AppError, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// What an exported document contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// The free-form shortcut list
    Launcher,
    /// All diary entries
    Diary,
}

impl Artifact {
    fn prefix(&self) -> &'static str {
        match self {
            Artifact::Launcher => config::LAUNCHER_BACKUP_PREFIX,
            Artifact::Diary => config::DIARY_BACKUP_PREFIX,
        }
    }
}

/// File name of an export made on `date`
pub fn backup_filename(artifact: Artifact, date: NaiveDate) -> String {
    format!(
        "{}-backup-{}.{}",
        artifact.prefix(),
        date.format("%Y-%m-%d"),
        config::BACKUP_EXTENSION
    )
}

/// Serialize records as a pretty-printed array
pub fn to_document<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Parse a document that must hold a top-level array
pub fn parse_sequence(document: &str) -> Result<Vec<serde_json::Value>> {
    let value: serde_json::Value = serde_json::from_str(document)
        .map_err(|e| AppError::InvalidFormat(format!("document is not valid JSON: {}", e)))?;

    match value {
        serde_json::Value::Array(items) => Ok(items),
        other => Err(AppError::InvalidFormat(format!(
            "expected an array at the top level, found {}",
            json_kind(&other)
        ))),
    }
}

/// Parse a top-level array and decode every element as `T`
pub fn decode_sequence<T: DeserializeOwned>(document: &str) -> Result<Vec<T>> {
    parse_sequence(document)?
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| {
                AppError::InvalidFormat(format!("element {} is malformed: {}", index, e))
            })
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Writes exports to and reads imports from the file system
#[derive(Clone)]
pub struct BackupService {
    exports_dir: PathBuf,
}

impl BackupService {
    pub fn new(exports_dir: PathBuf) -> Self {
        Self { exports_dir }
    }

    /// Write `document` as the export of `artifact` made on `date`
    pub async fn write_export(
        &self,
        artifact: Artifact,
        document: &str,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.exports_dir).await?;

        let path = self.exports_dir.join(backup_filename(artifact, date));
        fs::write(&path, document).await?;

        tracing::info!("Export written to {:?} ({} bytes)", path, document.len());
        Ok(path)
    }

    /// Read a user-selected document as UTF-8 text
    pub async fn read_document(&self, path: &Path) -> Result<String> {
        tracing::info!("Reading import document {:?}", path);
        let bytes = fs::read(path).await?;
        String::from_utf8(bytes)
            .map_err(|_| AppError::InvalidFormat("document is not UTF-8 text".to_string()))
    }
}
