//! Database models
//!
//! Rust structs representing stored records.
//! All models use serde for serialization to the frontend and to export
//! documents, with camelCase field names.

use crate::config;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A user-defined launcher tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    /// Creation timestamp in milliseconds
    pub id: i64,
    pub title: String,
    pub link: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Environment a fixed slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "8.24")]
    V824,
    #[serde(rename = "8.20")]
    V820,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::V824, Category::V820];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::V824 => "8.24",
            Category::V820 => "8.20",
        }
    }

    /// Tile color shared by both slots of this environment
    pub fn color(&self) -> &'static str {
        match self {
            Category::V824 => config::COLOR_824,
            Category::V820 => config::COLOR_820,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "8.24" => Ok(Category::V824),
            "8.20" => Ok(Category::V820),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

/// Role a fixed slot opens the environment as
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    Atendente,
    Solicitante,
}

impl SlotType {
    pub const ALL: [SlotType; 2] = [SlotType::Atendente, SlotType::Solicitante];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotType::Atendente => "atendente",
            SlotType::Solicitante => "solicitante",
        }
    }

    /// Display title of the slot
    pub fn title(&self) -> &'static str {
        match self {
            SlotType::Atendente => "Atendente",
            SlotType::Solicitante => "Solicitante",
        }
    }

    /// Path appended to the host base URL
    pub fn path(&self) -> &'static str {
        match self {
            SlotType::Atendente => config::ATENDENTE_PATH,
            SlotType::Solicitante => config::SOLICITANTE_PATH,
        }
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atendente" => Ok(SlotType::Atendente),
            "solicitante" => Ok(SlotType::Solicitante),
            other => Err(format!("unknown slot type '{}'", other)),
        }
    }
}

/// Fields of one fixed slot inside the nested category → type map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedSlot {
    pub title: String,
    pub link: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FixedSlot {
    /// Slot with title and color derived from its position and the given link
    pub fn derived(category: Category, slot_type: SlotType, link: String) -> Self {
        Self {
            title: slot_type.title().to_string(),
            link,
            color: category.color().to_string(),
            updated_at: None,
        }
    }
}

/// The four fixed slots, nested by category then type
pub type FixedShortcuts = BTreeMap<Category, BTreeMap<SlotType, FixedSlot>>;

/// Default fixed slots pointing at the default hosts
pub fn default_fixed_shortcuts() -> FixedShortcuts {
    let config = Configuration::default();
    let mut slots = FixedShortcuts::new();
    for category in Category::ALL {
        for slot_type in SlotType::ALL {
            let link = config.slot_link(category, slot_type);
            slots
                .entry(category)
                .or_default()
                .insert(slot_type, FixedSlot::derived(category, slot_type, link));
        }
    }
    slots
}

/// Flat, composite-keyed form of a fixed slot as stored
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSlotRecord {
    pub id: String,
    pub category: Category,
    pub slot_type: SlotType,
    pub slot: FixedSlot,
}

impl FixedSlotRecord {
    pub fn new(category: Category, slot_type: SlotType, slot: FixedSlot) -> Self {
        Self {
            id: format!("{}_{}", category, slot_type),
            category,
            slot_type,
            slot,
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for FixedSlotRecord {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let category: String = row.try_get("category")?;
        let slot_type: String = row.try_get("slot_type")?;
        let decode = |column: &str, err: String| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: err.into(),
        };

        Ok(Self {
            id: row.try_get("id")?,
            category: category.parse().map_err(|e| decode("category", e))?,
            slot_type: slot_type.parse().map_err(|e| decode("slot_type", e))?,
            slot: FixedSlot {
                title: row.try_get("title")?,
                link: row.try_get("link")?,
                color: row.try_get("color")?,
                updated_at: row.try_get("updated_at")?,
            },
        })
    }
}

/// How tiles open their link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkBehavior {
    /// Replace the launcher page
    #[default]
    Same,
    /// Open in a new tab (the system browser)
    New,
}

/// Launcher configuration singleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(rename = "8.24", default = "default_host_824")]
    pub host_824: String,
    #[serde(rename = "8.20", default = "default_host_820")]
    pub host_820: String,
    #[serde(default)]
    pub link_behavior: LinkBehavior,
}

fn default_host_824() -> String {
    config::DEFAULT_HOST_824.to_string()
}

fn default_host_820() -> String {
    config::DEFAULT_HOST_820.to_string()
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            host_824: default_host_824(),
            host_820: default_host_820(),
            link_behavior: LinkBehavior::default(),
        }
    }
}

impl Configuration {
    pub fn host(&self, category: Category) -> &str {
        match category {
            Category::V824 => &self.host_824,
            Category::V820 => &self.host_820,
        }
    }

    /// Link a fixed slot points at when the user never edited it
    pub fn slot_link(&self, category: Category, slot_type: SlotType) -> String {
        format!(
            "{}{}",
            self.host(category).trim_end_matches('/'),
            slot_type.path()
        )
    }
}

/// Raw configuration row: a JSON value under a fixed key
#[derive(Debug, Clone, FromRow)]
pub struct ConfigRecord {
    pub key: String,
    pub value: String,
}

/// A dated journal note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: i64,
    /// UTC day the entry was created
    pub date: NaiveDate,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for DiaryEntry {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let Json(tags) = row.try_get::<Json<Vec<String>>, _>("tags")?;
        Ok(Self {
            id: row.try_get("id")?,
            date: row.try_get("date")?,
            content: row.try_get("content")?,
            tags,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fixed_shortcuts_has_four_slots() {
        let slots = default_fixed_shortcuts();

        let count: usize = slots.values().map(|types| types.len()).sum();
        assert_eq!(count, 4);

        let slot = &slots[&Category::V820][&SlotType::Solicitante];
        assert_eq!(slot.title, "Solicitante");
        assert_eq!(slot.color, "#1D4ED8");
        assert_eq!(
            slot.link,
            "http://localhost/8.20/html/sys/syssolicitante9/portal/portal.php"
        );
    }

    #[test]
    fn test_configuration_wire_shape() {
        let config: Configuration =
            serde_json::from_str(r#"{"8.24":"http://a","8.20":"http://b","linkBehavior":"new"}"#)
                .unwrap();

        assert_eq!(config.host(Category::V824), "http://a");
        assert_eq!(config.host(Category::V820), "http://b");
        assert_eq!(config.link_behavior, LinkBehavior::New);

        // Older records without linkBehavior open in the same tab
        let legacy: Configuration =
            serde_json::from_str(r#"{"8.24":"http://a","8.20":"http://b"}"#).unwrap();
        assert_eq!(legacy.link_behavior, LinkBehavior::Same);
    }

    #[test]
    fn test_composite_key() {
        let record = FixedSlotRecord::new(
            Category::V824,
            SlotType::Atendente,
            FixedSlot::derived(Category::V824, SlotType::Atendente, "http://x".into()),
        );
        assert_eq!(record.id, "8.24_atendente");
    }

    #[test]
    fn test_shortcut_uses_camel_case() {
        let json = r##"{"id":1,"title":"Docs","link":"https://docs.rs","color":"#000000","createdAt":"2024-06-03T10:00:00Z"}"##;
        let shortcut: Shortcut = serde_json::from_str(json).unwrap();

        assert_eq!(shortcut.title, "Docs");
        assert!(shortcut.updated_at.is_none());

        let value = serde_json::to_value(&shortcut).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_none());
    }
}
