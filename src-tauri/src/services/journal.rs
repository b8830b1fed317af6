//! Journal service
//!
//! Groups diary entries by day, colors the most recent days by recency tier
//! and drives the add/edit/delete flow of the diary panel.

use super::backup;
use crate::config;
use crate::database::{DiaryEntry, JournalStore};
use crate::error::{AppError, Result};
use chrono::{Datelike, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Mutex;

const EMPTY_ENTRY_MESSAGE: &str = "Por favor, digite uma anotação.";

/// Recency classification of a shown day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// The current date
    Today,
    /// Most recent day with entries other than today
    Latest,
    Other,
}

impl Tier {
    pub fn color(&self) -> &'static str {
        match self {
            Tier::Today => "green",
            Tier::Latest => "yellow",
            Tier::Other => "red",
        }
    }
}

/// Tier of each shown date.
///
/// `dates` are the shown dates, most recent first. When today is shown the
/// second date is `Latest`; otherwise the first one is.
pub fn assign_tiers(dates: &[NaiveDate], today: NaiveDate) -> Vec<Tier> {
    let today_shown = dates.contains(&today);
    let latest_position = if today_shown { 1 } else { 0 };

    dates
        .iter()
        .enumerate()
        .map(|(position, date)| {
            if *date == today {
                Tier::Today
            } else if position == latest_position {
                Tier::Latest
            } else {
                Tier::Other
            }
        })
        .collect()
}

/// A rendered diary entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryCard {
    pub id: i64,
    /// `dd/mm/yyyy` of the creation instant
    pub date: String,
    /// `HH:MM` of the creation instant
    pub time: String,
    pub day_label: String,
    pub tier: Tier,
    pub color: &'static str,
    pub content: String,
    pub tags: Vec<String>,
}

/// Entries of one shown day, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGroup {
    pub date: NaiveDate,
    pub tier: Tier,
    pub entries: Vec<EntryCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalView {
    pub groups: Vec<DayGroup>,
    /// Set when there is nothing to show
    pub empty_state: Option<String>,
}

/// Render the most recent days of `entries` as seen on `today`, with times in `tz`
pub fn render_journal<Tz>(mut entries: Vec<DiaryEntry>, today: NaiveDate, tz: &Tz) -> JournalView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if entries.is_empty() {
        return JournalView {
            groups: Vec::new(),
            empty_state: Some(
                "Nenhuma anotação encontrada. Clique em \"Nova Anotação\" para começar seu diário!"
                    .to_string(),
            ),
        };
    }

    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut by_date: BTreeMap<NaiveDate, Vec<DiaryEntry>> = BTreeMap::new();
    for entry in entries {
        by_date.entry(entry.date).or_default().push(entry);
    }

    let shown: Vec<NaiveDate> = by_date
        .keys()
        .rev()
        .take(config::JOURNAL_VISIBLE_DAYS)
        .copied()
        .collect();
    let tiers = assign_tiers(&shown, today);

    let groups = shown
        .into_iter()
        .zip(tiers)
        .map(|(date, tier)| DayGroup {
            date,
            tier,
            entries: by_date
                .remove(&date)
                .unwrap_or_default()
                .into_iter()
                .map(|entry| entry_card(entry, tier, tz))
                .collect(),
        })
        .collect();

    JournalView {
        groups,
        empty_state: None,
    }
}

fn entry_card<Tz>(entry: DiaryEntry, tier: Tier, tz: &Tz) -> EntryCard
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = entry.created_at.with_timezone(tz);
    let day_label = if tier == Tier::Today {
        config::TODAY_LABEL.to_string()
    } else {
        config::WEEKDAY_NAMES[local.weekday().num_days_from_monday() as usize].to_string()
    };

    EntryCard {
        id: entry.id,
        date: local.format("%d/%m/%Y").to_string(),
        time: local.format("%H:%M").to_string(),
        day_label,
        tier,
        color: tier.color(),
        content: entry.content,
        tags: entry.tags,
    }
}

/// Outcome of saving the diary form
#[derive(Debug, Clone, PartialEq)]
pub enum SavedEntry {
    Added(DiaryEntry),
    Updated(DiaryEntry),
}

impl SavedEntry {
    pub fn message(&self) -> &'static str {
        match self {
            SavedEntry::Added(_) => "Anotação salva com sucesso!",
            SavedEntry::Updated(_) => "Anotação atualizada com sucesso!",
        }
    }

    pub fn entry(&self) -> &DiaryEntry {
        match self {
            SavedEntry::Added(entry) | SavedEntry::Updated(entry) => entry,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImportedEntry {
    content: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Diary panel state and operations
#[derive(Clone)]
pub struct JournalService {
    store: JournalStore,
    editing: Arc<Mutex<Option<i64>>>,
}

impl JournalService {
    pub fn new(store: JournalStore) -> Self {
        Self {
            store,
            editing: Arc::new(Mutex::new(None)),
        }
    }

    pub fn store(&self) -> &JournalStore {
        &self.store
    }

    /// Render every entry as seen on `today` with times in `tz`
    pub async fn render<Tz>(&self, today: NaiveDate, tz: &Tz) -> Result<JournalView>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let entries = self.store.get_all_entries().await?;
        tracing::debug!("Rendering {} diary entries", entries.len());
        Ok(render_journal(entries, today, tz))
    }

    /// Load an entry into the form and remember it as the one being edited
    pub async fn begin_edit(&self, id: i64) -> Result<DiaryEntry> {
        let entry = self.store.get_entry(id).await?;
        *self.editing.lock().await = Some(id);
        Ok(entry)
    }

    pub async fn cancel_edit(&self) {
        *self.editing.lock().await = None;
    }

    pub async fn editing(&self) -> Option<i64> {
        *self.editing.lock().await
    }

    /// Save the form: updates the entry being edited, otherwise adds a new one
    pub async fn save_entry(&self, content: &str, tags: Vec<String>) -> Result<SavedEntry> {
        if content.trim().is_empty() {
            return Err(AppError::Validation(EMPTY_ENTRY_MESSAGE.to_string()));
        }

        let mut editing = self.editing.lock().await;
        let saved = match *editing {
            Some(id) => SavedEntry::Updated(self.store.update_entry(id, content, tags).await?),
            None => SavedEntry::Added(self.store.add_entry(content, tags).await?),
        };
        *editing = None;

        tracing::info!("Diary entry {} saved", saved.entry().id);
        Ok(saved)
    }

    pub async fn delete_entry(&self, id: i64) -> Result<()> {
        self.store.delete_entry(id).await?;

        let mut editing = self.editing.lock().await;
        if *editing == Some(id) {
            *editing = None;
        }

        tracing::info!("Diary entry {} deleted", id);
        Ok(())
    }

    pub async fn clear_all(&self) -> Result<()> {
        self.store.clear_all().await?;
        *self.editing.lock().await = None;
        Ok(())
    }

    pub async fn entries_by_date(&self, date: NaiveDate) -> Result<Vec<DiaryEntry>> {
        self.store.get_entries_by_date(date).await
    }

    pub async fn entries_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DiaryEntry>> {
        self.store.get_entries_by_range(start, end).await
    }

    pub async fn entries_by_tag(&self, tag: &str) -> Result<Vec<DiaryEntry>> {
        self.store.get_entries_by_tag(tag).await
    }

    /// Every entry as an export document
    pub async fn export_document(&self) -> Result<String> {
        let entries = self.store.get_all_entries().await?;
        backup::to_document(&entries)
    }

    /// Replace the diary with the entries of `document`.
    ///
    /// Each imported entry is stored as a new entry made now; only content
    /// and tags are carried over.
    pub async fn import_document(&self, document: &str) -> Result<usize> {
        let imported: Vec<ImportedEntry> = backup::decode_sequence(document)?;
        if let Some(index) = imported.iter().position(|e| e.content.trim().is_empty()) {
            return Err(AppError::InvalidFormat(format!(
                "element {} has empty content",
                index
            )));
        }

        self.clear_all().await?;
        for entry in &imported {
            self.store.add_entry(&entry.content, entry.tags.clone()).await?;
        }

        tracing::info!("Imported {} diary entries", imported.len());
        Ok(imported.len())
    }
}
