//! Journal commands
//!
//! Commands for the diary panel: rendering, the entry form, deletion and
//! lookups by day, day range or tag.

use super::{notify, report, NotificationKind};
use crate::app::AppState;
use crate::database::DiaryEntry;
use crate::error::Result;
use crate::services::JournalView;
use chrono::{Local, NaiveDate, Utc};
use tauri::{AppHandle, State};

/// Render the most recent days; times are shown in local time
#[tauri::command]
pub async fn render_journal(state: State<'_, AppState>) -> Result<JournalView> {
    state
        .journal()?
        .render(Utc::now().date_naive(), &Local)
        .await
}

/// Load an entry into the form for editing
#[tauri::command]
pub async fn edit_diary_entry(
    app: AppHandle,
    state: State<'_, AppState>,
    id: i64,
) -> Result<DiaryEntry> {
    let result = state.journal()?.begin_edit(id).await;
    report(&app, result, "Erro ao carregar anotação!")
}

/// Close the form without saving
#[tauri::command]
pub async fn cancel_diary_edit(state: State<'_, AppState>) -> Result<()> {
    state.journal()?.cancel_edit().await;
    Ok(())
}

/// Save the form as a new entry or as an update of the entry being edited
#[tauri::command]
pub async fn save_diary_entry(
    app: AppHandle,
    state: State<'_, AppState>,
    content: String,
    tags: Option<Vec<String>>,
) -> Result<JournalView> {
    let journal = state.journal()?;
    let saved = report(
        &app,
        journal.save_entry(&content, tags.unwrap_or_default()).await,
        "Erro ao salvar anotação!",
    )?;

    notify(&app, saved.message(), NotificationKind::Success);
    journal.render(Utc::now().date_naive(), &Local).await
}

#[tauri::command]
pub async fn delete_diary_entry(
    app: AppHandle,
    state: State<'_, AppState>,
    id: i64,
) -> Result<JournalView> {
    let journal = state.journal()?;
    report(
        &app,
        journal.delete_entry(id).await,
        "Erro ao remover anotação!",
    )?;

    notify(&app, "Anotação removida com sucesso!", NotificationKind::Success);
    journal.render(Utc::now().date_naive(), &Local).await
}

/// Remove every diary entry
#[tauri::command]
pub async fn clear_diary(app: AppHandle, state: State<'_, AppState>) -> Result<JournalView> {
    let journal = state.journal()?;
    report(&app, journal.clear_all().await, "Erro ao limpar diário!")?;

    notify(&app, "Diário limpo com sucesso!", NotificationKind::Success);
    journal.render(Utc::now().date_naive(), &Local).await
}

#[tauri::command]
pub async fn get_entries_by_date(
    state: State<'_, AppState>,
    date: NaiveDate,
) -> Result<Vec<DiaryEntry>> {
    state.journal()?.entries_by_date(date).await
}

/// Entries dated within `[start, end]`
#[tauri::command]
pub async fn get_entries_by_range(
    state: State<'_, AppState>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DiaryEntry>> {
    state.journal()?.entries_by_range(start, end).await
}

#[tauri::command]
pub async fn get_entries_by_tag(
    state: State<'_, AppState>,
    tag: String,
) -> Result<Vec<DiaryEntry>> {
    state.journal()?.entries_by_tag(&tag).await
}
