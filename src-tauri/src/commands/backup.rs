//! Backup-related commands
//!
//! Commands for exporting shortcuts and diary entries to dated JSON files
//! and importing them back from a user-selected file.

use super::{notify, report, NotificationKind};
use crate::app::AppState;
use crate::error::Result;
use crate::services::{Artifact, JournalView, LauncherView};
use chrono::{Local, Utc};
use std::path::Path;
use tauri::{AppHandle, State};

/// Export the shortcut list, returning the written file path
#[tauri::command]
pub async fn export_shortcuts(app: AppHandle, state: State<'_, AppState>) -> Result<String> {
    let result = async {
        let document = state.launcher()?.export_document().await?;
        state
            .backup_service
            .write_export(Artifact::Launcher, &document, Utc::now().date_naive())
            .await
    }
    .await;
    let path = report(&app, result, "Erro ao fazer backup!")?;

    notify(&app, "Backup realizado com sucesso!", NotificationKind::Success);
    Ok(path.to_string_lossy().to_string())
}

/// Replace every shortcut with the contents of the file at `path`
#[tauri::command]
pub async fn import_shortcuts(
    app: AppHandle,
    state: State<'_, AppState>,
    path: String,
) -> Result<LauncherView> {
    let launcher = state.launcher()?;
    let result = async {
        let document = state.backup_service.read_document(Path::new(&path)).await?;
        launcher.import_document(&document).await
    }
    .await;
    report(&app, result, "Erro ao importar dados!")?;

    notify(&app, "Dados importados com sucesso!", NotificationKind::Success);
    Ok(launcher.render().await)
}

/// Export all diary entries, returning the written file path
#[tauri::command]
pub async fn export_diary(app: AppHandle, state: State<'_, AppState>) -> Result<String> {
    let result = async {
        let document = state.journal()?.export_document().await?;
        state
            .backup_service
            .write_export(Artifact::Diary, &document, Utc::now().date_naive())
            .await
    }
    .await;
    let path = report(&app, result, "Erro ao exportar diário!")?;

    notify(&app, "Diário exportado com sucesso!", NotificationKind::Success);
    Ok(path.to_string_lossy().to_string())
}

/// Replace the diary with the entries of the file at `path`
#[tauri::command]
pub async fn import_diary(
    app: AppHandle,
    state: State<'_, AppState>,
    path: String,
) -> Result<JournalView> {
    let journal = state.journal()?;
    let result = async {
        let document = state.backup_service.read_document(Path::new(&path)).await?;
        journal.import_document(&document).await
    }
    .await;
    if let Err(e) = &result {
        tracing::error!("Diary import failed: {}", e);
        notify(
            &app,
            format!("Erro ao importar diário: {}", e),
            NotificationKind::Error,
        );
    }
    result?;

    notify(&app, "Diário importado com sucesso!", NotificationKind::Success);
    journal.render(Utc::now().date_naive(), &Local).await
}
