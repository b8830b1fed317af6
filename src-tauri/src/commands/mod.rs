//! Tauri commands exposed to the frontend
//!
//! This module organizes commands into logical submodules:
//! - `shortcuts`: Shortcut grid, fixed slots and the shared form
//! - `settings`: Host configuration and link behavior
//! - `journal`: Diary panel
//! - `backup`: Export and import of shortcuts and diary entries

pub mod backup;
pub mod journal;
pub mod settings;
pub mod shortcuts;

use crate::app::AppState;
use crate::error::Result;
use serde::Serialize;
use tauri::{AppHandle, Emitter, State};

// Re-export all commands for convenient registration in main.rs
pub use backup::*;
pub use journal::*;
pub use settings::*;
pub use shortcuts::*;

/// Event carrying transient notifications for the page
pub const NOTIFICATION_EVENT: &str = "notification";

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Show a transient notification in the page
pub fn notify(app: &AppHandle, message: impl Into<String>, kind: NotificationKind) {
    let payload = Notification {
        message: message.into(),
        kind,
    };
    if let Err(e) = app.emit(NOTIFICATION_EVENT, &payload) {
        tracing::warn!("Failed to emit notification event: {}", e);
    }
}

/// Log a failed action and tell the user, passing the result through.
///
/// Validation failures are shown verbatim; anything else gets `failure`.
pub(crate) fn report<T>(app: &AppHandle, result: Result<T>, failure: &str) -> Result<T> {
    if let Err(e) = &result {
        tracing::error!("{}: {}", failure, e);
        let message = match e {
            crate::error::AppError::Validation(message) => message.clone(),
            _ => failure.to_string(),
        };
        notify(app, message, NotificationKind::Error);
    }
    result
}

// ===== General Commands =====

/// Get application information
#[tauri::command]
pub async fn get_app_info(state: State<'_, AppState>) -> Result<AppInfo> {
    Ok(AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_data_dir: state.app_data_dir.to_string_lossy().to_string(),
        launcher_available: state.launcher.is_some(),
        journal_available: state.journal.is_some(),
    })
}

/// Application information structure
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub version: String,
    pub app_data_dir: String,
    pub launcher_available: bool,
    pub journal_available: bool,
}
