//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! Both stores are opened here and their services made available through
//! AppState.

use crate::config;
use crate::database::{JournalStore, LocalStore};
use crate::error::{AppError, Result};
use crate::services::{BackupService, JournalService, LauncherService};
use std::path::PathBuf;
use tauri::{App, Manager};

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    /// `None` when the launcher database could not be opened
    pub launcher: Option<LauncherService>,
    /// `None` when the diary database could not be opened
    pub journal: Option<JournalService>,
    pub backup_service: BackupService,
}

impl AppState {
    /// Open the launcher store and load it, then open the diary store.
    ///
    /// A store that fails to open is logged and left unavailable; the
    /// other one still starts.
    pub async fn initialize(app_data_dir: PathBuf, exports_dir: PathBuf) -> Self {
        let launcher = match LocalStore::initialize(&app_data_dir.join(config::LAUNCHER_DB_FILE)).await
        {
            Ok(store) => Some(LauncherService::load(store).await),
            Err(e) => {
                tracing::error!("Launcher store unavailable: {}", e);
                None
            }
        };

        let journal = match JournalStore::initialize(&app_data_dir.join(config::DIARY_DB_FILE)).await
        {
            Ok(store) => Some(JournalService::new(store)),
            Err(e) => {
                tracing::error!("Journal store unavailable: {}", e);
                None
            }
        };

        Self {
            app_data_dir,
            launcher,
            journal,
            backup_service: BackupService::new(exports_dir),
        }
    }

    pub fn launcher(&self) -> Result<&LauncherService> {
        self.launcher
            .as_ref()
            .ok_or_else(|| AppError::StorageUnavailable("launcher database".to_string()))
    }

    pub fn journal(&self) -> Result<&JournalService> {
        self.journal
            .as_ref()
            .ok_or_else(|| AppError::StorageUnavailable("diary database".to_string()))
    }
}

/// Application setup - called once on startup
pub fn setup(app: &mut App) -> Result<()> {
    tracing::info!("Initializing application");

    // Get app data directory
    let app_data_dir = app
        .path()
        .app_data_dir()
        .map_err(|e| AppError::Generic(format!("Failed to get app data dir: {}", e)))?;

    tracing::info!("App data directory: {:?}", app_data_dir);

    std::fs::create_dir_all(&app_data_dir)?;

    // Exports land in Downloads, like a browser download
    let exports_dir = app.path().download_dir().unwrap_or_else(|e| {
        tracing::warn!("No downloads directory ({}), exporting to app data", e);
        app_data_dir.join("exports")
    });

    let state = tauri::async_runtime::block_on(AppState::initialize(app_data_dir, exports_dir));
    app.manage(state);

    tracing::info!("Application initialized successfully");

    Ok(())
}
