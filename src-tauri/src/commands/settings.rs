//! Settings commands
//!
//! Host base URLs of the two environments and the link behavior.

use super::{notify, report, NotificationKind};
use crate::app::AppState;
use crate::database::Configuration;
use crate::error::Result;
use crate::services::{ConfigInput, LauncherView};
use tauri::{AppHandle, State};

/// Get the current configuration
#[tauri::command]
pub async fn get_config(state: State<'_, AppState>) -> Result<Configuration> {
    Ok(state.launcher()?.config().await)
}

/// Save the configuration and return the re-rendered tiles
#[tauri::command]
pub async fn save_config(
    app: AppHandle,
    state: State<'_, AppState>,
    input: ConfigInput,
) -> Result<LauncherView> {
    let launcher = state.launcher()?;
    report(
        &app,
        launcher.save_config(input).await,
        "Erro ao salvar configurações!",
    )?;

    notify(
        &app,
        "Configurações salvas com sucesso!",
        NotificationKind::Success,
    );
    Ok(launcher.render().await)
}
