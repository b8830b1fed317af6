//! Shortcut commands
//!
//! Commands for the shortcut grid, the fixed environment tiles and the
//! shared shortcut form.

use super::{notify, report, NotificationKind};
use crate::app::AppState;
use crate::config;
use crate::database::{Category, LinkBehavior, SlotType};
use crate::error::{AppError, Result};
use crate::services::{LauncherView, ShortcutForm, ShortcutInput};
use tauri::{AppHandle, Manager, State, WebviewUrl, WebviewWindowBuilder};

/// Render the shortcut grid and fixed tiles
#[tauri::command]
pub async fn render_launcher(state: State<'_, AppState>) -> Result<LauncherView> {
    Ok(state.launcher()?.render().await)
}

/// Open the empty form (the "+" tile or Ctrl+N)
#[tauri::command]
pub async fn open_shortcut_form(state: State<'_, AppState>) -> Result<ShortcutForm> {
    Ok(state.launcher()?.open_new_form().await)
}

/// Open the form pre-filled with the shortcut at `index`
#[tauri::command]
pub async fn edit_shortcut(
    app: AppHandle,
    state: State<'_, AppState>,
    index: usize,
) -> Result<ShortcutForm> {
    let result = state.launcher()?.begin_edit(index).await;
    report(&app, result, "Erro ao carregar atalho!")
}

/// Open the form for a fixed tile's link
#[tauri::command]
pub async fn edit_fixed_shortcut(
    state: State<'_, AppState>,
    category: Category,
    slot_type: SlotType,
) -> Result<ShortcutForm> {
    state
        .launcher()?
        .begin_edit_fixed(category, slot_type)
        .await
}

/// Dismiss the form (close button, backdrop or Escape)
#[tauri::command]
pub async fn close_shortcut_form(state: State<'_, AppState>) -> Result<()> {
    state.launcher()?.close_form().await;
    Ok(())
}

/// Save the form in its current mode and return the refreshed tiles
#[tauri::command]
pub async fn save_shortcut(
    app: AppHandle,
    state: State<'_, AppState>,
    input: ShortcutInput,
) -> Result<LauncherView> {
    let launcher = state.launcher()?;
    let saved = report(&app, launcher.submit(input).await, "Erro ao salvar dados!")?;

    notify(&app, saved.message(), NotificationKind::Success);
    Ok(launcher.render().await)
}

/// Remove the shortcut at `index`
#[tauri::command]
pub async fn remove_shortcut(
    app: AppHandle,
    state: State<'_, AppState>,
    index: usize,
) -> Result<LauncherView> {
    let launcher = state.launcher()?;
    report(&app, launcher.remove(index).await, "Erro ao salvar dados!")?;

    notify(&app, "Atalho removido com sucesso!", NotificationKind::Success);
    Ok(launcher.render().await)
}

/// Remove every shortcut
#[tauri::command]
pub async fn clear_shortcuts(app: AppHandle, state: State<'_, AppState>) -> Result<LauncherView> {
    let launcher = state.launcher()?;
    report(&app, launcher.clear_all().await, "Erro ao salvar dados!")?;

    notify(
        &app,
        "Todos os atalhos foram removidos!",
        NotificationKind::Success,
    );
    Ok(launcher.render().await)
}

/// Open the shortcut at `index` according to the configured link behavior
#[tauri::command]
pub async fn open_shortcut(app: AppHandle, state: State<'_, AppState>, index: usize) -> Result<()> {
    let (link, behavior) = state.launcher()?.open_target(index).await?;
    report(&app, open_link(&app, &link, behavior), "Erro ao abrir atalho!")
}

/// Open a fixed tile according to the configured link behavior
#[tauri::command]
pub async fn open_fixed_shortcut(
    app: AppHandle,
    state: State<'_, AppState>,
    category: Category,
    slot_type: SlotType,
) -> Result<()> {
    let (link, behavior) = state
        .launcher()?
        .fixed_target(category, slot_type)
        .await;
    report(&app, open_link(&app, &link, behavior), "Erro ao abrir atalho!")
}

/// Where a link ends up
#[derive(Debug, Clone, PartialEq)]
enum LinkTarget {
    /// Handed to the system browser
    SystemBrowser(String),
    /// Loaded in the launcher's own browse window
    BrowseWindow(tauri::Url),
}

/// Resolve a link for the configured behavior; same-tab links must parse as URLs
fn link_target(link: &str, behavior: LinkBehavior) -> Result<LinkTarget> {
    match behavior {
        LinkBehavior::New => Ok(LinkTarget::SystemBrowser(link.to_string())),
        LinkBehavior::Same => tauri::Url::parse(link)
            .map(LinkTarget::BrowseWindow)
            .map_err(|e| AppError::Validation(format!("Invalid link {}: {}", link, e))),
    }
}

/// New tab opens the system browser; same tab reuses one browse window so
/// the launcher page itself is never navigated away
fn open_link(app: &AppHandle, link: &str, behavior: LinkBehavior) -> Result<()> {
    tracing::info!("Opening {} ({:?})", link, behavior);

    match link_target(link, behavior)? {
        LinkTarget::SystemBrowser(link) => {
            use tauri_plugin_shell::ShellExt;

            #[allow(deprecated)]
            let opened = app.shell().open(&link, None);
            opened.map_err(|e| AppError::Generic(format!("Failed to open {}: {}", link, e)))
        }
        LinkTarget::BrowseWindow(url) => open_in_browse_window(app, url),
    }
}

fn open_in_browse_window(app: &AppHandle, url: tauri::Url) -> Result<()> {
    if let Some(window) = app.get_webview_window(config::BROWSE_WINDOW_LABEL) {
        if window.is_visible().is_ok() {
            tracing::debug!("Reusing browse window for {}", url);
            window.navigate(url)?;
            let _ = window.unminimize();
            let _ = window.show();
            let _ = window.set_focus();
            return Ok(());
        }
        tracing::debug!("Browse window exists but is invalid, creating a new one");
    }

    let title = url.host_str().unwrap_or("qLauncher").to_string();
    WebviewWindowBuilder::new(app, config::BROWSE_WINDOW_LABEL, WebviewUrl::External(url))
        .title(title)
        .inner_size(config::BROWSE_WINDOW_WIDTH, config::BROWSE_WINDOW_HEIGHT)
        .resizable(true)
        .decorations(true)
        .center()
        .build()?;

    tracing::info!("Browse window created");
    Ok(())
}
