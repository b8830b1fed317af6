// qLauncher - personal launcher with shortcut tiles and a daily journal
// Entry point and application setup

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use qlauncher::{app, commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qlauncher=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting qLauncher");

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            tracing::info!("Running app setup");
            app::setup(app)?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_app_info,
            commands::render_launcher,
            commands::open_shortcut_form,
            commands::edit_shortcut,
            commands::edit_fixed_shortcut,
            commands::close_shortcut_form,
            commands::save_shortcut,
            commands::remove_shortcut,
            commands::clear_shortcuts,
            commands::open_shortcut,
            commands::open_fixed_shortcut,
            commands::get_config,
            commands::save_config,
            commands::render_journal,
            commands::edit_diary_entry,
            commands::cancel_diary_edit,
            commands::save_diary_entry,
            commands::delete_diary_entry,
            commands::clear_diary,
            commands::get_entries_by_date,
            commands::get_entries_by_range,
            commands::get_entries_by_tag,
            commands::export_shortcuts,
            commands::import_shortcuts,
            commands::export_diary,
            commands::import_diary,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
