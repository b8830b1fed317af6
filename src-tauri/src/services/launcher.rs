//! Launcher service
//!
//! Owns the in-memory launcher state (shortcuts, fixed slots,
//! configuration and the shared form's edit mode), persists it through the
//! local store and renders it into view models for the page.

use super::backup;
use super::favicon::favicon_url;
use crate::config;
use crate::database::{
    default_fixed_shortcuts, Category, Configuration, FixedShortcuts, FixedSlot, IdClock,
    LinkBehavior, LocalStore, Shortcut, SlotType,
};
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

const MISSING_FIELDS_MESSAGE: &str = "Por favor, preencha o título e o link.";
const INVALID_URL_MESSAGE: &str = "Por favor, insira uma URL válida.";

/// What the shared shortcut form is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Creating a new shortcut
    #[default]
    New,
    /// Editing the shortcut at this list position
    EditingShortcut(usize),
    /// Editing the link of a fixed slot
    EditingFixedSlot(Category, SlotType),
}

/// Everything the launcher page shows, held in one place
#[derive(Debug, Clone, Default)]
pub struct LauncherState {
    shortcuts: Vec<Shortcut>,
    fixed: FixedShortcuts,
    config: Configuration,
    edit_mode: EditMode,
}

impl LauncherState {
    pub fn new(shortcuts: Vec<Shortcut>, fixed: FixedShortcuts, config: Configuration) -> Self {
        Self {
            shortcuts,
            fixed,
            config,
            edit_mode: EditMode::New,
        }
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    /// Link a fixed tile opens: the user's link once edited, otherwise the configured host
    pub fn fixed_link(&self, category: Category, slot_type: SlotType) -> String {
        match self.fixed.get(&category).and_then(|types| types.get(&slot_type)) {
            Some(slot) if slot.updated_at.is_some() => slot.link.clone(),
            _ => self.config.slot_link(category, slot_type),
        }
    }
}

/// A shortcut tile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutTile {
    pub index: usize,
    pub id: i64,
    pub title: String,
    pub link: String,
    pub background_color: String,
    pub favicon_url: String,
    pub fallback_icon: &'static str,
    pub open_in_new_tab: bool,
}

/// One cell of the shortcut grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GridItem {
    /// The "+" affordance opening the empty form
    AddButton,
    Shortcut(ShortcutTile),
}

/// A fixed environment tile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedTile {
    pub category: Category,
    pub slot_type: SlotType,
    pub title: String,
    pub link: String,
    pub color: String,
    pub open_in_new_tab: bool,
}

/// The rendered launcher page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherView {
    pub grid: Vec<GridItem>,
    pub fixed: Vec<FixedTile>,
    pub config: Configuration,
}

/// Contents of the shared shortcut form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutForm {
    pub heading: String,
    pub title: String,
    pub link: String,
    pub color: String,
    /// Title and color inputs are hidden while editing a fixed slot
    pub show_details: bool,
}

/// Values submitted from the shortcut form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub color: String,
}

/// Values submitted from the configuration form; blanks fall back to defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInput {
    #[serde(rename = "8.24", default)]
    pub host_824: String,
    #[serde(rename = "8.20", default)]
    pub host_820: String,
    #[serde(default)]
    pub link_behavior: Option<LinkBehavior>,
}

/// Result of submitting the shortcut form
#[derive(Debug, Clone, PartialEq)]
pub enum SavedShortcut {
    Added(Shortcut),
    Edited(Shortcut),
    FixedSlotEdited(Category, SlotType),
}

impl SavedShortcut {
    /// Notification text for the page
    pub fn message(&self) -> &'static str {
        match self {
            SavedShortcut::Added(_) => "Atalho adicionado com sucesso!",
            SavedShortcut::Edited(_) => "Atalho editado com sucesso!",
            SavedShortcut::FixedSlotEdited(..) => "URL do atalho fixo editada com sucesso!",
        }
    }
}

/// Shortcut as found in an import document; missing fields take defaults
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedShortcut {
    id: Option<i64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    color: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

/// Render the grid: the "+" affordance first, then every shortcut in order
pub fn render_grid(state: &LauncherState) -> Vec<GridItem> {
    let open_in_new_tab = state.config.link_behavior == LinkBehavior::New;

    std::iter::once(GridItem::AddButton)
        .chain(state.shortcuts.iter().enumerate().map(|(index, shortcut)| {
            GridItem::Shortcut(ShortcutTile {
                index,
                id: shortcut.id,
                title: shortcut.title.clone(),
                link: shortcut.link.clone(),
                background_color: color_or_default(&shortcut.color),
                favicon_url: favicon_url(&shortcut.link),
                fallback_icon: config::FALLBACK_ICON_GLYPH,
                open_in_new_tab,
            })
        }))
        .collect()
}

/// Render the four fixed tiles, 8.24 first
pub fn render_fixed(state: &LauncherState) -> Vec<FixedTile> {
    let open_in_new_tab = state.config.link_behavior == LinkBehavior::New;

    [Category::V824, Category::V820]
        .into_iter()
        .flat_map(|category| SlotType::ALL.into_iter().map(move |slot_type| (category, slot_type)))
        .map(|(category, slot_type)| FixedTile {
            category,
            slot_type,
            title: slot_type.title().to_string(),
            link: state.fixed_link(category, slot_type),
            color: category.color().to_string(),
            open_in_new_tab,
        })
        .collect()
}

fn new_form() -> ShortcutForm {
    ShortcutForm {
        heading: "Adicionar Atalho".to_string(),
        title: String::new(),
        link: String::new(),
        color: config::DEFAULT_SHORTCUT_COLOR.to_string(),
        show_details: true,
    }
}

/// Form contents for the given mode
pub fn form_for(state: &LauncherState, mode: EditMode) -> Result<ShortcutForm> {
    match mode {
        EditMode::New => Ok(new_form()),
        EditMode::EditingShortcut(index) => {
            let shortcut = state
                .shortcuts
                .get(index)
                .ok_or_else(|| AppError::NotFound(format!("shortcut at position {}", index)))?;
            Ok(ShortcutForm {
                heading: "Editar Atalho".to_string(),
                title: shortcut.title.clone(),
                link: shortcut.link.clone(),
                color: color_or_default(&shortcut.color),
                show_details: true,
            })
        }
        EditMode::EditingFixedSlot(category, slot_type) => Ok(ShortcutForm {
            heading: format!("Editar {} - {}", category, slot_type),
            title: slot_type.title().to_string(),
            link: state.fixed_link(category, slot_type),
            color: category.color().to_string(),
            show_details: false,
        }),
    }
}

/// Check that `link` is an absolute URL
pub fn validate_link(link: &str) -> Result<()> {
    Url::parse(link)
        .map(|_| ())
        .map_err(|_| AppError::Validation(INVALID_URL_MESSAGE.to_string()))
}

fn validate_shortcut(title: &str, link: &str) -> Result<()> {
    if title.is_empty() || link.is_empty() {
        return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    }
    validate_link(link)
}

fn color_or_default(color: &str) -> String {
    if color.trim().is_empty() {
        config::DEFAULT_SHORTCUT_COLOR.to_string()
    } else {
        color.to_string()
    }
}

/// Ensure all four fixed slots exist, filling gaps from the defaults
fn complete_fixed(mut fixed: FixedShortcuts) -> (FixedShortcuts, bool) {
    let mut filled = false;
    for (category, types) in default_fixed_shortcuts() {
        for (slot_type, slot) in types {
            let existing = fixed.entry(category).or_default();
            if !existing.contains_key(&slot_type) {
                existing.insert(slot_type, slot);
                filled = true;
            }
        }
    }
    (fixed, filled)
}

/// Service for the shortcut grid, fixed slots and configuration
#[derive(Clone)]
pub struct LauncherService {
    store: LocalStore,
    state: Arc<Mutex<LauncherState>>,
    ids: Arc<IdClock>,
}

impl LauncherService {
    /// Load shortcuts, fixed slots and configuration, in that order.
    ///
    /// A partition that fails to load is logged and replaced by its empty
    /// or default value; missing fixed slots and a missing configuration
    /// are written back with defaults.
    pub async fn load(store: LocalStore) -> Self {
        let shortcuts = match store.load_shortcuts().await {
            Ok(shortcuts) => shortcuts,
            Err(e) => {
                tracing::error!("Failed to load shortcuts: {}", e);
                Vec::new()
            }
        };

        let fixed = match store.load_fixed_shortcuts().await {
            Ok(fixed) => {
                let (fixed, filled) = complete_fixed(fixed);
                if filled {
                    tracing::info!("Writing default fixed shortcuts");
                    if let Err(e) = store.save_fixed_shortcuts(&fixed).await {
                        tracing::error!("Failed to save default fixed shortcuts: {}", e);
                    }
                }
                fixed
            }
            Err(e) => {
                tracing::error!("Failed to load fixed shortcuts: {}", e);
                default_fixed_shortcuts()
            }
        };

        let config = match store.load_config().await {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::info!("No configuration stored, writing defaults");
                let config = Configuration::default();
                if let Err(e) = store.save_config(&config).await {
                    tracing::error!("Failed to save default configuration: {}", e);
                }
                config
            }
            Err(e) => {
                tracing::error!("Failed to load configuration: {}", e);
                Configuration::default()
            }
        };

        let last_id = match store.max_shortcut_id().await {
            Ok(id) => id.unwrap_or(0),
            Err(e) => {
                tracing::warn!("Failed to read the last shortcut id: {}", e);
                shortcuts.iter().map(|s| s.id).max().unwrap_or(0)
            }
        };
        let ids = IdClock::starting_after(last_id);

        tracing::info!("Launcher loaded with {} shortcuts", shortcuts.len());

        Self {
            store,
            state: Arc::new(Mutex::new(LauncherState::new(shortcuts, fixed, config))),
            ids: Arc::new(ids),
        }
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> LauncherState {
        self.state.lock().await.clone()
    }

    pub async fn shortcuts(&self) -> Vec<Shortcut> {
        self.state.lock().await.shortcuts.clone()
    }

    pub async fn config(&self) -> Configuration {
        self.state.lock().await.config.clone()
    }

    /// Render tiles for the page
    pub async fn render(&self) -> LauncherView {
        let state = self.state.lock().await;
        let view = LauncherView {
            grid: render_grid(&state),
            fixed: render_fixed(&state),
            config: state.config.clone(),
        };
        tracing::debug!("Rendered {} shortcuts", state.shortcuts.len());
        view
    }

    /// Open the empty form for a new shortcut
    pub async fn open_new_form(&self) -> ShortcutForm {
        self.state.lock().await.edit_mode = EditMode::New;
        new_form()
    }

    /// Open the form pre-filled with the shortcut at `index`
    pub async fn begin_edit(&self, index: usize) -> Result<ShortcutForm> {
        self.set_mode(EditMode::EditingShortcut(index)).await
    }

    /// Open the form for a fixed slot's link
    pub async fn begin_edit_fixed(
        &self,
        category: Category,
        slot_type: SlotType,
    ) -> Result<ShortcutForm> {
        self.set_mode(EditMode::EditingFixedSlot(category, slot_type))
            .await
    }

    /// Close the form, returning to new-shortcut mode
    pub async fn close_form(&self) {
        self.state.lock().await.edit_mode = EditMode::New;
    }

    async fn set_mode(&self, mode: EditMode) -> Result<ShortcutForm> {
        let mut state = self.state.lock().await;
        let form = form_for(&state, mode)?;
        state.edit_mode = mode;
        Ok(form)
    }

    /// Save the form according to the current edit mode
    pub async fn submit(&self, input: ShortcutInput) -> Result<SavedShortcut> {
        let mut state = self.state.lock().await;

        let title = input.title.trim().to_string();
        let link = input.link.trim().to_string();
        let color = color_or_default(&input.color);
        let now = Utc::now();

        let saved = match state.edit_mode {
            EditMode::EditingFixedSlot(category, slot_type) => {
                if link.is_empty() {
                    return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
                }
                validate_link(&link)?;

                let mut fixed = state.fixed.clone();
                let mut slot = FixedSlot::derived(category, slot_type, link);
                slot.updated_at = Some(now);
                fixed.entry(category).or_default().insert(slot_type, slot);

                self.store.save_fixed_shortcuts(&fixed).await?;
                state.fixed = fixed;

                tracing::info!("Fixed shortcut {} {} updated", category, slot_type);
                SavedShortcut::FixedSlotEdited(category, slot_type)
            }
            EditMode::EditingShortcut(index) => {
                validate_shortcut(&title, &link)?;

                let mut shortcuts = state.shortcuts.clone();
                let shortcut = shortcuts
                    .get_mut(index)
                    .ok_or_else(|| AppError::NotFound(format!("shortcut at position {}", index)))?;
                shortcut.title = title;
                shortcut.link = link;
                shortcut.color = color;
                shortcut.updated_at = Some(now);
                let edited = shortcut.clone();

                self.store.save_shortcuts(&shortcuts).await?;
                state.shortcuts = shortcuts;

                tracing::info!("Shortcut {} edited", edited.id);
                SavedShortcut::Edited(edited)
            }
            EditMode::New => {
                validate_shortcut(&title, &link)?;

                let shortcut = Shortcut {
                    id: self.ids.next(),
                    title,
                    link,
                    color,
                    created_at: now,
                    updated_at: Some(now),
                };
                let mut shortcuts = state.shortcuts.clone();
                shortcuts.push(shortcut.clone());

                self.store.save_shortcuts(&shortcuts).await?;
                state.shortcuts = shortcuts;

                tracing::info!("Shortcut {} added: {}", shortcut.id, shortcut.title);
                SavedShortcut::Added(shortcut)
            }
        };

        state.edit_mode = EditMode::New;
        Ok(saved)
    }

    /// Remove the shortcut at `index`
    pub async fn remove(&self, index: usize) -> Result<Shortcut> {
        let mut state = self.state.lock().await;

        if index >= state.shortcuts.len() {
            return Err(AppError::NotFound(format!("shortcut at position {}", index)));
        }
        let mut shortcuts = state.shortcuts.clone();
        let removed = shortcuts.remove(index);

        self.store.save_shortcuts(&shortcuts).await?;
        state.shortcuts = shortcuts;
        // Positions shifted; an open edit form no longer points at the same shortcut
        state.edit_mode = EditMode::New;

        tracing::info!("Shortcut {} removed", removed.id);
        Ok(removed)
    }

    /// Remove every free-form shortcut
    pub async fn clear_all(&self) -> Result<()> {
        let mut state = self.state.lock().await;

        self.store.save_shortcuts(&[]).await?;
        state.shortcuts.clear();
        state.edit_mode = EditMode::New;

        tracing::info!("All shortcuts removed");
        Ok(())
    }

    /// Link and behavior used to open the tile at `index`
    pub async fn open_target(&self, index: usize) -> Result<(String, LinkBehavior)> {
        let state = self.state.lock().await;
        let shortcut = state
            .shortcuts
            .get(index)
            .ok_or_else(|| AppError::NotFound(format!("shortcut at position {}", index)))?;
        Ok((shortcut.link.clone(), state.config.link_behavior))
    }

    /// Link and behavior used to open a fixed tile
    pub async fn fixed_target(&self, category: Category, slot_type: SlotType) -> (String, LinkBehavior) {
        let state = self.state.lock().await;
        (state.fixed_link(category, slot_type), state.config.link_behavior)
    }

    /// Overwrite the configuration; blank hosts revert to their defaults
    pub async fn save_config(&self, input: ConfigInput) -> Result<Configuration> {
        let mut state = self.state.lock().await;

        let defaults = Configuration::default();
        let host = |value: &str, default: String| {
            let value = value.trim();
            if value.is_empty() {
                default
            } else {
                value.to_string()
            }
        };
        let config = Configuration {
            host_824: host(&input.host_824, defaults.host_824),
            host_820: host(&input.host_820, defaults.host_820),
            link_behavior: input.link_behavior.unwrap_or_default(),
        };

        self.store.save_config(&config).await?;
        state.config = config.clone();

        tracing::info!("Configuration saved: {:?}", config);
        Ok(config)
    }

    /// The shortcut list as an export document
    pub async fn export_document(&self) -> Result<String> {
        let state = self.state.lock().await;
        backup::to_document(&state.shortcuts)
    }

    /// Replace every shortcut with the contents of `document`.
    ///
    /// Records keep their id and timestamps; the store is untouched when
    /// the document is rejected.
    pub async fn import_document(&self, document: &str) -> Result<usize> {
        let imported: Vec<ImportedShortcut> = backup::decode_sequence(document)?;

        let now = Utc::now();
        let mut seen = HashSet::new();
        let mut shortcuts = Vec::with_capacity(imported.len());
        for item in imported {
            let id = item.id.unwrap_or_else(|| self.ids.next());
            if !seen.insert(id) {
                return Err(AppError::InvalidFormat(format!(
                    "shortcut id {} appears more than once",
                    id
                )));
            }
            self.ids.observe(id);
            shortcuts.push(Shortcut {
                id,
                title: item.title,
                link: item.link,
                color: item.color.unwrap_or_default(),
                created_at: item.created_at.unwrap_or(now),
                updated_at: item.updated_at,
            });
        }

        let mut state = self.state.lock().await;
        self.store.save_shortcuts(&shortcuts).await?;
        let count = shortcuts.len();
        state.shortcuts = shortcuts;
        state.edit_mode = EditMode::New;

        tracing::info!("Imported {} shortcuts", count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{initialize_database, PartitionStore, LAUNCHER_SCHEMA};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_store() -> LocalStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool, &LAUNCHER_SCHEMA).await.unwrap();

        LocalStore::new(PartitionStore::new(pool))
    }

    async fn create_test_service() -> (LauncherService, LocalStore) {
        let store = create_test_store().await;
        let service = LauncherService::load(store.clone()).await;
        (service, store)
    }

    fn input(title: &str, link: &str, color: &str) -> ShortcutInput {
        ShortcutInput {
            title: title.to_string(),
            link: link.to_string(),
            color: color.to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_load_writes_defaults() {
        let (service, store) = create_test_service().await;

        let state = service.state().await;
        assert!(state.shortcuts().is_empty());
        assert_eq!(state.edit_mode(), EditMode::New);

        let fixed = store.load_fixed_shortcuts().await.unwrap();
        assert_eq!(fixed, default_fixed_shortcuts());
        assert_eq!(
            store.load_config().await.unwrap(),
            Some(Configuration::default())
        );
    }

    #[tokio::test]
    async fn test_add_then_load() {
        let (service, store) = create_test_service().await;
        service.open_new_form().await;

        let saved = service
            .submit(input(" Docs ", "https://docs.rs", "#F59E0B"))
            .await
            .unwrap();
        assert_eq!(saved.message(), "Atalho adicionado com sucesso!");

        let loaded = store.load_shortcuts().await.unwrap();
        assert_eq!(loaded.len(), 1);
        let shortcut = &loaded[0];
        assert_eq!(shortcut.title, "Docs");
        assert_eq!(shortcut.link, "https://docs.rs");
        assert_eq!(shortcut.color, "#F59E0B");
        assert!(shortcut.id > 0);
        assert!(shortcut.updated_at.map_or(false, |u| shortcut.created_at <= u));
    }

    #[tokio::test]
    async fn test_add_assigns_unique_ids() {
        let (service, store) = create_test_service().await;

        for i in 0..5 {
            service
                .submit(input(&format!("Site {}", i), "https://example.com", ""))
                .await
                .unwrap();
        }

        let loaded = store.load_shortcuts().await.unwrap();
        let ids: HashSet<i64> = loaded.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 5);
        assert!(loaded.iter().all(|s| s.color == config::DEFAULT_SHORTCUT_COLOR));
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let (service, store) = create_test_service().await;

        let missing = service.submit(input("", "https://docs.rs", "")).await;
        assert!(matches!(missing, Err(AppError::Validation(_))));

        let invalid = service.submit(input("Docs", "docs dot rs", "")).await;
        assert!(matches!(invalid, Err(AppError::Validation(ref m)) if m == INVALID_URL_MESSAGE));

        assert!(store.load_shortcuts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_shortcut() {
        let (service, store) = create_test_service().await;
        let SavedShortcut::Added(original) = service
            .submit(input("Docs", "https://docs.rs", "#000000"))
            .await
            .unwrap()
        else {
            panic!("expected an added shortcut");
        };

        let form = service.begin_edit(0).await.unwrap();
        assert_eq!(form.heading, "Editar Atalho");
        assert_eq!(form.title, "Docs");
        assert_eq!(service.state().await.edit_mode(), EditMode::EditingShortcut(0));

        service
            .submit(input("Rust Docs", "https://doc.rust-lang.org", "#FFFFFF"))
            .await
            .unwrap();

        let loaded = store.load_shortcuts().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, original.id);
        assert_eq!(loaded[0].created_at, original.created_at);
        assert_eq!(loaded[0].title, "Rust Docs");
        assert_eq!(service.state().await.edit_mode(), EditMode::New);
    }

    #[tokio::test]
    async fn test_begin_edit_out_of_range() {
        let (service, _store) = create_test_service().await;

        let result = service.begin_edit(3).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(service.state().await.edit_mode(), EditMode::New);
    }

    #[tokio::test]
    async fn test_edit_fixed_slot_only_changes_link() {
        let (service, store) = create_test_service().await;

        let form = service
            .begin_edit_fixed(Category::V820, SlotType::Atendente)
            .await
            .unwrap();
        assert_eq!(form.heading, "Editar 8.20 - atendente");
        assert!(!form.show_details);

        // Title and color in the input are ignored for fixed slots
        let saved = service
            .submit(input("", "http://intranet/8.20/login.php", "#FF0000"))
            .await
            .unwrap();
        assert_eq!(
            saved,
            SavedShortcut::FixedSlotEdited(Category::V820, SlotType::Atendente)
        );

        let fixed = store.load_fixed_shortcuts().await.unwrap();
        let slot = &fixed[&Category::V820][&SlotType::Atendente];
        assert_eq!(slot.link, "http://intranet/8.20/login.php");
        assert_eq!(slot.title, "Atendente");
        assert_eq!(slot.color, "#1D4ED8");
        assert!(slot.updated_at.is_some());

        let count: usize = fixed.values().map(|t| t.len()).sum();
        assert_eq!(count, 4);
        assert!(store.load_shortcuts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_close_form_resets_mode() {
        let (service, _store) = create_test_service().await;

        service
            .begin_edit_fixed(Category::V824, SlotType::Solicitante)
            .await
            .unwrap();
        service.close_form().await;

        assert_eq!(service.state().await.edit_mode(), EditMode::New);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let (service, store) = create_test_service().await;
        for title in ["A", "B", "C"] {
            service
                .submit(input(title, "https://example.com", ""))
                .await
                .unwrap();
        }

        let removed = service.remove(1).await.unwrap();
        assert_eq!(removed.title, "B");
        let titles: Vec<String> = store
            .load_shortcuts()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["A", "C"]);

        assert!(matches!(service.remove(7).await, Err(AppError::NotFound(_))));

        service.clear_all().await.unwrap();
        assert!(store.load_shortcuts().await.unwrap().is_empty());
        assert!(service.shortcuts().await.is_empty());
    }

    #[tokio::test]
    async fn test_render_grid_starts_with_add_button() {
        let (service, _store) = create_test_service().await;
        service
            .submit(input("GitHub", "https://github.com", ""))
            .await
            .unwrap();

        let view = service.render().await;

        assert_eq!(view.grid.len(), 2);
        assert_eq!(view.grid[0], GridItem::AddButton);
        let GridItem::Shortcut(tile) = &view.grid[1] else {
            panic!("expected a shortcut tile");
        };
        assert_eq!(tile.index, 0);
        assert_eq!(tile.background_color, config::DEFAULT_SHORTCUT_COLOR);
        assert_eq!(
            tile.favicon_url,
            "https://www.google.com/s2/favicons?domain=github.com&sz=32"
        );
        assert!(!tile.open_in_new_tab);
        assert_eq!(view.fixed.len(), 4);
    }

    #[tokio::test]
    async fn test_config_drives_tiles() {
        let (service, store) = create_test_service().await;
        service
            .submit(input("GitHub", "https://github.com", ""))
            .await
            .unwrap();

        let config = service
            .save_config(ConfigInput {
                host_824: "http://server:8080/8.24/".to_string(),
                host_820: "  ".to_string(),
                link_behavior: Some(LinkBehavior::New),
            })
            .await
            .unwrap();
        assert_eq!(config.host_820, config::DEFAULT_HOST_820);
        assert_eq!(store.load_config().await.unwrap(), Some(config));

        let view = service.render().await;
        assert!(view.fixed.iter().all(|tile| tile.open_in_new_tab));
        let GridItem::Shortcut(tile) = &view.grid[1] else {
            panic!("expected a shortcut tile");
        };
        assert!(tile.open_in_new_tab);

        let atendente = &view.fixed[0];
        assert_eq!(atendente.category, Category::V824);
        assert_eq!(atendente.link, "http://server:8080/8.24/html/index.php");
    }

    #[tokio::test]
    async fn test_edited_fixed_slot_ignores_host_changes() {
        let (service, _store) = create_test_service().await;
        service
            .begin_edit_fixed(Category::V824, SlotType::Atendente)
            .await
            .unwrap();
        service
            .submit(input("", "http://custom/login.php", ""))
            .await
            .unwrap();

        service
            .save_config(ConfigInput {
                host_824: "http://elsewhere/8.24".to_string(),
                ..ConfigInput::default()
            })
            .await
            .unwrap();

        let (link, behavior) = service
            .fixed_target(Category::V824, SlotType::Atendente)
            .await;
        assert_eq!(link, "http://custom/login.php");
        assert_eq!(behavior, LinkBehavior::Same);

        let (other, _) = service
            .fixed_target(Category::V824, SlotType::Solicitante)
            .await;
        assert!(other.starts_with("http://elsewhere/8.24"));
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let (service, _store) = create_test_service().await;
        for (title, link) in [("Docs", "https://docs.rs"), ("Crates", "https://crates.io")] {
            service.submit(input(title, link, "#123456")).await.unwrap();
        }
        let before = service.shortcuts().await;
        let document = service.export_document().await.unwrap();

        service.clear_all().await.unwrap();
        let count = service.import_document(&document).await.unwrap();

        assert_eq!(count, 2);
        let after = service.shortcuts().await;
        for (a, b) in before.iter().zip(after.iter()) {
            assert_eq!(a.title, b.title);
            assert_eq!(a.link, b.link);
            assert_eq!(a.color, b.color);
            assert_eq!(a.created_at, b.created_at);
        }
    }

    #[tokio::test]
    async fn test_import_non_array_leaves_store_untouched() {
        let (service, store) = create_test_service().await;
        service
            .submit(input("Docs", "https://docs.rs", ""))
            .await
            .unwrap();

        let result = service
            .import_document(r#"{"title":"Single","link":"https://x.dev"}"#)
            .await;

        assert!(matches!(result, Err(AppError::InvalidFormat(_))));
        assert_eq!(store.load_shortcuts().await.unwrap().len(), 1);
        assert_eq!(service.shortcuts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_imported_order_survives_reload() {
        let (service, store) = create_test_service().await;

        let document = r#"[
            {"id": 50, "title": "First", "link": "https://first.dev"},
            {"id": 10, "title": "Second", "link": "https://second.dev"},
            {"id": 30, "title": "Third", "link": "https://third.dev"}
        ]"#;
        service.import_document(document).await.unwrap();

        let reloaded = LauncherService::load(store).await;
        let titles: Vec<String> = reloaded
            .shortcuts()
            .await
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);

        // Positions address the same tiles after the reload
        let form = reloaded.begin_edit(1).await.unwrap();
        assert_eq!(form.title, "Second");
    }

    #[tokio::test]
    async fn test_import_rejects_duplicate_ids() {
        let (service, store) = create_test_service().await;
        service
            .submit(input("Docs", "https://docs.rs", ""))
            .await
            .unwrap();

        let document = r#"[
            {"id": 1, "title": "A", "link": "https://a.dev"},
            {"id": 1, "title": "B", "link": "https://b.dev"}
        ]"#;
        let result = service.import_document(document).await;

        assert!(matches!(result, Err(AppError::InvalidFormat(_))));
        assert_eq!(store.load_shortcuts().await.unwrap()[0].title, "Docs");
    }

    #[tokio::test]
    async fn test_import_fills_missing_fields() {
        let (service, _store) = create_test_service().await;

        service
            .import_document(r#"[{"title": "Bare", "link": "https://bare.dev"}]"#)
            .await
            .unwrap();

        let shortcuts = service.shortcuts().await;
        assert_eq!(shortcuts.len(), 1);
        assert!(shortcuts[0].id > 0);
        assert!(shortcuts[0].updated_at.is_none());

        let view = service.render().await;
        let GridItem::Shortcut(tile) = &view.grid[1] else {
            panic!("expected a shortcut tile");
        };
        assert_eq!(tile.background_color, config::DEFAULT_SHORTCUT_COLOR);
    }
}
