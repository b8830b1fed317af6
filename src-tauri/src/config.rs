//! Application configuration constants
//!
//! Central location for defaults, storage names and presentation
//! constants used throughout the application.

// ===== Storage =====

/// File name of the launcher database (shortcuts, fixed slots, configuration)
pub const LAUNCHER_DB_FILE: &str = "qlauncher.sqlite";

/// File name of the diary database
pub const DIARY_DB_FILE: &str = "diary.sqlite";

/// Key under which the configuration record is stored
pub const CONFIG_RECORD_KEY: &str = "hostConfig";

// ===== Shortcuts =====

/// Tile color used when a shortcut has none
pub const DEFAULT_SHORTCUT_COLOR: &str = "#3B82F6";

/// Icon service queried for shortcut favicons; `{domain}` is replaced by the link host
pub const FAVICON_SERVICE_URL: &str = "https://www.google.com/s2/favicons?domain={domain}&sz=32";

/// Generic icon shown when a link has no usable host
pub const FALLBACK_FAVICON: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMzIiIGhlaWdodD0iMzIiIHZpZXdCb3g9IjAgMCAzMiAzMiIgZmlsbD0ibm9uZSIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj4KPHJlY3Qgd2lkdGg9IjMyIiBoZWlnaHQ9IjMyIiByeD0iNCIgZmlsbD0iIzY2NjY2NiIvPgo8cGF0aCBkPSJNMTYgOEMxOS4zMTM3IDggMjIgMTAuNjg2MyAyMiAxNEMyMiAxNy4zMTM3IDE5LjMxMzcgMjAgMTYgMjBDMTIuNjg2MyAyMCAxMCAxNy4zMTM3IDEwIDE0QzEwIDEwLjY4NjMgMTIuNjg2MyA4IDE2IDhaIiBmaWxsPSJ3aGl0ZSIvPgo8L3N2Zz4=";

/// Icon glyph the page swaps in when a favicon fails to load
pub const FALLBACK_ICON_GLYPH: &str = "fa-globe";

// ===== Fixed slots and hosts =====

/// Default host base URL for the 8.24 environment
pub const DEFAULT_HOST_824: &str = "http://localhost/8.24";

/// Default host base URL for the 8.20 environment
pub const DEFAULT_HOST_820: &str = "http://localhost/8.20";

/// Tile color of 8.24 fixed slots
pub const COLOR_824: &str = "#3B82F6";

/// Tile color of 8.20 fixed slots
pub const COLOR_820: &str = "#1D4ED8";

/// Path appended to the host base URL for "atendente" slots
pub const ATENDENTE_PATH: &str = "/html/index.php";

/// Path appended to the host base URL for "solicitante" slots
pub const SOLICITANTE_PATH: &str = "/html/sys/syssolicitante9/portal/portal.php";

/// Label of the window that "same tab" links open in
pub const BROWSE_WINDOW_LABEL: &str = "browse";

/// Browse window default size
pub const BROWSE_WINDOW_WIDTH: f64 = 1200.0;
pub const BROWSE_WINDOW_HEIGHT: f64 = 800.0;

// ===== Journal =====

/// Number of most recent dates shown in the journal panel
pub const JOURNAL_VISIBLE_DAYS: usize = 3;

/// Label used instead of the weekday for entries of the current day
pub const TODAY_LABEL: &str = "Hoje";

/// pt-BR weekday names, Monday first (chrono's `num_days_from_monday` order)
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Segunda-feira",
    "Terça-feira",
    "Quarta-feira",
    "Quinta-feira",
    "Sexta-feira",
    "Sábado",
    "Domingo",
];

// ===== Backups =====

/// Artifact name used in shortcut export file names
pub const LAUNCHER_BACKUP_PREFIX: &str = "launcher";

/// Artifact name used in diary export file names
pub const DIARY_BACKUP_PREFIX: &str = "diario";

/// Extension of exported documents
pub const BACKUP_EXTENSION: &str = "json";
