//! Services module
//!
//! Business logic services that coordinate between commands and the stores.

pub mod backup;
pub mod favicon;
pub mod journal;
pub mod launcher;

pub use backup::{Artifact, BackupService};
pub use journal::{JournalService, JournalView, SavedEntry, Tier};
pub use launcher::{
    ConfigInput, EditMode, LauncherService, LauncherView, SavedShortcut, ShortcutForm,
    ShortcutInput,
};
