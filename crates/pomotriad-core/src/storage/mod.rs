mod history;
mod settings;
mod store;

pub use history::{SessionHistoryStore, MAX_RETAINED_SESSIONS};
pub use settings::{SettingsMap, SettingsStore, TimerSettings};
pub use store::{keys, Storage};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/pomotriad[-dev]/` based on POMOTRIAD_ENV.
///
/// Set POMOTRIAD_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOTRIAD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomotriad-dev")
    } else {
        base_dir.join("pomotriad")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
