//! Key-value persistence.
//!
//! The engine only needs two string-valued keys, one for [`Settings`] and one
//! for the daily [`PersistedStats`] snapshot. [`KvStore`] is the seam; the CLI
//! plugs in the SQLite-backed [`Database`], tests use [`MemoryStore`].
//!
//! [`Settings`]: crate::timer::Settings

mod config;
pub mod database;
mod memory;
mod stats;

pub use config::AppConfig;
pub use database::Database;
pub use memory::MemoryStore;
pub use stats::PersistedStats;

use std::path::PathBuf;

use crate::error::StoreError;

/// Key of the settings record.
pub const SETTINGS_KEY: &str = "pomodoro-settings";
/// Key of the daily stats snapshot.
pub const STATS_KEY: &str = "pomodoro-stats";

/// String-valued key-value store.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Returns the data directory, creating it if needed.
///
/// `FOCUS_TIMER_DATA_DIR` wins when set. Otherwise `~/.config/focus-timer/`,
/// or `~/.config/focus-timer-dev/` when `FOCUS_TIMER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("FOCUS_TIMER_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUS_TIMER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focus-timer-dev")
            } else {
                base_dir.join("focus-timer")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
