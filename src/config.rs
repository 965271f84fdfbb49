use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_TICK_RATE_MS: u64 = 100;

/// User preferences persisted between runs.
///
/// Every field carries a serde default, so a hand-edited file only needs
/// the keys it wants to change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Path to a user quote file; `None` means the bundled collection.
    pub quotes_file: Option<String>,
    /// Render refresh interval while a race is active.
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quotes_file: None,
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
        }
    }
}

impl Config {
    /// Platform config file location, with a working-directory fallback
    /// when the platform dirs cannot be resolved.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "typerace")
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("typerace_config.json"))
    }

    /// Reads preferences from `path`. A missing or unparseable file means
    /// defaults; preferences are never worth refusing to start over.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        fs::read(path.as_ref())
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self).map_err(io::Error::other)?;
        fs::write(path, data)
    }
}
