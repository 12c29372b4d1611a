//! Storage locations for persisted engine data.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the storage directory.
pub const STORAGE_DIR_ENV: &str = "VAULT_AGENT_STORAGE_DIR";

const APP_NAME: &str = "vault-agent";

/// Directory where agent configs and other engine data are stored.
///
/// Uses `VAULT_AGENT_STORAGE_DIR` when set, otherwise the platform data
/// directory:
/// - Linux: `~/.local/share/vault-agent`
/// - macOS: `~/Library/Application Support/vault-agent`
/// - Windows: `%LOCALAPPDATA%\vault-agent`
///
/// The directory is not created here; writers create it on first save.
pub fn storage_dir() -> PathBuf {
    if let Ok(dir) = env::var(STORAGE_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    platform_data_dir().join(APP_NAME)
}

fn platform_data_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        home_dir().join("Library").join("Application Support")
    } else if cfg!(target_os = "windows") {
        env::var("LOCALAPPDATA")
            .or_else(|_| env::var("APPDATA"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir())
    } else {
        env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home_dir().join(".local").join("share"))
    }
}

fn home_dir() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir())
}
