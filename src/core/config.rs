//! Editor configuration — load, save (atomic), best-effort.
//!
//! The only persisted field is the last active workspace, so the next
//! process start can restore it. Persistence failures are absorbed: a
//! missing or corrupt config just means starting from the process's own
//! working directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default config file name, resolved against the process working directory.
pub const CONFIG_FILE: &str = "gopad_config.json";

/// Persisted editor state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Last active workspace root.
    #[serde(default)]
    pub last_workspace: Option<PathBuf>,
}

/// Load the config. Returns None on any failure (absent file, unreadable
/// file, invalid JSON), since persistence is best-effort.
pub fn load(path: &Path) -> Option<EditorConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            debug!("ignoring invalid config {}: {}", path.display(), e);
            None
        }
    }
}

/// The remembered workspace, only if it still names an existing directory.
pub fn restore_workspace(path: &Path) -> Option<PathBuf> {
    let ws = load(path)?.last_workspace?;
    if ws.is_dir() {
        Some(ws)
    } else {
        debug!("remembered workspace {} no longer a directory", ws.display());
        None
    }
}

/// Save the config atomically (write to temp, then rename).
pub fn save(path: &Path, cfg: &EditorConfig) -> Result<(), String> {
    let json = serde_json::to_string_pretty(cfg).map_err(|e| format!("serialize error: {}", e))?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &json)
        .map_err(|e| format!("cannot write {}: {}", tmp_path.display(), e))?;
    std::fs::rename(&tmp_path, path)
        .map_err(|e| format!("cannot rename {} → {}: {}", tmp_path.display(), path.display(), e))?;

    Ok(())
}
