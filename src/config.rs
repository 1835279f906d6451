use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Editor mode assumed when the config file names none or an editor that is
/// no longer installed.
pub const DEFAULT_MODE: &str = "insiders";

/// The small persisted record backing the launcher: which projects are pinned
/// and which editor launches them. Rewritten wholesale on every mutation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub pinned: Vec<String>,
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Directory offered as the starting point of the "new project" and
    /// "open path" prompts. Defaults to the home directory when absent.
    #[serde(default)]
    pub projects_dir: Option<String>,
}

fn default_mode() -> String {
    DEFAULT_MODE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pinned: Vec::new(),
            mode: default_mode(),
            projects_dir: None,
        }
    }
}

/// Location of the config file, `<config_dir>/project-launcher/config.json`.
pub fn config_file() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("project-launcher")
        .join("config.json")
}

impl Config {
    /// A missing or unparsable file falls back to defaults; the launcher must
    /// come up even when its own state is damaged.
    pub fn load(path: &Path) -> Self {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Self::default();
        }
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("unreadable config {}: {e}; using defaults", path.display());
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.projects_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(dirs_next::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
