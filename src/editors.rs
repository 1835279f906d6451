use std::path::PathBuf;

/// One known VS Code-family editor: where its config lives, what command
/// launches it and how it is shown in the title bar.
pub struct EditorDef {
    pub id: &'static str,
    pub config_dir: &'static str,
    pub command: &'static str,
    pub label: &'static str,
}

pub const KNOWN_EDITORS: &[EditorDef] = &[
    EditorDef { id: "code", config_dir: "Code", command: "code", label: "VS Code" },
    EditorDef { id: "insiders", config_dir: "Code - Insiders", command: "code-insiders", label: "VS Code Insiders" },
    EditorDef { id: "antigravity", config_dir: "Antigravity", command: "antigravity", label: "Antigravity" },
    EditorDef { id: "cursor", config_dir: "Cursor", command: "cursor", label: "Cursor" },
    EditorDef { id: "vscodium", config_dir: "VSCodium", command: "codium", label: "VSCodium" },
];

/// An editor that can actually be launched on this machine.
#[derive(Debug, Clone)]
pub struct EditorMode {
    pub id: String,
    pub command: String,
    pub label: String,
}

/// Result of the startup scan: the ordered launchable modes and the history
/// store of every editor with state on disk. Computed once and handed to the
/// controller; nothing re-scans at runtime.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub modes: Vec<EditorMode>,
    pub sources: Vec<PathBuf>,
}

impl Discovery {
    pub fn mode(&self, id: &str) -> Option<&EditorMode> {
        self.modes.iter().find(|m| m.id == id)
    }

    /// The mode after `id` in discovery order, wrapping around.
    pub fn next_mode(&self, id: &str) -> &EditorMode {
        let idx = self
            .modes
            .iter()
            .position(|m| m.id == id)
            .map(|i| (i + 1) % self.modes.len())
            .unwrap_or(0);
        &self.modes[idx]
    }
}

/// Walk the known-editor table once. An editor contributes a history source
/// when its `state.vscdb` exists, and a launchable mode when its command
/// resolves on PATH; the two are independent (history from an uninstalled
/// editor is still aggregated).
pub fn discover() -> Discovery {
    let config_root = dirs_next::config_dir().unwrap_or_default();
    let mut modes = Vec::new();
    let mut sources = Vec::new();
    for editor in KNOWN_EDITORS {
        let config_path = config_root.join(editor.config_dir);
        if !config_path.exists() {
            continue;
        }
        let db = config_path
            .join("User")
            .join("globalStorage")
            .join("state.vscdb");
        if db.exists() {
            sources.push(db);
        }
        if find_in_path(editor.command).is_some() {
            modes.push(EditorMode {
                id: editor.id.to_string(),
                command: editor.command.to_string(),
                label: editor.label.to_string(),
            });
        }
    }
    if modes.is_empty() {
        // Nothing launchable was found; keep a stock entry so the session
        // still starts and the user can browse their history.
        tracing::warn!("no editor command found on PATH, assuming plain `code`");
        modes.push(EditorMode {
            id: "code".to_string(),
            command: "code".to_string(),
            label: "VS Code".to_string(),
        });
    }
    Discovery { modes, sources }
}

/// Resolve `command` against the PATH environment variable.
pub fn find_in_path(command: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(command))
        .find(|candidate| candidate.is_file())
}
