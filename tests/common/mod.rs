#![allow(dead_code)]

use project_launcher::app::App;
use project_launcher::config::Config;
use project_launcher::editors::{Discovery, EditorMode};
use project_launcher::history::HISTORY_KEY;
use project_launcher::ui::{Key, Ui, View};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// Create a `state.vscdb`-shaped store holding one folder entry per URI.
pub fn seed_store(path: &Path, uris: &[&str]) {
    let entries: Vec<serde_json::Value> = uris
        .iter()
        .map(|u| serde_json::json!({ "folderUri": u }))
        .collect();
    let value = serde_json::json!({ "entries": entries }).to_string();
    let conn = Connection::open(path).unwrap();
    conn.execute_batch("CREATE TABLE ItemTable (key TEXT UNIQUE ON CONFLICT REPLACE, value BLOB)")
        .unwrap();
    conn.execute(
        "INSERT INTO ItemTable (key, value) VALUES (?1, ?2)",
        params![HISTORY_KEY, value],
    )
    .unwrap();
}

pub fn mode(id: &str) -> EditorMode {
    EditorMode {
        id: id.to_string(),
        command: format!("{id}-cmd"),
        label: id.to_string(),
    }
}

/// An app over the given stores with two discovered modes, `code` first.
pub fn make_app(sources: Vec<PathBuf>, config: Config, config_path: PathBuf) -> App {
    let discovery = Discovery {
        modes: vec![mode("code"), mode("insiders")],
        sources,
    };
    App::new(discovery, config, config_path)
}

/// Fake renderer feeding a fixed key script; once exhausted it keeps
/// answering `q` so a runaway loop still terminates. Status lines are
/// recorded as they are drawn, since the session clears them on its way out.
pub struct ScriptedUi {
    keys: Vec<Key>,
    pos: usize,
    pub frames: usize,
    pub statuses: Vec<String>,
}

impl ScriptedUi {
    pub fn new(keys: Vec<Key>) -> Self {
        Self {
            keys,
            pos: 0,
            frames: 0,
            statuses: Vec::new(),
        }
    }
}

impl Ui for ScriptedUi {
    fn draw(&mut self, view: &View<'_>) -> anyhow::Result<()> {
        self.frames += 1;
        if let Some(status) = view.status {
            self.statuses.push(status.to_string());
        }
        Ok(())
    }

    fn next_key(&mut self) -> anyhow::Result<Key> {
        let key = self.keys.get(self.pos).copied().unwrap_or(Key::Char('q'));
        self.pos += 1;
        Ok(key)
    }
}
