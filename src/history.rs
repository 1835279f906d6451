use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Key of the "recently opened" record inside each editor's `state.vscdb`.
pub const HISTORY_KEY: &str = "history.recentlyOpenedPathsList";

/// The serialized record behind [`HISTORY_KEY`]. Editors store more fields
/// than the entry list; the flattened maps keep everything we do not model so
/// a rewrite never loses data the editor still wants.
#[derive(Debug, Serialize, Deserialize)]
struct RecentList {
    #[serde(default)]
    entries: Vec<RecentEntry>,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecentEntry {
    #[serde(rename = "folderUri", skip_serializing_if = "Option::is_none")]
    folder_uri: Option<String>,
    #[serde(rename = "fileUri", skip_serializing_if = "Option::is_none")]
    file_uri: Option<String>,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

impl RecentEntry {
    /// Path identity of this entry, preferring the folder URI. `file://` URIs
    /// become percent-decoded filesystem paths; remote URIs stay opaque.
    /// Entries with an empty or missing URI have no identity.
    fn derived_path(&self) -> Option<String> {
        let uri = self.folder_uri.as_deref().or(self.file_uri.as_deref())?;
        let path = uri_to_path(uri);
        (!path.is_empty()).then_some(path)
    }
}

pub fn uri_to_path(uri: &str) -> String {
    match url::Url::parse(uri) {
        Ok(parsed) if parsed.scheme() == "file" => urlencoding::decode(parsed.path())
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| parsed.path().to_string()),
        _ => uri.to_string(),
    }
}

/// Aggregates and edits the "recently opened" lists of every discovered
/// editor. Each store is opened, used and closed within a single call; no
/// handle outlives an operation.
pub struct HistoryStore {
    sources: Vec<PathBuf>,
}

impl HistoryStore {
    pub fn new(sources: Vec<PathBuf>) -> Self {
        Self { sources }
    }

    /// Scan every source in priority order and merge into one deduplicated,
    /// first-seen-ordered list. A source that cannot be opened or parsed is
    /// skipped, never fatal; fetching opens the stores read-only.
    pub fn fetch_all(&self) -> Vec<String> {
        let mut projects = Vec::new();
        let mut seen = HashSet::new();
        for source in &self.sources {
            match read_source(source) {
                Ok(paths) => {
                    for path in paths {
                        if seen.insert(path.clone()) {
                            projects.push(path);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("skipping history source {}: {e}", source.display());
                }
            }
        }
        projects
    }

    /// Drop every entry matching `path` from every source. Stores without a
    /// match are left untouched, so removing an absent path writes nothing.
    pub fn remove(&self, path: &str) {
        for source in &self.sources {
            if let Err(e) = remove_from_source(source, path) {
                tracing::warn!("could not edit history source {}: {e}", source.display());
            }
        }
    }
}

fn read_source(db: &Path) -> anyhow::Result<Vec<String>> {
    let conn = Connection::open_with_flags(
        db,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let Some(value) = read_record(&conn)? else {
        return Ok(Vec::new());
    };
    let list: RecentList = serde_json::from_str(&value)?;
    Ok(list
        .entries
        .iter()
        .filter_map(RecentEntry::derived_path)
        .collect())
}

fn remove_from_source(db: &Path, path: &str) -> anyhow::Result<()> {
    let conn = Connection::open_with_flags(
        db,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let Some(value) = read_record(&conn)? else {
        return Ok(());
    };
    let mut list: RecentList = serde_json::from_str(&value)?;
    let before = list.entries.len();
    list.entries
        .retain(|entry| entry.derived_path().as_deref() != Some(path));
    if list.entries.len() == before {
        return Ok(());
    }
    let updated = serde_json::to_string(&list)?;
    conn.execute(
        "UPDATE ItemTable SET value = ?1 WHERE key = ?2",
        params![updated, HISTORY_KEY],
    )?;
    Ok(())
}

// The value column is declared BLOB; some editors store text anyway, so
// accept either shape.
fn read_record(conn: &Connection) -> anyhow::Result<Option<String>> {
    let value: Option<SqlValue> = conn
        .query_row(
            "SELECT value FROM ItemTable WHERE key = ?1",
            params![HISTORY_KEY],
            |row| row.get(0),
        )
        .optional()?;
    match value {
        Some(SqlValue::Text(text)) => Ok(Some(text)),
        Some(SqlValue::Blob(bytes)) => Ok(Some(String::from_utf8(bytes)?)),
        _ => Ok(None),
    }
}
