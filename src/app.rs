use std::collections::HashSet;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::config::Config;
use crate::editors::Discovery;
use crate::fuzzy;
use crate::history::HistoryStore;
use crate::input::{Prompt, PromptOutcome};
use crate::launch;
use crate::ui::{Key, PromptView, Row, Ui, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiMode {
    Normal,
    Search,
}

/// What a key press decided. The run loop acts on it; the handler itself
/// never spawns processes or blocks, which keeps transitions testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    /// Start the interactive "new project" prompt flow.
    NewProject,
    /// Start the interactive "open path" prompt flow.
    OpenPath,
    Launch(LaunchRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchRequest {
    Editor { command: String, path: String },
    Terminal { path: String },
}

/// The modal session state machine. Owns the project list, the selection
/// cursor, the search buffer, the pin set and the active editor mode; every
/// key event funnels through [`App::handle_key`].
pub struct App {
    discovery: Discovery,
    history: HistoryStore,
    config: Config,
    config_path: PathBuf,
    pinned: HashSet<String>,
    mode: String,
    projects: Vec<String>,
    selected: usize,
    ui_mode: UiMode,
    search: String,
    status: Option<String>,
}

impl App {
    pub fn new(discovery: Discovery, config: Config, config_path: PathBuf) -> Self {
        let pinned: HashSet<String> = config.pinned.iter().cloned().collect();
        let mode = if discovery.mode(&config.mode).is_some() {
            config.mode.clone()
        } else {
            discovery.modes[0].id.clone()
        };
        let history = HistoryStore::new(discovery.sources.clone());
        let mut app = Self {
            discovery,
            history,
            config,
            config_path,
            pinned,
            mode,
            projects: Vec::new(),
            selected: 0,
            ui_mode: UiMode::Normal,
            search: String::new(),
            status: None,
        };
        app.refresh();
        app
    }

    /// Rebuild the project list from every history source, then synthesize
    /// pinned paths that fell out of history but still exist on disk. Always
    /// a full rescan; the list is never patched incrementally.
    fn refresh(&mut self) {
        self.projects = self.history.fetch_all();
        for pin in &self.pinned {
            if !self.projects.contains(pin) && Path::new(pin).exists() {
                self.projects.push(pin.clone());
            }
        }
    }

    /// The displayed list, computed fresh per pass: pinned entries first,
    /// lexicographic within each group, filtered by a subsequence match of
    /// the search buffer against the displayed name.
    pub fn visible(&self) -> Vec<String> {
        let mut list = self.projects.clone();
        list.sort_by(|a, b| {
            let rank_a = !self.pinned.contains(a);
            let rank_b = !self.pinned.contains(b);
            rank_a.cmp(&rank_b).then_with(|| a.cmp(b))
        });
        list.retain(|p| fuzzy::matches(&self.search, display_name(p)));
        list
    }

    /// Selection clamped against the current filtered list; `None` when the
    /// list is empty.
    pub fn selection(&self) -> Option<usize> {
        let len = self.visible().len();
        if len == 0 {
            None
        } else {
            Some(self.selected.min(len - 1))
        }
    }

    pub fn is_searching(&self) -> bool {
        self.ui_mode == UiMode::Search
    }

    pub fn search_query(&self) -> &str {
        &self.search
    }

    pub fn mode_id(&self) -> &str {
        &self.mode
    }

    pub fn is_pinned(&self, path: &str) -> bool {
        self.pinned.contains(path)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn handle_key(&mut self, key: Key) -> Flow {
        if key == Key::Quit {
            return Flow::Quit;
        }
        // A resize arrives as Other; it only redraws and must not wipe a
        // still-relevant status message.
        if key != Key::Other {
            self.status = None;
        }
        let visible = self.visible();
        self.clamp(visible.len());
        match self.ui_mode {
            UiMode::Normal => self.handle_normal_key(key, &visible),
            UiMode::Search => self.handle_search_key(key, &visible),
        }
    }

    fn handle_normal_key(&mut self, key: Key, visible: &[String]) -> Flow {
        match key {
            Key::Up | Key::Char('k') => self.move_up(),
            Key::Down | Key::Char('j') => self.move_down(visible.len()),
            Key::Char('q') | Key::Char('Q') => return Flow::Quit,
            Key::Char('/') => {
                self.ui_mode = UiMode::Search;
                self.search.clear();
            }
            Key::Char('x') | Key::Char('X') => {
                if let Some(path) = visible.get(self.selected).cloned() {
                    self.remove_project(&path);
                }
            }
            Key::Char('p') | Key::Char('P') => {
                if let Some(path) = visible.get(self.selected).cloned() {
                    self.toggle_pin(&path);
                }
            }
            Key::Tab | Key::Char('s') | Key::Char('S') => self.cycle_mode(),
            Key::Char('t') | Key::Char('T') => {
                if let Some(path) = visible.get(self.selected) {
                    return Flow::Launch(LaunchRequest::Terminal { path: path.clone() });
                }
            }
            Key::Char('n') | Key::Char('N') => return Flow::NewProject,
            Key::Char('o') | Key::Char('O') => return Flow::OpenPath,
            Key::Enter => return self.launch_selected(visible),
            _ => {}
        }
        Flow::Continue
    }

    fn handle_search_key(&mut self, key: Key, visible: &[String]) -> Flow {
        match key {
            Key::Enter => return self.launch_selected(visible),
            Key::Escape => {
                self.search.clear();
                self.ui_mode = UiMode::Normal;
            }
            Key::Backspace => {
                self.search.pop();
                self.selected = 0;
            }
            Key::Up => self.move_up(),
            Key::Down => self.move_down(visible.len()),
            Key::Char(c) => {
                self.search.push(c);
                self.selected = 0;
            }
            _ => {}
        }
        Flow::Continue
    }

    fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn move_down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(len - 1);
        }
    }

    fn launch_selected(&self, visible: &[String]) -> Flow {
        match visible.get(self.selected) {
            Some(path) => Flow::Launch(LaunchRequest::Editor {
                command: self.command(),
                path: path.clone(),
            }),
            None => Flow::Continue,
        }
    }

    fn command(&self) -> String {
        self.discovery
            .mode(&self.mode)
            .unwrap_or(&self.discovery.modes[0])
            .command
            .clone()
    }

    /// Destructive: drop the entry from every editor's history, unpin it,
    /// then rebuild the list.
    fn remove_project(&mut self, path: &str) {
        self.history.remove(path);
        if self.pinned.remove(path) {
            self.persist_config();
        }
        self.refresh();
    }

    fn toggle_pin(&mut self, path: &str) {
        if !self.pinned.remove(path) {
            self.pinned.insert(path.to_string());
        }
        self.persist_config();
    }

    fn cycle_mode(&mut self) {
        self.mode = self.discovery.next_mode(&self.mode).id.clone();
        self.persist_config();
        self.refresh();
        self.selected = 0;
    }

    fn persist_config(&mut self) {
        self.config.mode = self.mode.clone();
        let mut pinned: Vec<String> = self.pinned.iter().cloned().collect();
        pinned.sort();
        self.config.pinned = pinned;
        if let Err(e) = self.config.save(&self.config_path) {
            tracing::error!("could not save config: {e}");
            self.status = Some(format!("config not saved: {e}"));
        }
    }

    /// Main loop: draw, wait for a key, transition. Returns when the user
    /// quits or right after an editor or terminal was spawned successfully.
    pub fn run(&mut self, ui: &mut dyn Ui) -> anyhow::Result<()> {
        loop {
            let visible = self.visible();
            self.clamp(visible.len());
            self.render(ui, &visible, None)?;
            let key = ui.next_key()?;
            match self.handle_key(key) {
                Flow::Continue => {}
                Flow::Quit => return Ok(()),
                Flow::NewProject => {
                    if let Some(req) = self.new_project_flow(ui)? {
                        if self.spawn(&req) {
                            return Ok(());
                        }
                    }
                }
                Flow::OpenPath => {
                    if let Some(req) = self.open_path_flow(ui)? {
                        if self.spawn(&req) {
                            return Ok(());
                        }
                    }
                }
                Flow::Launch(req) => {
                    if self.spawn(&req) {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Collect a project name and a location, create the directory when it
    /// does not exist yet, and hand back a launch request. Creation failure
    /// is reported on the status line and aborts the flow.
    fn new_project_flow(&mut self, ui: &mut dyn Ui) -> anyhow::Result<Option<LaunchRequest>> {
        let Some(name) = self.read_line(ui, "Project Name: ", "", false)? else {
            return Ok(None);
        };
        if name.is_empty() {
            return Ok(None);
        }
        let initial = self.prompt_location();
        let Some(location) = self.read_line(ui, "Location: ", &initial, true)? else {
            return Ok(None);
        };
        if location.is_empty() {
            return Ok(None);
        }
        let path = Path::new(&location).join(&name);
        if !path.exists() {
            if let Err(e) = std::fs::create_dir_all(&path) {
                tracing::error!("could not create {}: {e}", path.display());
                self.status = Some(format!("could not create {}: {e}", path.display()));
                return Ok(None);
            }
        }
        Ok(Some(LaunchRequest::Editor {
            command: self.command(),
            path: path.to_string_lossy().into_owned(),
        }))
    }

    /// Collect an existing path and hand back a launch request.
    fn open_path_flow(&mut self, ui: &mut dyn Ui) -> anyhow::Result<Option<LaunchRequest>> {
        let initial = self.prompt_location();
        let Some(location) = self.read_line(ui, "Open Path: ", &initial, true)? else {
            return Ok(None);
        };
        if location.is_empty() {
            return Ok(None);
        }
        if !Path::new(&location).exists() {
            self.status = Some(format!("no such path: {location}"));
            return Ok(None);
        }
        Ok(Some(LaunchRequest::Editor {
            command: self.command(),
            path: location,
        }))
    }

    /// Blocking single-line prompt on top of the normal view. `None` means
    /// the user cancelled.
    fn read_line(
        &mut self,
        ui: &mut dyn Ui,
        label: &str,
        initial: &str,
        path_completion: bool,
    ) -> anyhow::Result<Option<String>> {
        let mut prompt = Prompt::new(label, initial, path_completion);
        loop {
            let visible = self.visible();
            self.render(ui, &visible, Some(&prompt))?;
            match prompt.handle_key(ui.next_key()?) {
                PromptOutcome::Pending => {}
                PromptOutcome::Cancelled => return Ok(None),
                PromptOutcome::Submitted(text) => return Ok(Some(text)),
            }
        }
    }

    /// Starting point offered by the prompt flows, with a trailing separator
    /// so tab completion lists inside it straight away.
    fn prompt_location(&self) -> String {
        let mut location = self.config.projects_dir().to_string_lossy().into_owned();
        if !location.ends_with(MAIN_SEPARATOR) {
            location.push(MAIN_SEPARATOR);
        }
        location
    }

    fn spawn(&mut self, req: &LaunchRequest) -> bool {
        let result = match req {
            LaunchRequest::Editor { command, path } => launch::launch_editor(command, path),
            LaunchRequest::Terminal { path } => launch::open_terminal(path),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("launch failed: {e}");
                self.status = Some(format!("launch failed: {e}"));
                false
            }
        }
    }

    fn render(
        &self,
        ui: &mut dyn Ui,
        visible: &[String],
        prompt: Option<&Prompt>,
    ) -> anyhow::Result<()> {
        let rows: Vec<Row> = visible
            .iter()
            .map(|path| Row {
                name: display_name(path),
                path,
                pinned: self.pinned.contains(path),
            })
            .collect();
        let selected = if rows.is_empty() {
            None
        } else {
            Some(self.selected.min(rows.len() - 1))
        };
        let mode_label = self
            .discovery
            .mode(&self.mode)
            .map(|m| m.label.as_str())
            .unwrap_or(&self.mode);
        let view = View {
            rows,
            selected,
            searching: self.ui_mode == UiMode::Search,
            search: &self.search,
            mode_label,
            status: self.status.as_deref(),
            prompt: prompt.map(|p| PromptView {
                label: p.label(),
                buffer: p.buffer(),
            }),
        };
        ui.draw(&view)
    }
}

/// The name shown for a project: the last path component, or the whole
/// string for paths without one (remote URIs, bare roots).
pub fn display_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::display_name;

    #[test]
    fn display_name_is_the_last_component() {
        assert_eq!(display_name("/x/proj1"), "proj1");
        assert_eq!(display_name("/x/nested/app"), "app");
    }

    #[test]
    fn display_name_falls_back_to_the_full_string() {
        assert_eq!(display_name("/"), "/");
    }
}
