use std::path::MAIN_SEPARATOR;

use crate::ui::Key;

/// What one key press did to the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    /// Enter; the buffer is returned trimmed. An empty submit is distinct
    /// from a cancel.
    Submitted(String),
    /// Escape.
    Cancelled,
}

/// Cycling tab-completion state. Stays armed only while the user keeps
/// pressing Tab; any other key discards it so the next Tab starts a fresh
/// directory lookup.
#[derive(Debug)]
struct CompletionCursor {
    candidates: Vec<String>,
    index: usize,
}

/// Single-line text prompt fed decoded keys, with optional directory
/// tab-completion. Blocking and synchronous: the caller draws, reads a key,
/// feeds it here and inspects the outcome.
pub struct Prompt {
    label: String,
    buffer: String,
    path_completion: bool,
    cursor: Option<CompletionCursor>,
}

impl Prompt {
    pub fn new(label: &str, initial: &str, path_completion: bool) -> Self {
        Self {
            label: label.to_string(),
            buffer: initial.to_string(),
            path_completion,
            cursor: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn handle_key(&mut self, key: Key) -> PromptOutcome {
        if key == Key::Tab && self.path_completion {
            self.complete();
            return PromptOutcome::Pending;
        }
        self.cursor = None;
        match key {
            Key::Enter => PromptOutcome::Submitted(self.buffer.trim().to_string()),
            Key::Escape | Key::Quit => PromptOutcome::Cancelled,
            Key::Backspace => {
                self.buffer.pop();
                PromptOutcome::Pending
            }
            Key::Char(c) => {
                self.buffer.push(c);
                PromptOutcome::Pending
            }
            _ => PromptOutcome::Pending,
        }
    }

    /// First Tab of a sequence looks the directory up; repeats cycle the
    /// recorded candidates with wraparound.
    fn complete(&mut self) {
        if let Some(cursor) = &mut self.cursor {
            if !cursor.candidates.is_empty() {
                cursor.index = (cursor.index + 1) % cursor.candidates.len();
                self.buffer = cursor.candidates[cursor.index].clone();
            }
            return;
        }
        let candidates = directory_candidates(&self.buffer);
        if let Some(first) = candidates.first() {
            self.buffer = first.clone();
        }
        self.cursor = Some(CompletionCursor { candidates, index: 0 });
    }
}

/// Full paths of the directories inside the buffer's directory component
/// whose names start with its prefix component, sorted. Files never
/// complete. An unlistable directory yields nothing.
fn directory_candidates(buffer: &str) -> Vec<String> {
    let expanded = expand_home(buffer);
    let (dirname, prefix) = split_dir_prefix(&expanded);
    let search_dir = if dirname.is_empty() { "." } else { dirname.as_str() };
    let entries = match std::fs::read_dir(search_dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            (name.starts_with(&prefix) && entry.path().is_dir()).then_some(name)
        })
        .collect();
    names.sort();
    names
        .into_iter()
        .map(|name| format!("{dirname}{name}"))
        .collect()
}

/// Splits into (directory incl. trailing separator, name prefix). A buffer
/// ending in a separator is all directory.
fn split_dir_prefix(expanded: &str) -> (String, String) {
    if expanded.ends_with(MAIN_SEPARATOR) {
        return (expanded.to_string(), String::new());
    }
    match expanded.rfind(MAIN_SEPARATOR) {
        Some(idx) => (
            expanded[..=idx].to_string(),
            expanded[idx + 1..].to_string(),
        ),
        None => (String::new(), expanded.to_string()),
    }
}

fn expand_home(text: &str) -> String {
    if let Some(rest) = text.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with(MAIN_SEPARATOR) {
            if let Some(home) = dirs_next::home_dir() {
                return format!("{}{}", home.to_string_lossy(), rest);
            }
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::{Prompt, PromptOutcome};
    use crate::ui::Key;
    use std::path::MAIN_SEPARATOR;
    use tempfile::tempdir;

    fn fixture() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        for name in ["bar", "beta", "bop"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("bogus.txt"), "file, not a candidate").unwrap();
        dir
    }

    fn seed(dir: &tempfile::TempDir, prefix: &str) -> String {
        format!("{}{}{}", dir.path().display(), MAIN_SEPARATOR, prefix)
    }

    #[test]
    fn tab_cycles_sorted_candidates_and_wraps() {
        let dir = fixture();
        let mut prompt = Prompt::new("Location: ", &seed(&dir, "b"), true);
        for expected in ["bar", "beta", "bop", "bar"] {
            prompt.handle_key(Key::Tab);
            assert_eq!(prompt.buffer(), seed(&dir, expected));
        }
    }

    #[test]
    fn any_other_key_resets_the_cycle() {
        let dir = fixture();
        let mut prompt = Prompt::new("Location: ", &seed(&dir, "b"), true);
        prompt.handle_key(Key::Tab);
        assert_eq!(prompt.buffer(), seed(&dir, "bar"));
        // edit, undo, then Tab again: a fresh lookup on the new prefix
        prompt.handle_key(Key::Char('x'));
        prompt.handle_key(Key::Backspace);
        prompt.handle_key(Key::Tab);
        assert_eq!(prompt.buffer(), seed(&dir, "bar"));
        prompt.handle_key(Key::Tab);
        assert_eq!(prompt.buffer(), seed(&dir, "bar"));
    }

    #[test]
    fn trailing_separator_lists_all_children() {
        let dir = fixture();
        let mut prompt = Prompt::new("Location: ", &seed(&dir, ""), true);
        prompt.handle_key(Key::Tab);
        assert_eq!(prompt.buffer(), seed(&dir, "bar"));
        prompt.handle_key(Key::Tab);
        assert_eq!(prompt.buffer(), seed(&dir, "beta"));
    }

    #[test]
    fn files_are_never_candidates() {
        let dir = fixture();
        let mut prompt = Prompt::new("Location: ", &seed(&dir, "bo"), true);
        prompt.handle_key(Key::Tab);
        assert_eq!(prompt.buffer(), seed(&dir, "bop"));
        // wraps straight back instead of visiting bogus.txt
        prompt.handle_key(Key::Tab);
        assert_eq!(prompt.buffer(), seed(&dir, "bop"));
    }

    #[test]
    fn unlistable_directory_leaves_buffer_unchanged() {
        let before = format!("{0}definitely{0}missing{0}zz", MAIN_SEPARATOR);
        let mut prompt = Prompt::new("Location: ", &before, true);
        prompt.handle_key(Key::Tab);
        assert_eq!(prompt.buffer(), before);
    }

    #[test]
    fn tab_is_plain_input_noise_without_path_completion() {
        let dir = fixture();
        let seeded = seed(&dir, "b");
        let mut prompt = Prompt::new("Name: ", &seeded, false);
        prompt.handle_key(Key::Tab);
        assert_eq!(prompt.buffer(), seeded);
    }

    #[test]
    fn cancel_is_distinct_from_empty_submit() {
        let mut prompt = Prompt::new("Name: ", "", false);
        assert_eq!(prompt.handle_key(Key::Escape), PromptOutcome::Cancelled);
        let mut prompt = Prompt::new("Name: ", "", false);
        assert_eq!(prompt.handle_key(Key::Quit), PromptOutcome::Cancelled);
        let mut prompt = Prompt::new("Name: ", "", false);
        assert_eq!(
            prompt.handle_key(Key::Enter),
            PromptOutcome::Submitted(String::new())
        );
    }

    #[test]
    fn submit_trims_the_buffer() {
        let mut prompt = Prompt::new("Name: ", "", false);
        for c in [' ', 'h', 'i', ' '] {
            prompt.handle_key(Key::Char(c));
        }
        assert_eq!(
            prompt.handle_key(Key::Enter),
            PromptOutcome::Submitted("hi".to_string())
        );
    }

    #[test]
    fn backspace_on_empty_buffer_is_harmless() {
        let mut prompt = Prompt::new("Name: ", "", false);
        assert_eq!(prompt.handle_key(Key::Backspace), PromptOutcome::Pending);
        assert_eq!(prompt.buffer(), "");
    }
}
