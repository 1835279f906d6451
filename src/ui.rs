use std::io::{self, Stdout};

use anyhow::Context;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Terminal;

/// A decoded keyboard event. Raw terminal codes are translated here, once;
/// the controller and the prompt editor never see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
    Backspace,
    Tab,
    Char(char),
    /// Ctrl-C; ends the session from any mode.
    Quit,
    Other,
}

/// One line of the project list.
pub struct Row<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub pinned: bool,
}

/// Everything a frame needs. Rendering is a pure function of this value;
/// the UI keeps no state of its own beyond the terminal handle.
pub struct View<'a> {
    pub rows: Vec<Row<'a>>,
    pub selected: Option<usize>,
    pub searching: bool,
    pub search: &'a str,
    pub mode_label: &'a str,
    pub status: Option<&'a str>,
    pub prompt: Option<PromptView<'a>>,
}

pub struct PromptView<'a> {
    pub label: &'a str,
    pub buffer: &'a str,
}

/// Terminal capability the controller talks to. Tests substitute a scripted
/// implementation.
pub trait Ui {
    fn draw(&mut self, view: &View<'_>) -> anyhow::Result<()>;
    /// Blocks until the next key press.
    fn next_key(&mut self) -> anyhow::Result<Key>;
}

/// Production UI: ratatui over crossterm, raw mode plus alternate screen,
/// restored on drop.
pub struct TerminalUi {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalUi {
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode().context("could not initialise the terminal")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("could not enter the alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalUi {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl Ui for TerminalUi {
    fn draw(&mut self, view: &View<'_>) -> anyhow::Result<()> {
        self.terminal.draw(|f| {
            let area = f.size();
            // Below this there is no room for even one list row plus the
            // chrome; say so and leave the state alone.
            if area.width < 20 || area.height < 6 {
                f.render_widget(Paragraph::new("Window too small"), area);
                return;
            }
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // title
                    Constraint::Length(1), // search
                    Constraint::Min(1),    // list
                    Constraint::Length(1), // status / prompt
                    Constraint::Length(1), // footer
                ])
                .split(area);

            let title = Line::from(Span::styled(
                format!(" Project Launcher [{}] ", view.mode_label),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
            f.render_widget(Paragraph::new(title).alignment(Alignment::Center), chunks[0]);

            if view.searching {
                let line = Line::from(vec![
                    Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(view.search),
                ]);
                f.render_widget(Paragraph::new(line), chunks[1]);
            }

            let items: Vec<ListItem> = view
                .rows
                .iter()
                .map(|row| {
                    let mark = if row.pinned { "★ " } else { "  " };
                    ListItem::new(Line::from(vec![
                        Span::styled(mark, Style::default().fg(Color::Yellow)),
                        Span::styled(
                            row.name.to_string(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("  ({})", row.path),
                            Style::default().fg(Color::Blue),
                        ),
                    ]))
                })
                .collect();
            let list = List::new(items)
                .highlight_style(
                    Style::default()
                        .bg(Color::Cyan)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");
            let mut state = ListState::default();
            state.select(view.selected);
            f.render_stateful_widget(list, chunks[2], &mut state);

            if let Some(prompt) = &view.prompt {
                let line = Line::from(vec![
                    Span::styled(
                        prompt.label,
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(prompt.buffer),
                ]);
                f.render_widget(Paragraph::new(line), chunks[3]);
                let cursor_x = chunks[3].x
                    + (prompt.label.chars().count() + prompt.buffer.chars().count()) as u16;
                f.set_cursor(cursor_x.min(chunks[3].right().saturating_sub(1)), chunks[3].y);
            } else if let Some(status) = view.status {
                f.render_widget(
                    Paragraph::new(Span::styled(status, Style::default().fg(Color::Red))),
                    chunks[3],
                );
            }

            let footer = if view.searching {
                " ENTER: Open | ESC: Clear Search | Type to filter "
            } else {
                " ENTER: Open | n: New | o: Open path | /: Search | p: Pin | x: Remove | t: Terminal | TAB: Switch | q: Quit "
            };
            f.render_widget(
                Paragraph::new(Span::styled(footer, Style::default().fg(Color::Magenta))),
                chunks[4],
            );
        })?;
        Ok(())
    }

    fn next_key(&mut self) -> anyhow::Result<Key> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    return Ok(decode(key));
                }
                // A resize redraws on the next loop pass.
                Event::Resize(..) => return Ok(Key::Other),
                _ => {}
            }
        }
    }
}

fn decode(key: KeyEvent) -> Key {
    use crossterm::event::KeyCode;
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Key::Quit;
    }
    match key.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    }
}
