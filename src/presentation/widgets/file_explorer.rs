use crossterm::event::{KeyCode, KeyEvent};
use directories::BaseDirs;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, StatefulWidget, Widget},
};
use std::{
    cmp::Ordering,
    fs,
    path::{Path, PathBuf},
};

use crate::infrastructure::is_accepted;

/// Outcome of a key press in the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileExplorerAction {
    /// User picked a file.
    SelectFile(PathBuf),
    /// User dismissed the picker.
    Close,
    /// Nothing to report.
    None,
}

#[derive(Debug, Clone)]
struct FileEntry {
    path: PathBuf,
    is_dir: bool,
    name: String,
}

/// Directory browser that only offers attachable files.
pub struct FileExplorerComponent {
    current_dir: PathBuf,
    entries: Vec<FileEntry>,
    state: ListState,
    show_hidden: bool,
}

impl FileExplorerComponent {
    /// Opens the picker in the home directory.
    #[must_use]
    pub fn new() -> Self {
        let root = BaseDirs::new().map_or_else(|| PathBuf::from("/"), |d| d.home_dir().to_path_buf());
        Self::with_dir(root)
    }

    /// Opens the picker in `dir`.
    #[must_use]
    pub fn with_dir(dir: PathBuf) -> Self {
        let mut component = Self {
            current_dir: dir,
            entries: Vec::new(),
            state: ListState::default(),
            show_hidden: false,
        };
        component.reload();
        component
    }

    fn reload(&mut self) {
        let path = self.current_dir.clone();
        self.load_entries(&path);
    }

    fn load_entries(&mut self, path: &Path) {
        self.entries.clear();

        if let Some(parent) = path.parent() {
            self.entries.push(FileEntry {
                path: parent.to_path_buf(),
                is_dir: true,
                name: "..".to_string(),
            });
        }

        if let Ok(read_dir) = fs::read_dir(path) {
            let mut entries: Vec<FileEntry> = read_dir
                .filter_map(Result::ok)
                .map(|entry| {
                    let path = entry.path();
                    let is_dir = path.is_dir();
                    let name = entry.file_name().to_string_lossy().to_string();
                    FileEntry { path, is_dir, name }
                })
                .filter(|entry| self.show_hidden || !entry.name.starts_with('.'))
                .filter(|entry| entry.is_dir || is_accepted(&entry.path))
                .collect();

            entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            });

            self.entries.extend(entries);
        }

        self.state
            .select(if self.entries.is_empty() { None } else { Some(0) });
    }

    fn enter(&mut self, dir: PathBuf) {
        self.current_dir = dir;
        self.reload();
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> FileExplorerAction {
        match key.code {
            KeyCode::Esc => FileExplorerAction::Close,
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous();
                FileExplorerAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.next();
                FileExplorerAction::None
            }
            KeyCode::Char('.') => {
                self.show_hidden = !self.show_hidden;
                self.reload();
                FileExplorerAction::None
            }
            KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
                if let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) {
                    self.enter(parent);
                }
                FileExplorerAction::None
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                match self.selected_entry().cloned() {
                    Some(entry) if entry.is_dir => {
                        self.enter(entry.path);
                        FileExplorerAction::None
                    }
                    Some(entry) => FileExplorerAction::SelectFile(entry.path),
                    None => FileExplorerAction::None,
                }
            }
            _ => FileExplorerAction::None,
        }
    }

    fn next(&mut self) {
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.entries.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    fn previous(&mut self) {
        let i = match self.state.selected() {
            Some(0) | None => self.entries.len().saturating_sub(1),
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn selected_entry(&self) -> Option<&FileEntry> {
        self.state.selected().and_then(|i| self.entries.get(i))
    }

    /// Renders the picker as a popup over `area`.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Attach a file: {} ", self.current_dir.display()))
            .title_style(Style::default().add_modifier(Modifier::BOLD));

        let inner_area = block.inner(area);
        let [list_area, footer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner_area);

        block.render(area, buf);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let (content, color) = if entry.is_dir {
                    (format!("{}/", entry.name), Color::Blue)
                } else {
                    (entry.name.clone(), Color::White)
                };
                ListItem::new(content).style(Style::default().fg(color))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");

        StatefulWidget::render(list, list_area, buf, &mut self.state);

        let footer = Line::from(vec![
            Span::raw(" [Esc] Cancel | "),
            Span::raw("[Enter] Open/Select | "),
            Span::raw("[.] Hidden "),
        ])
        .style(Style::default().fg(Color::Gray));

        Widget::render(footer, footer_area, buf);
    }
}

impl Default for FileExplorerComponent {
    fn default() -> Self {
        Self::new()
    }
}
