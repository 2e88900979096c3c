//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Status bar severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Hint text.
    Hint,
    /// Informational.
    Info,
    /// Error.
    Error,
}

impl StatusLevel {
    /// Returns style for level.
    #[must_use]
    pub fn style(self) -> Style {
        match self {
            Self::Hint => Style::default().fg(Color::DarkGray),
            Self::Info => Style::default().fg(Color::Cyan),
            Self::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }
}

/// One-line bar with left and right aligned content.
#[derive(Debug, Clone)]
pub struct StatusBar {
    left: String,
    right: String,
    level: StatusLevel,
}

impl StatusBar {
    /// Creates empty status bar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left: String::new(),
            right: String::new(),
            level: StatusLevel::Hint,
        }
    }

    /// Sets left content.
    #[must_use]
    pub fn left(mut self, content: impl Into<String>) -> Self {
        self.left = content.into();
        self
    }

    /// Sets right content.
    #[must_use]
    pub fn right(mut self, content: impl Into<String>) -> Self {
        self.right = content.into();
        self
    }

    /// Sets status level.
    #[must_use]
    pub const fn level(mut self, level: StatusLevel) -> Self {
        self.level = level;
        self
    }

    /// Creates error status bar.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new().left(message).level(StatusLevel::Error)
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.level.style();
        let width = usize::from(area.width);
        let left_width = self.left.width();
        let right_width = self.right.width();

        let mut spans = vec![Span::styled(self.left.as_str(), style)];

        // Right side is dropped when both halves do not fit.
        if !self.right.is_empty() && left_width + 1 + right_width <= width {
            spans.push(Span::raw(" ".repeat(width - left_width - right_width)));
            spans.push(Span::styled(
                self.right.as_str(),
                StatusLevel::Hint.style(),
            ));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
