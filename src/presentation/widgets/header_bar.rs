use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

struct HeaderBarStyle {
    background: Style,
    title: Style,
    subtitle: Style,
    busy: Style,
}

impl Default for HeaderBarStyle {
    fn default() -> Self {
        Self {
            background: Style::default(),
            title: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            subtitle: Style::default().fg(Color::Gray),
            busy: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// Title row of the chat screen.
pub struct HeaderBar<'a> {
    title: &'a str,
    subtitle: &'a str,
    busy: Option<usize>,
    style: HeaderBarStyle,
}

impl<'a> HeaderBar<'a> {
    /// Creates header with a title and subtitle.
    #[must_use]
    pub fn new(title: &'a str, subtitle: &'a str) -> Self {
        Self {
            title,
            subtitle,
            busy: None,
            style: HeaderBarStyle::default(),
        }
    }

    /// Shows a spinner at the given animation frame.
    #[must_use]
    pub const fn busy(mut self, frame: Option<usize>) -> Self {
        self.busy = frame;
        self
    }
}

impl Widget for HeaderBar<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        for x in area.left()..area.right() {
            buf[(x, area.y)]
                .set_char(' ')
                .set_style(self.style.background);
        }

        let left_line = Line::from(vec![
            Span::styled(format!(" {} ", self.title), self.style.title),
            Span::raw(" "),
            Span::styled(self.subtitle, self.style.subtitle),
        ]);
        Paragraph::new(left_line).render(area, buf);

        if let Some(frame) = self.busy {
            let text = format!(" {} ", SPINNER[frame % SPINNER.len()]);
            let width = text.width() as u16;
            let left_width = (self.title.width() + 3 + self.subtitle.width()) as u16;
            if width < area.width.saturating_sub(left_width) {
                let right_area = Rect::new(area.right() - width, area.y, width, 1);
                Paragraph::new(Span::styled(text, self.style.busy)).render(right_area, buf);
            }
        }
    }
}
