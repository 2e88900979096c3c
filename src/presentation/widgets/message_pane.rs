//! Conversation view.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget,
    },
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::media_preview::media_line;
use crate::domain::entities::Message;

const SCROLL_AMOUNT: usize = 3;
const THINKING: &str = "Thinking...";

/// Scroll position of the conversation view.
#[derive(Debug, Clone)]
pub struct MessagePaneState {
    offset: usize,
    auto_scroll: bool,
    content_height: usize,
    viewport_height: usize,
}

impl MessagePaneState {
    /// Creates state pinned to the newest message.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            offset: 0,
            auto_scroll: true,
            content_height: 0,
            viewport_height: 0,
        }
    }

    /// Returns the first visible line.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns whether the view follows new messages.
    #[must_use]
    pub const fn is_following(&self) -> bool {
        self.auto_scroll
    }

    const fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Scrolls towards older messages.
    pub fn scroll_up(&mut self) {
        self.auto_scroll = false;
        self.offset = self.offset.min(self.max_offset()).saturating_sub(SCROLL_AMOUNT);
    }

    /// Scrolls towards newer messages, following again at the bottom.
    pub fn scroll_down(&mut self) {
        self.offset = (self.offset + SCROLL_AMOUNT).min(self.max_offset());
        self.auto_scroll = self.offset >= self.max_offset();
    }

    /// Scrolls one page towards older messages.
    pub fn page_up(&mut self) {
        self.auto_scroll = false;
        self.offset = self
            .offset
            .min(self.max_offset())
            .saturating_sub(self.viewport_height.max(1));
    }

    /// Scrolls one page towards newer messages.
    pub fn page_down(&mut self) {
        self.offset = (self.offset + self.viewport_height.max(1)).min(self.max_offset());
        self.auto_scroll = self.offset >= self.max_offset();
    }

    /// Jumps to the newest message and follows new ones.
    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
        self.offset = self.max_offset();
    }

    fn update_dimensions(&mut self, content_height: usize, viewport_height: usize) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;

        if self.auto_scroll {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }
}

impl Default for MessagePaneState {
    fn default() -> Self {
        Self::new()
    }
}

struct MessagePaneStyle {
    border: Style,
    user_header: Style,
    assistant_header: Style,
    timestamp: Style,
    user_content: Style,
    assistant_content: Style,
    thinking: Style,
}

impl Default for MessagePaneStyle {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::DarkGray),
            user_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            assistant_header: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            timestamp: Style::default().fg(Color::DarkGray),
            user_content: Style::default().fg(Color::White),
            assistant_content: Style::default().fg(Color::Gray),
            thinking: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        }
    }
}

/// Renders the conversation, user messages on the right.
pub struct MessagePane<'a> {
    messages: &'a [Message],
    timestamp_format: &'a str,
    thinking: bool,
    style: MessagePaneStyle,
}

impl<'a> MessagePane<'a> {
    /// Creates pane over the message sequence.
    #[must_use]
    pub fn new(messages: &'a [Message], timestamp_format: &'a str) -> Self {
        Self {
            messages,
            timestamp_format,
            thinking: false,
            style: MessagePaneStyle::default(),
        }
    }

    /// Shows the pending reply indicator.
    #[must_use]
    pub const fn thinking(mut self, thinking: bool) -> Self {
        self.thinking = thinking;
        self
    }

    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let bubble_width = (width * 3 / 4).max(1);
        let mut lines = Vec::new();

        for message in self.messages {
            lines.extend(self.message_lines(message, bubble_width));
            lines.push(Line::default());
        }

        if self.thinking {
            lines.push(Line::from(Span::styled(THINKING, self.style.thinking)));
        }

        lines
    }

    fn message_lines(&self, message: &Message, bubble_width: usize) -> Vec<Line<'static>> {
        let (author, header_style, content_style, alignment) = if message.is_user() {
            (
                "You",
                self.style.user_header,
                self.style.user_content,
                Alignment::Right,
            )
        } else {
            (
                "Assistant",
                self.style.assistant_header,
                self.style.assistant_content,
                Alignment::Left,
            )
        };

        let mut lines = vec![Line::from(vec![
            Span::styled(author, header_style),
            Span::styled(
                format!(" · {}", message.timestamp().format(self.timestamp_format)),
                self.style.timestamp,
            ),
        ])];

        if let Some(media) = message.media() {
            lines.push(media_line(media));
        }

        lines.extend(
            wrap_text(message.content(), bubble_width)
                .into_iter()
                .map(|text| Line::from(Span::styled(text, content_style))),
        );

        lines
            .into_iter()
            .map(|line| line.alignment(alignment))
            .collect()
    }
}

impl StatefulWidget for MessagePane<'_> {
    type State = MessagePaneState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.style.border);

        let inner_area = block.inner(area);
        block.render(area, buf);
        if inner_area.width < 2 || inner_area.height == 0 {
            return;
        }

        // One column is kept free for the scrollbar.
        let text_width = usize::from(inner_area.width - 1);
        let lines = self.build_lines(text_width);

        state.update_dimensions(lines.len(), usize::from(inner_area.height));

        let text_area = Rect {
            width: inner_area.width - 1,
            ..inner_area
        };
        let offset = u16::try_from(state.offset).unwrap_or(u16::MAX);
        Paragraph::new(lines)
            .scroll((offset, 0))
            .render(text_area, buf);

        if state.max_offset() > 0 {
            let mut scrollbar_state =
                ScrollbarState::new(state.max_offset()).position(state.offset);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .render(inner_area, buf, &mut scrollbar_state);
        }
    }
}

/// Wraps text at word boundaries to `width` display columns. Words wider
/// than a line are split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();

            if current_width > 0 && current_width + 1 + word_width <= width {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
                continue;
            }
            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            for c in word.chars() {
                let char_width = c.width().unwrap_or(0);
                if current_width + char_width > width && current_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += char_width;
            }
        }

        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{MediaInfo, MessageIdGenerator, Timestamp};

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_wrap_text_words() {
        assert_eq!(
            wrap_text("Hello world this is a test", 11),
            vec!["Hello world", "this is a", "test"]
        );
    }

    #[test]
    fn test_wrap_text_splits_long_word() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_text_keeps_blank_lines() {
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_text_wide_chars() {
        assert_eq!(wrap_text("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn test_user_right_assistant_left() {
        let ids = MessageIdGenerator::new();
        let messages = vec![
            Message::assistant(ids.next_id(), "hi", Timestamp::from_server("x")),
            Message::user(ids.next_id(), "hello", None),
        ];
        let pane = MessagePane::new(&messages, "%H:%M");

        let lines = pane.build_lines(40);

        assert_eq!(lines[0].alignment, Some(Alignment::Left));
        assert_eq!(line_text(&lines[0]), "Assistant · x");
        assert_eq!(line_text(&lines[1]), "hi");
        assert!(lines[2].spans.is_empty());
        assert_eq!(lines[3].alignment, Some(Alignment::Right));
        assert_eq!(line_text(&lines[4]), "hello");
    }

    #[test]
    fn test_media_line_and_thinking_row() {
        let ids = MessageIdGenerator::new();
        let messages = vec![Message::user(
            ids.next_id(),
            "Uploaded: scan.pdf",
            Some(MediaInfo::new("scan.pdf", "application/pdf", 10)),
        )];
        let pane = MessagePane::new(&messages, "%H:%M").thinking(true);

        let lines = pane.build_lines(40);

        assert_eq!(line_text(&lines[1]), " PDF  scan.pdf (10 B)");
        assert_eq!(line_text(&lines[2]), "Uploaded: scan.pdf");
        assert_eq!(line_text(lines.last().unwrap()), THINKING);
    }

    #[test]
    fn test_follows_bottom_until_scrolled() {
        let mut state = MessagePaneState::new();
        state.update_dimensions(50, 10);
        assert_eq!(state.offset(), 40);

        state.scroll_up();
        assert!(!state.is_following());
        state.update_dimensions(60, 10);
        assert_eq!(state.offset(), 37);

        state.scroll_to_bottom();
        state.update_dimensions(70, 10);
        assert_eq!(state.offset(), 60);
    }

    #[test]
    fn test_scroll_down_resumes_following() {
        let mut state = MessagePaneState::new();
        state.update_dimensions(20, 10);
        state.scroll_up();

        state.scroll_down();

        assert!(state.is_following());
        assert_eq!(state.offset(), 10);
    }
}
