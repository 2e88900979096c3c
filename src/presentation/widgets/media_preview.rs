//! Pending attachment preview.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::domain::entities::{MediaInfo, MediaKind};

/// Returns the badge and style that represent a media kind.
fn badge(info: &MediaInfo) -> (String, Style) {
    let (text, color) = match info.kind() {
        MediaKind::Image => ("IMAGE".to_string(), Color::Magenta),
        MediaKind::Video => ("VIDEO".to_string(), Color::Blue),
        MediaKind::Audio => ("AUDIO".to_string(), Color::Green),
        MediaKind::File => (info.badge(), Color::Yellow),
    };
    (
        format!(" {text} "),
        Style::default()
            .bg(color)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
}

/// Formats a byte count for display.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    match bytes {
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{b} B"),
    }
}

/// Builds the one-line media summary shown in previews and messages.
#[must_use]
pub fn media_line(info: &MediaInfo) -> Line<'static> {
    let (badge_text, badge_style) = badge(info);
    Line::from(vec![
        Span::styled(badge_text, badge_style),
        Span::raw(" "),
        Span::styled(
            info.name().to_string(),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ),
        Span::styled(
            format!(" ({})", format_size(info.size())),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Boxed preview of the attachment staged for the next message.
pub struct MediaPreview<'a> {
    info: &'a MediaInfo,
}

impl<'a> MediaPreview<'a> {
    /// Creates preview for staged media.
    #[must_use]
    pub const fn new(info: &'a MediaInfo) -> Self {
        Self { info }
    }
}

impl Widget for MediaPreview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Attachment ")
            .title_bottom(Line::from(" Ctrl+X remove ").right_aligned());

        Paragraph::new(media_line(self.info))
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(512, "512 B" ; "bytes")]
    #[test_case(1536, "1.5 KB" ; "kilobytes")]
    #[test_case(3 * 1024 * 1024, "3.0 MB" ; "megabytes")]
    fn test_format_size(bytes: u64, expected: &str) {
        assert_eq!(format_size(bytes), expected);
    }

    #[test_case("photo.jpg", "image/jpeg", " IMAGE " ; "image")]
    #[test_case("talk.mp4", "video/mp4", " VIDEO " ; "video")]
    #[test_case("memo.ogg", "audio/ogg", " AUDIO " ; "audio")]
    #[test_case("report.pdf", "application/pdf", " PDF " ; "file shows extension")]
    fn test_badge_by_kind(name: &str, mime: &str, expected: &str) {
        let info = MediaInfo::new(name, mime, 10);

        assert_eq!(badge(&info).0, expected);
    }

    #[test]
    fn test_media_line_contains_name() {
        let line = media_line(&MediaInfo::new("notes.txt", "text/plain", 2048));
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();

        assert_eq!(text, " TXT  notes.txt (2.0 KB)");
    }
}
