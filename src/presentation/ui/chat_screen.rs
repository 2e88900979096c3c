//! Chat screen.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{StatefulWidget, Widget},
};
use tracing::debug;

use crate::TITLE;
use crate::application::dto::OutgoingMessage;
use crate::application::use_cases::SendMessageUseCase;
use crate::domain::entities::{Attachment, Message, MessageIdGenerator, Session};
use crate::presentation::events::{is_ctrl, is_submit_event};
use crate::presentation::widgets::{
    FileExplorerAction, FileExplorerComponent, HeaderBar, MediaPreview, MessagePane,
    MessagePaneState, StatusBar, TextInput,
};

const FOOTER_TEXT: &str = "Your conversations are private and secure";
const KEY_HINTS: &str = "Ctrl+O attach | Ctrl+D logout | Ctrl+C quit";

/// Result of chat key handling.
#[derive(Debug)]
pub enum ChatKeyResult {
    /// Key handled locally.
    Consumed,
    /// Quit the application.
    Quit,
    /// End the session.
    Logout,
    /// User message appended; obtain the reply for this payload.
    Send(OutgoingMessage),
    /// Load the picked file as the pending attachment.
    PickAttachment(PathBuf),
}

/// Chat screen state.
pub struct ChatScreenState {
    session: Session,
    messages: Vec<Message>,
    input: TextInput,
    pending: Option<Attachment>,
    loading: bool,
    pane_state: MessagePaneState,
    explorer: Option<FileExplorerComponent>,
    send: SendMessageUseCase,
    timestamp_format: String,
    notice: Option<String>,
}

impl ChatScreenState {
    /// Creates chat state for a session, opening with the greeting.
    #[must_use]
    pub fn new(
        session: Session,
        send: SendMessageUseCase,
        ids: &MessageIdGenerator,
        timestamp_format: impl Into<String>,
    ) -> Self {
        let mut input = TextInput::new(" Message ").placeholder("Type your message...");
        input.set_focused(true);

        Self {
            session,
            messages: vec![Message::greeting(ids.next_id())],
            input,
            pending: None,
            loading: false,
            pane_state: MessagePaneState::new(),
            explorer: None,
            send,
            timestamp_format: timestamp_format.into(),
            notice: None,
        }
    }

    /// Returns session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns messages in display order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns whether a reply is awaited.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the staged attachment.
    #[must_use]
    pub const fn pending(&self) -> Option<&Attachment> {
        self.pending.as_ref()
    }

    /// Returns whether the file picker is open.
    #[must_use]
    pub const fn is_picking(&self) -> bool {
        self.explorer.is_some()
    }

    /// Returns the send use case bound to this screen.
    #[must_use]
    pub const fn send_use_case(&self) -> &SendMessageUseCase {
        &self.send
    }

    /// Stages an attachment for the next send.
    pub fn attach(&mut self, attachment: Attachment) {
        debug!(file = %attachment.name(), "Attachment staged");
        self.pending = Some(attachment);
        self.notice = None;
    }

    /// Shows a transient notice in the footer.
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Appends the assistant reply and clears the loading flag.
    pub fn finish_send(&mut self, reply: Message) {
        self.push_message(reply);
        self.loading = false;
    }

    fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.pane_state.scroll_to_bottom();
    }

    /// Appends the user's message and takes input and attachment for
    /// sending. Returns `None` when there is nothing to send or a reply is
    /// still awaited.
    pub fn begin_send(&mut self) -> Option<OutgoingMessage> {
        if self.loading {
            return None;
        }

        let outgoing = OutgoingMessage::new(self.input.value(), self.pending.clone());
        let message = self.send.compose(&outgoing)?;

        self.input.clear();
        self.pending = None;
        self.push_message(message);
        self.loading = true;
        self.notice = None;
        Some(outgoing)
    }

    /// Handles key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> ChatKeyResult {
        if let Some(explorer) = self.explorer.as_mut() {
            return match explorer.handle_key(key) {
                FileExplorerAction::SelectFile(path) => {
                    self.explorer = None;
                    ChatKeyResult::PickAttachment(path)
                }
                FileExplorerAction::Close => {
                    self.explorer = None;
                    ChatKeyResult::Consumed
                }
                FileExplorerAction::None => ChatKeyResult::Consumed,
            };
        }

        if is_ctrl(&key, 'c') {
            return ChatKeyResult::Quit;
        }
        if is_ctrl(&key, 'd') {
            return ChatKeyResult::Logout;
        }
        if is_ctrl(&key, 'o') {
            if !self.loading {
                self.explorer = Some(FileExplorerComponent::new());
            }
            return ChatKeyResult::Consumed;
        }
        if is_ctrl(&key, 'x') {
            self.pending = None;
            return ChatKeyResult::Consumed;
        }
        if is_submit_event(&key) {
            return self
                .begin_send()
                .map_or(ChatKeyResult::Consumed, ChatKeyResult::Send);
        }

        match key.code {
            KeyCode::Up => self.pane_state.scroll_up(),
            KeyCode::Down => self.pane_state.scroll_down(),
            KeyCode::PageUp => self.pane_state.page_up(),
            KeyCode::PageDown => self.pane_state.page_down(),
            _ => {
                if self.input.handle_key(key) {
                    self.notice = None;
                }
            }
        }

        ChatKeyResult::Consumed
    }

    #[cfg(test)]
    fn open_explorer_at(&mut self, dir: PathBuf) {
        self.explorer = Some(FileExplorerComponent::with_dir(dir));
    }
}

/// Chat screen widget.
pub struct ChatScreen {
    tick: usize,
}

impl ChatScreen {
    /// Creates chat screen at animation frame `tick`.
    #[must_use]
    pub const fn new(tick: usize) -> Self {
        Self { tick }
    }
}

impl StatefulWidget for ChatScreen {
    type State = ChatScreenState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let preview_height = if state.pending.is_some() { 3 } else { 0 };
        let [header_area, messages_area, preview_area, input_area, footer_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(preview_height),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .areas(area);

        render_header_bar(state, self.tick, header_area, buf);
        render_message_pane(state, messages_area, buf);
        if let Some(attachment) = &state.pending {
            MediaPreview::new(attachment.info()).render(preview_area, buf);
        }
        (&state.input).render(input_area, buf);
        render_footer_bar(state, footer_area, buf);

        if let Some(explorer) = state.explorer.as_mut() {
            explorer.render(popup_area(area), buf);
        }
    }
}

fn render_header_bar(state: &ChatScreenState, tick: usize, area: Rect, buf: &mut Buffer) {
    let header =
        HeaderBar::new(TITLE, state.session.label()).busy(state.loading.then_some(tick));
    header.render(area, buf);
}

fn render_message_pane(state: &mut ChatScreenState, area: Rect, buf: &mut Buffer) {
    let pane = MessagePane::new(&state.messages, &state.timestamp_format).thinking(state.loading);
    pane.render(area, buf, &mut state.pane_state);
}

fn render_footer_bar(state: &ChatScreenState, area: Rect, buf: &mut Buffer) {
    let footer = match &state.notice {
        Some(notice) => StatusBar::error(notice.as_str()),
        None => StatusBar::new().left(FOOTER_TEXT).right(KEY_HINTS),
    };
    (&footer).render(area, buf);
}

fn popup_area(area: Rect) -> Rect {
    let [vertical] = Layout::vertical([Constraint::Percentage(70)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(70)])
        .flex(Flex::Center)
        .areas(vertical);
    popup
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::entities::{GREETING, Timestamp};
    use crate::domain::ports::mocks::MockAssistantApi;
    use bytes::Bytes;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn state(session: Session) -> ChatScreenState {
        let ids = Arc::new(MessageIdGenerator::new());
        let send = SendMessageUseCase::new(Arc::new(MockAssistantApi::new()), ids.clone());
        ChatScreenState::new(session, send, &ids, "%H:%M")
    }

    fn type_text(state: &mut ChatScreenState, text: &str) {
        for c in text.chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn attachment() -> Attachment {
        Attachment::new("scan.pdf", "application/pdf", Bytes::from_static(b"%PDF"))
    }

    fn screen_text(state: &mut ChatScreenState) -> String {
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        ChatScreen::new(0).render(area, &mut buf, state);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_starts_with_greeting() {
        let state = state(Session::authenticated("u1"));

        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].content(), GREETING);
        assert!(!state.messages()[0].is_user());
    }

    #[test]
    fn test_blank_input_is_noop() {
        let mut state = state(Session::authenticated("u1"));
        type_text(&mut state, "   ");

        assert!(matches!(
            state.handle_key(key(KeyCode::Enter)),
            ChatKeyResult::Consumed
        ));
        assert_eq!(state.messages().len(), 1);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_send_appends_user_message_and_sets_loading() {
        let mut state = state(Session::authenticated("u1"));
        type_text(&mut state, "hello");

        let ChatKeyResult::Send(outgoing) = state.handle_key(key(KeyCode::Enter)) else {
            panic!("expected send");
        };

        assert_eq!(outgoing.text, "hello");
        assert_eq!(state.messages().len(), 2);
        assert!(state.messages()[1].is_user());
        assert_eq!(state.messages()[1].content(), "hello");
        assert!(state.is_loading());
        assert!(state.input.value().is_empty());
    }

    #[test]
    fn test_send_refused_while_loading() {
        let mut state = state(Session::authenticated("u1"));
        type_text(&mut state, "one");
        state.handle_key(key(KeyCode::Enter));
        type_text(&mut state, "two");

        assert!(matches!(
            state.handle_key(key(KeyCode::Enter)),
            ChatKeyResult::Consumed
        ));
        assert_eq!(state.messages().len(), 2);
    }

    #[test]
    fn test_attachment_only_send() {
        let mut state = state(Session::guest("g1"));
        state.attach(attachment());

        let ChatKeyResult::Send(outgoing) = state.handle_key(key(KeyCode::Enter)) else {
            panic!("expected send");
        };

        assert!(outgoing.attachment.is_some());
        assert!(state.pending().is_none());
        let sent = &state.messages()[1];
        assert_eq!(sent.content(), "Uploaded: scan.pdf");
        assert_eq!(sent.media().map(|m| m.name()), Some("scan.pdf"));
    }

    #[test]
    fn test_finish_send_clears_loading() {
        let ids = MessageIdGenerator::new();
        let mut state = state(Session::authenticated("u1"));
        type_text(&mut state, "hi");
        state.handle_key(key(KeyCode::Enter));

        state.finish_send(Message::assistant(
            ids.next_id(),
            "ok",
            Timestamp::from_server("T"),
        ));

        assert!(!state.is_loading());
        assert_eq!(state.messages().last().map(Message::content), Some("ok"));
    }

    #[test]
    fn test_remove_attachment() {
        let mut state = state(Session::authenticated("u1"));
        state.attach(attachment());

        state.handle_key(ctrl('x'));

        assert!(state.pending().is_none());
    }

    #[test]
    fn test_picker_refused_while_loading() {
        let mut state = state(Session::authenticated("u1"));
        type_text(&mut state, "hi");
        state.handle_key(key(KeyCode::Enter));

        state.handle_key(ctrl('o'));

        assert!(!state.is_picking());
    }

    #[test]
    fn test_picker_selection() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("note.txt"), b"x").unwrap();
        let mut state = state(Session::authenticated("u1"));
        state.open_explorer_at(dir.path().to_path_buf());

        state.handle_key(key(KeyCode::Down));
        let result = state.handle_key(key(KeyCode::Enter));

        assert!(
            matches!(result, ChatKeyResult::PickAttachment(path) if path == dir.path().join("note.txt"))
        );
        assert!(!state.is_picking());
    }

    #[test]
    fn test_session_keys() {
        let mut state = state(Session::authenticated("u1"));

        assert!(matches!(state.handle_key(ctrl('d')), ChatKeyResult::Logout));
        assert!(matches!(state.handle_key(ctrl('c')), ChatKeyResult::Quit));
    }

    #[test]
    fn test_render_shows_session_label_and_footer() {
        let mut guest = state(Session::guest("g1"));
        let text = screen_text(&mut guest);
        assert!(text.contains("Guest Session"));
        assert!(text.contains(FOOTER_TEXT));

        let mut member = state(Session::authenticated("u1"));
        assert!(screen_text(&mut member).contains("Personalized Support"));
    }

    #[test]
    fn test_render_notice_and_thinking() {
        let mut state = state(Session::authenticated("u1"));
        type_text(&mut state, "hi");
        state.handle_key(key(KeyCode::Enter));
        state.set_notice("Unsupported file type");

        let text = screen_text(&mut state);

        assert!(text.contains("Thinking..."));
        assert!(text.contains("Unsupported file type"));
    }
}
