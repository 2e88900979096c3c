//! Login and registration screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Widget},
};

use crate::TITLE;
use crate::application::dto::{AuthRequest, Credentials};
use crate::presentation::events::{is_ctrl, is_quit_event, is_submit_event};
use crate::presentation::widgets::TextInput;

/// Auth screen state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Waiting for input.
    Idle,
    /// Request in flight.
    Submitting,
    /// Last attempt failed.
    Error(String),
}

/// Form tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTab {
    /// Existing account.
    Login,
    /// New account.
    Register,
}

impl AuthTab {
    const fn index(self) -> usize {
        match self {
            Self::Login => 0,
            Self::Register => 1,
        }
    }

    const fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthField {
    Name,
    Email,
    Password,
}

/// Action requested by the auth screen.
#[derive(Debug, Clone)]
pub enum AuthAction {
    /// Nothing to do.
    None,
    /// Submit the form.
    Submit(AuthRequest),
    /// Continue without an account.
    Guest,
    /// Quit the application.
    Quit,
}

/// Auth screen UI.
pub struct AuthScreen {
    tab: AuthTab,
    focus: AuthField,
    name_input: TextInput,
    email_input: TextInput,
    password_input: TextInput,
    state: AuthState,
}

impl AuthScreen {
    /// Creates new auth screen on the login tab.
    #[must_use]
    pub fn new() -> Self {
        let mut email_input = TextInput::new(" Email ").placeholder("you@example.com");
        email_input.set_focused(true);

        Self {
            tab: AuthTab::Login,
            focus: AuthField::Email,
            name_input: TextInput::new(" Name (optional) ").placeholder("How should we call you?"),
            email_input,
            password_input: TextInput::new(" Password ").password(),
            state: AuthState::Idle,
        }
    }

    /// Returns current state.
    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    /// Returns active tab.
    #[must_use]
    pub const fn tab(&self) -> AuthTab {
        self.tab
    }

    /// Sets submitting state.
    pub fn set_submitting(&mut self) {
        self.state = AuthState::Submitting;
    }

    /// Sets error state. Form fields are kept.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = AuthState::Error(message.into());
    }

    fn is_submitting(&self) -> bool {
        self.state == AuthState::Submitting
    }

    fn fields(&self) -> &'static [AuthField] {
        match self.tab {
            AuthTab::Login => &[AuthField::Email, AuthField::Password],
            AuthTab::Register => &[AuthField::Name, AuthField::Email, AuthField::Password],
        }
    }

    fn focus_field(&mut self, field: AuthField) {
        self.focus = field;
        self.name_input.set_focused(field == AuthField::Name);
        self.email_input.set_focused(field == AuthField::Email);
        self.password_input.set_focused(field == AuthField::Password);
    }

    fn cycle_focus(&mut self, forward: bool) {
        let fields = self.fields();
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % fields.len()
        } else {
            (current + fields.len() - 1) % fields.len()
        };
        self.focus_field(fields[next]);
    }

    fn toggle_tab(&mut self) {
        self.tab = self.tab.toggled();
        if !self.fields().contains(&self.focus) {
            self.focus_field(AuthField::Email);
        }
        if !self.is_submitting() {
            self.state = AuthState::Idle;
        }
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            AuthField::Name => &mut self.name_input,
            AuthField::Email => &mut self.email_input,
            AuthField::Password => &mut self.password_input,
        }
    }

    fn build_request(&self) -> Option<AuthRequest> {
        let credentials = Credentials::new(self.email_input.value(), self.password_input.value());
        if !credentials.is_complete() {
            return None;
        }

        Some(match self.tab {
            AuthTab::Login => AuthRequest::login(credentials),
            AuthTab::Register => {
                AuthRequest::register(credentials.with_name(self.name_input.value()))
            }
        })
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> AuthAction {
        if is_quit_event(&key) {
            return AuthAction::Quit;
        }

        if is_ctrl(&key, 'g') {
            return if self.is_submitting() {
                AuthAction::None
            } else {
                AuthAction::Guest
            };
        }

        if is_ctrl(&key, 'r') || key.code == KeyCode::F(2) {
            self.toggle_tab();
            return AuthAction::None;
        }

        if self.is_submitting() {
            return AuthAction::None;
        }

        if is_submit_event(&key) {
            return self
                .build_request()
                .map_or(AuthAction::None, AuthAction::Submit);
        }

        match key.code {
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            _ => {
                if self.focused_input().handle_key(key) {
                    self.state = AuthState::Idle;
                }
            }
        }

        AuthAction::None
    }

    fn status_line(&self) -> Line<'_> {
        match &self.state {
            AuthState::Idle => Line::from(Span::styled(
                self.tab_hint(),
                Style::default().fg(Color::DarkGray),
            )),
            AuthState::Submitting => Line::from(Span::styled(
                "Please wait...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            AuthState::Error(message) => Line::from(Span::styled(
                message.as_str(),
                Style::default().fg(Color::Red),
            )),
        }
    }

    const fn tab_hint(&self) -> &'static str {
        match self.tab {
            AuthTab::Login => "Sign in to continue your conversations",
            AuthTab::Register => "Create an account to keep your history",
        }
    }

    fn render_inner(&self, area: Rect, buf: &mut Buffer) {
        let field_count = u16::try_from(self.fields().len()).unwrap_or(3);
        let box_height = field_count * 3 + 8;

        let [_, center, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(box_height),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, content_area, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Min(50),
            Constraint::Fill(1),
        ])
        .areas(center);

        Clear.render(content_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {TITLE} "))
            .title_alignment(Alignment::Center);

        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let mut constraints = vec![Constraint::Length(1), Constraint::Length(1)];
        constraints.extend(self.fields().iter().map(|_| Constraint::Length(3)));
        constraints.extend([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ]);
        let areas = Layout::vertical(constraints).split(inner);

        Tabs::new(vec!["Login", "Register"])
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("|")
            .render(areas[0], buf);

        for (i, field) in self.fields().iter().enumerate() {
            let input = match field {
                AuthField::Name => &self.name_input,
                AuthField::Email => &self.email_input,
                AuthField::Password => &self.password_input,
            };
            input.render(areas[2 + i], buf);
        }

        let status_index = 2 + self.fields().len() + 1;
        Paragraph::new(self.status_line()).render(areas[status_index], buf);

        let hints = Line::from(vec![
            Span::styled("Enter: Submit", Style::default().fg(Color::DarkGray)),
            Span::raw(" | "),
            Span::styled("Ctrl+R: Switch tab", Style::default().fg(Color::DarkGray)),
            Span::raw(" | "),
            Span::styled("Ctrl+G: Guest", Style::default().fg(Color::DarkGray)),
            Span::raw(" | "),
            Span::styled("Esc: Quit", Style::default().fg(Color::DarkGray)),
        ]);
        Paragraph::new(hints).render(areas[status_index + 1], buf);
    }
}

impl Default for AuthScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &AuthScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_inner(area, buf);
    }
}
