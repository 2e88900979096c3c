//! Main application orchestrator.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures_util::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::application::dto::{AuthRequest, AuthResponse, OutgoingMessage};
use crate::application::use_cases::{
    AuthenticateUseCase, ResolveSessionUseCase, SendMessageUseCase,
};
use crate::domain::entities::{Attachment, Message, MessageIdGenerator, Session};
use crate::domain::errors::AuthError;
use crate::domain::ports::{AssistantApiPort, SessionStoragePort};
use crate::infrastructure::{AttachmentError, load_attachment};
use crate::presentation::events::EventResult;
use crate::presentation::ui::{
    AuthAction, AuthScreen, ChatKeyResult, ChatScreen, ChatScreenState,
};

const SPINNER_TICK_RATE: Duration = Duration::from_millis(120);

/// Results of spawned tasks, delivered on the event loop.
#[derive(Debug)]
enum Action {
    AuthFinished(Result<AuthResponse, AuthError>),
    ReplyReady {
        generation: u64,
        reply: Message,
    },
    AttachmentLoaded {
        generation: u64,
        result: Result<Attachment, AttachmentError>,
    },
}

enum CurrentScreen {
    Auth(AuthScreen),
    Chat(Box<ChatScreenState>),
}

/// Root container. Holds the session implicitly: the chat screen is
/// active exactly when a session exists.
pub struct App {
    screen: CurrentScreen,
    authenticate: AuthenticateUseCase,
    resolve_session: ResolveSessionUseCase,
    api: Arc<dyn AssistantApiPort>,
    ids: Arc<MessageIdGenerator>,
    persist: bool,
    timestamp_format: String,
    /// Bumped on every chat entry and logout; tags spawned task results.
    chat_generation: u64,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    tick: usize,
    running: bool,
}

impl App {
    /// Creates the application on the auth screen.
    #[must_use]
    pub fn new(
        api: Arc<dyn AssistantApiPort>,
        storage: Arc<dyn SessionStoragePort>,
        persist: bool,
        timestamp_format: impl Into<String>,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            screen: CurrentScreen::Auth(AuthScreen::new()),
            authenticate: AuthenticateUseCase::new(api.clone(), storage.clone()),
            resolve_session: ResolveSessionUseCase::new(storage),
            api,
            ids: Arc::new(MessageIdGenerator::new()),
            persist,
            timestamp_format: timestamp_format.into(),
            chat_generation: 0,
            action_tx,
            action_rx,
            tick: 0,
            running: true,
        }
    }

    /// Runs until the user quits.
    ///
    /// # Errors
    /// Returns error if drawing or reading the terminal fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        self.restore_session().await;
        self.run_event_loop(terminal).await?;

        info!("Application exiting normally");
        Ok(())
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut spinner_interval = interval(SPINNER_TICK_RATE);

        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            let terminal_event = terminal_events.next();

            tokio::select! {
                biased;

                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                    terminal.draw(|frame| self.render(frame))?;
                }

                Some(Ok(event)) = terminal_event => {
                    if self.handle_terminal_event(event).await == EventResult::Exit {
                        self.running = false;
                    }
                    terminal.draw(|frame| self.render(frame))?;
                }

                _ = spinner_interval.tick() => {
                    self.tick = self.tick.wrapping_add(1);
                    if self.is_busy() {
                        terminal.draw(|frame| self.render(frame))?;
                    }
                }
            }
        }

        Ok(())
    }

    async fn restore_session(&mut self) {
        match self.resolve_session.execute().await {
            Ok(Some(session)) => {
                info!(session = %session, "Restored persisted session");
                self.enter_chat(session);
            }
            Ok(None) => debug!("No persisted session"),
            Err(e) => warn!(error = %e, "Could not restore session"),
        }
    }

    fn is_busy(&self) -> bool {
        matches!(&self.screen, CurrentScreen::Chat(state) if state.is_loading())
    }

    fn render(&mut self, frame: &mut Frame) {
        match &mut self.screen {
            CurrentScreen::Auth(screen) => {
                frame.render_widget(&*screen, frame.area());
            }
            CurrentScreen::Chat(state) => {
                frame.render_stateful_widget(ChatScreen::new(self.tick), frame.area(), state);
            }
        }
    }

    async fn handle_terminal_event(&mut self, event: Event) -> EventResult {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key).await,
            _ => EventResult::Continue,
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        let result = match &mut self.screen {
            CurrentScreen::Auth(screen) => {
                let action = screen.handle_key(key);
                return self.handle_auth_action(action);
            }
            CurrentScreen::Chat(state) => state.handle_key(key),
        };

        match result {
            ChatKeyResult::Quit => return EventResult::Exit,
            ChatKeyResult::Logout => self.logout().await,
            ChatKeyResult::Send(outgoing) => self.spawn_send(outgoing),
            ChatKeyResult::PickAttachment(path) => self.spawn_attachment_load(path),
            ChatKeyResult::Consumed => {}
        }

        EventResult::Continue
    }

    fn handle_auth_action(&mut self, action: AuthAction) -> EventResult {
        match action {
            AuthAction::Quit => return EventResult::Exit,
            AuthAction::Submit(request) => self.submit_auth(request),
            AuthAction::Guest => self.submit_auth(AuthRequest::guest()),
            AuthAction::None => {}
        }
        EventResult::Continue
    }

    fn submit_auth(&mut self, request: AuthRequest) {
        let request = if self.persist {
            request
        } else {
            request.without_persistence()
        };

        if let CurrentScreen::Auth(screen) = &mut self.screen {
            screen.set_submitting();
        }

        let use_case = self.authenticate.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = use_case.execute(request).await;
            let _ = tx.send(Action::AuthFinished(result));
        });
    }

    fn spawn_send(&self, outgoing: OutgoingMessage) {
        let CurrentScreen::Chat(state) = &self.screen else {
            return;
        };

        let session = state.session().clone();
        let use_case = state.send_use_case().clone();
        let generation = self.chat_generation;
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let reply = use_case.execute(&session, outgoing).await;
            let _ = tx.send(Action::ReplyReady { generation, reply });
        });
    }

    fn spawn_attachment_load(&self, path: PathBuf) {
        if !matches!(self.screen, CurrentScreen::Chat(_)) {
            return;
        }

        let generation = self.chat_generation;
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = load_attachment(&path).await;
            let _ = tx.send(Action::AttachmentLoaded { generation, result });
        });
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::AuthFinished(result) => self.on_auth_finished(result),
            Action::ReplyReady { generation, reply } => match self.chat_for(generation) {
                Some(state) if state.is_loading() => state.finish_send(reply),
                _ => debug!(generation, "Discarding reply for inactive chat"),
            },
            Action::AttachmentLoaded { generation, result } => {
                let Some(state) = self.chat_for(generation) else {
                    debug!(generation, "Discarding attachment for inactive chat");
                    return;
                };
                match result {
                    Ok(attachment) => state.attach(attachment),
                    Err(e) => {
                        warn!(error = %e, "Could not load attachment");
                        state.set_notice(e.to_string());
                    }
                }
            }
        }
    }

    fn on_auth_finished(&mut self, result: Result<AuthResponse, AuthError>) {
        let CurrentScreen::Auth(screen) = &mut self.screen else {
            debug!("Ignoring authentication result outside the auth screen");
            return;
        };

        match result {
            Ok(response) => {
                info!(
                    session = %response.session,
                    persisted = response.persisted,
                    "Authenticated"
                );
                self.enter_chat(response.session);
            }
            Err(e) => {
                warn!(error = %e, "Authentication failed");
                screen.set_error(e.user_message());
            }
        }
    }

    fn chat_for(&mut self, generation: u64) -> Option<&mut ChatScreenState> {
        match &mut self.screen {
            CurrentScreen::Chat(state) if generation == self.chat_generation => {
                Some(state.as_mut())
            }
            _ => None,
        }
    }

    fn enter_chat(&mut self, session: Session) {
        self.chat_generation = self.chat_generation.wrapping_add(1);
        let send = SendMessageUseCase::new(self.api.clone(), self.ids.clone());
        self.screen = CurrentScreen::Chat(Box::new(ChatScreenState::new(
            session,
            send,
            &self.ids,
            self.timestamp_format.as_str(),
        )));
    }

    async fn logout(&mut self) {
        if let Err(e) = self.authenticate.logout().await {
            warn!(error = %e, "Logout left a persisted session behind");
        }
        info!("Logged out");
        self.chat_generation = self.chat_generation.wrapping_add(1);
        self.screen = CurrentScreen::Auth(AuthScreen::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AuthOutcome, CONNECTION_FAILED_REPLY, ChatReply, Timestamp};
    use crate::domain::errors::{ApiError, CONNECTION_FAILED};
    use crate::domain::ports::mocks::{MockAssistantApi, MockSessionStorage};
    use crate::presentation::ui::AuthState;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app_with(api: MockAssistantApi, storage: Arc<MockSessionStorage>, persist: bool) -> App {
        App::new(Arc::new(api), storage, persist, "%H:%M")
    }

    async fn press(app: &mut App, code: KeyCode) -> EventResult {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).await
    }

    async fn ctrl(app: &mut App, c: char) -> EventResult {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
            .await
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c)).await;
        }
    }

    async fn drain_one(app: &mut App) {
        let action = app.action_rx.recv().await.unwrap();
        app.handle_action(action);
    }

    fn chat(app: &App) -> &ChatScreenState {
        match &app.screen {
            CurrentScreen::Chat(state) => state.as_ref(),
            CurrentScreen::Auth(_) => panic!("expected chat screen"),
        }
    }

    fn auth(app: &App) -> &AuthScreen {
        match &app.screen {
            CurrentScreen::Auth(screen) => screen,
            CurrentScreen::Chat(_) => panic!("expected auth screen"),
        }
    }

    async fn login(app: &mut App) {
        type_text(app, "a@b.c").await;
        press(app, KeyCode::Tab).await;
        type_text(app, "pw").await;
        press(app, KeyCode::Enter).await;
        drain_one(app).await;
    }

    #[tokio::test]
    async fn test_restores_persisted_session() {
        let storage = Arc::new(MockSessionStorage::with_user_id("u-9"));
        let mut app = app_with(MockAssistantApi::new(), storage, true);

        app.restore_session().await;

        let session = chat(&app).session();
        assert_eq!(session.user_id(), "u-9");
        assert!(!session.is_guest());
    }

    #[tokio::test]
    async fn test_starts_on_auth_without_session() {
        let mut app = app_with(
            MockAssistantApi::new(),
            Arc::new(MockSessionStorage::new()),
            true,
        );

        app.restore_session().await;

        assert_eq!(auth(&app).state(), &AuthState::Idle);
    }

    #[tokio::test]
    async fn test_login_enters_chat_and_persists() {
        let storage = Arc::new(MockSessionStorage::new());
        let mut app = app_with(MockAssistantApi::new(), storage.clone(), true);

        login(&mut app).await;

        assert!(!chat(&app).session().is_guest());
        assert_eq!(
            storage.load_user_id().await.unwrap().as_deref(),
            Some("user-1")
        );
    }

    #[tokio::test]
    async fn test_no_persist_skips_storage() {
        let storage = Arc::new(MockSessionStorage::new());
        let mut app = app_with(MockAssistantApi::new(), storage.clone(), false);

        login(&mut app).await;

        assert_eq!(chat(&app).session().user_id(), "user-1");
        assert!(storage.load_user_id().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_guest_session() {
        let storage = Arc::new(MockSessionStorage::new());
        let api = MockAssistantApi::new().with_auth(Ok(AuthOutcome::Authenticated {
            user_id: "guest-7".to_string(),
            email: None,
        }));
        let mut app = app_with(api, storage.clone(), true);

        ctrl(&mut app, 'g').await;
        drain_one(&mut app).await;

        let session = chat(&app).session();
        assert!(session.is_guest());
        assert_eq!(session.user_id(), "guest-7");
        assert!(storage.load_user_id().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejected_login_shows_error() {
        let api = MockAssistantApi::new().with_auth(Ok(AuthOutcome::rejected("invalid credentials")));
        let mut app = app_with(api, Arc::new(MockSessionStorage::new()), true);

        login(&mut app).await;

        assert_eq!(
            auth(&app).state(),
            &AuthState::Error("invalid credentials".to_string())
        );
    }

    #[tokio::test]
    async fn test_transport_failure_shows_connection_message() {
        let api = MockAssistantApi::new().with_auth(Err(ApiError::transport("refused")));
        let mut app = app_with(api, Arc::new(MockSessionStorage::new()), true);

        login(&mut app).await;

        assert_eq!(
            auth(&app).state(),
            &AuthState::Error(CONNECTION_FAILED.to_string())
        );
    }

    #[tokio::test]
    async fn test_send_appends_reply() {
        let api = MockAssistantApi::new()
            .with_chat(Ok(ChatReply::answer("ok", Some("T".to_string()))));
        let mut app = app_with(api, Arc::new(MockSessionStorage::new()), true);
        login(&mut app).await;

        type_text(&mut app, "hello").await;
        press(&mut app, KeyCode::Enter).await;
        assert!(chat(&app).is_loading());
        drain_one(&mut app).await;

        let state = chat(&app);
        assert!(!state.is_loading());
        assert_eq!(state.messages().len(), 3);
        let reply = &state.messages()[2];
        assert_eq!(reply.content(), "ok");
        assert_eq!(reply.timestamp().as_str(), "T");
    }

    #[tokio::test]
    async fn test_send_transport_failure_single_message() {
        let api = MockAssistantApi::new().with_chat(Err(ApiError::transport("refused")));
        let mut app = app_with(api, Arc::new(MockSessionStorage::new()), true);
        login(&mut app).await;

        type_text(&mut app, "hello").await;
        press(&mut app, KeyCode::Enter).await;
        drain_one(&mut app).await;

        let state = chat(&app);
        assert!(!state.is_loading());
        assert_eq!(state.messages().len(), 3);
        assert_eq!(state.messages()[2].content(), CONNECTION_FAILED_REPLY);
    }

    #[tokio::test]
    async fn test_logout_clears_storage_and_drops_late_reply() {
        let storage = Arc::new(MockSessionStorage::new());
        let mut app = app_with(MockAssistantApi::new(), storage.clone(), true);
        login(&mut app).await;

        type_text(&mut app, "hello").await;
        press(&mut app, KeyCode::Enter).await;
        ctrl(&mut app, 'd').await;
        drain_one(&mut app).await;

        assert_eq!(auth(&app).state(), &AuthState::Idle);
        assert!(storage.load_user_id().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_reply_not_applied_after_relogin_as_same_user() {
        let mut app = app_with(
            MockAssistantApi::new(),
            Arc::new(MockSessionStorage::new()),
            true,
        );
        login(&mut app).await;
        let first_generation = app.chat_generation;

        ctrl(&mut app, 'd').await;
        login(&mut app).await;
        assert_eq!(chat(&app).session().user_id(), "user-1");

        type_text(&mut app, "hello").await;
        press(&mut app, KeyCode::Enter).await;
        let stale = Message::assistant(app.ids.next_id(), "stale", Timestamp::now());
        app.handle_action(Action::ReplyReady {
            generation: first_generation,
            reply: stale,
        });

        assert!(chat(&app).is_loading());
        assert_eq!(chat(&app).messages().len(), 2);

        drain_one(&mut app).await;

        let state = chat(&app);
        assert!(!state.is_loading());
        assert_eq!(state.messages().len(), 3);
        assert_ne!(state.messages()[2].content(), "stale");
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = app_with(
            MockAssistantApi::new(),
            Arc::new(MockSessionStorage::new()),
            true,
        );
        assert_eq!(press(&mut app, KeyCode::Esc).await, EventResult::Exit);

        login(&mut app).await;
        assert_eq!(ctrl(&mut app, 'c').await, EventResult::Exit);
    }
}
