//! Conversation message entity.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, Utc};

use super::MediaInfo;

/// Synthetic assistant greeting that opens every conversation.
pub const GREETING: &str = "Hello! I'm your Mental Health Assistant. I'm here to listen and support you. How are you feeling today?";

/// Reply used when the server answered with neither a response nor an error.
pub const RECEIVED_REPLY: &str = "I received your message.";

/// Local acknowledgement for an attachment sent without text.
pub const FILE_RECEIVED_REPLY: &str =
    "Thank you for sharing that file. I've processed it and added it to your context.";

/// Reply appended when the server could not be reached.
pub const CONNECTION_FAILED_REPLY: &str =
    "Sorry, I couldn't connect to the server. Please try again.";

/// Unique, generation-ordered message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues message identifiers from the wall clock in milliseconds.
///
/// Identifiers are strictly increasing even when several are issued within
/// the same millisecond or the clock steps backwards, so sorting by id
/// preserves creation order.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: AtomicU64,
}

impl MessageIdGenerator {
    /// Creates a new generator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Returns the next identifier.
    pub fn next_id(&self) -> MessageId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(previous.saturating_add(1));
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::SeqCst,
                Ordering::Relaxed,
            ) {
                Ok(_) => return MessageId(candidate),
                Err(actual) => previous = actual,
            }
        }
    }
}

/// ISO-8601 timestamp kept in the textual form it was produced in.
///
/// Server timestamps may be naive (no offset); those are read as local time
/// when formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp(String);

impl Timestamp {
    const NAIVE_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S%.f";

    /// Returns the current time in UTC.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Wraps a timestamp received from the server.
    #[must_use]
    pub fn from_server(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw ISO-8601 text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses into local time.
    #[must_use]
    pub fn to_local(&self) -> Option<DateTime<Local>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&self.0) {
            return Some(parsed.with_timezone(&Local));
        }
        NaiveDateTime::parse_from_str(&self.0, Self::NAIVE_FORMAT)
            .ok()
            .and_then(|naive| naive.and_local_timezone(Local).earliest())
    }

    /// Formats with a chrono format string, falling back to the raw text
    /// when the timestamp or the format string is invalid.
    #[must_use]
    pub fn format(&self, fmt: &str) -> String {
        let Some(dt) = self.to_local() else {
            return self.0.clone();
        };
        let mut out = String::new();
        match write!(out, "{}", dt.format(fmt)) {
            Ok(()) => out,
            Err(_) => self.0.clone(),
        }
    }

    /// Returns whether `fmt` is a usable chrono format string.
    #[must_use]
    pub fn is_valid_format(fmt: &str) -> bool {
        !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single entry in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    content: String,
    is_user: bool,
    timestamp: Timestamp,
    media: Option<MediaInfo>,
}

impl Message {
    /// Creates a message authored by the user, stamped now.
    #[must_use]
    pub fn user(id: MessageId, content: impl Into<String>, media: Option<MediaInfo>) -> Self {
        Self {
            id,
            content: content.into(),
            is_user: true,
            timestamp: Timestamp::now(),
            media,
        }
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(id: MessageId, content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            id,
            content: content.into(),
            is_user: false,
            timestamp,
            media: None,
        }
    }

    /// Creates the opening assistant greeting.
    #[must_use]
    pub fn greeting(id: MessageId) -> Self {
        Self::assistant(id, GREETING, Timestamp::now())
    }

    /// Returns message id.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns whether the user authored this message.
    #[must_use]
    pub const fn is_user(&self) -> bool {
        self.is_user
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// Returns attached media, if any.
    #[must_use]
    pub const fn media(&self) -> Option<&MediaInfo> {
        self.media.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let generator = MessageIdGenerator::new();
        let ids: Vec<MessageId> = (0..100).map(|_| generator.next_id()).collect();

        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_ids_track_wall_clock() {
        let generator = MessageIdGenerator::new();
        let before = u64::try_from(Utc::now().timestamp_millis()).unwrap();

        assert!(generator.next_id().as_u64() >= before);
    }

    #[test]
    fn test_naive_server_timestamp_parses() {
        let ts = Timestamp::from_server("2024-05-01T14:03:27.123456");
        let local = ts.to_local().expect("naive timestamp should parse");

        assert_eq!(local.format("%H:%M").to_string(), "14:03");
    }

    #[test]
    fn test_rfc3339_timestamp_parses() {
        let ts = Timestamp::from_server("2024-05-01T14:03:27Z");
        assert!(ts.to_local().is_some());
    }

    #[test]
    fn test_unparseable_timestamp_formats_raw() {
        let ts = Timestamp::from_server("yesterday");
        assert_eq!(ts.format("%H:%M"), "yesterday");
    }

    #[test]
    fn test_invalid_format_falls_back_to_raw() {
        let ts = Timestamp::from_server("2024-03-01T10:20:30Z");

        assert_eq!(ts.format("%Q"), "2024-03-01T10:20:30Z");
        assert!(!Timestamp::is_valid_format("%Q"));
        assert!(Timestamp::is_valid_format("%H:%M"));
    }

    #[test]
    fn test_greeting_is_assistant() {
        let message = Message::greeting(MessageIdGenerator::new().next_id());

        assert!(!message.is_user());
        assert_eq!(message.content(), GREETING);
        assert!(message.media().is_none());
    }
}
