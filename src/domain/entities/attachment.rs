//! Attachment staged for upload, and the media summary kept on messages.

use std::fmt;

use bytes::Bytes;

/// Media category used to pick a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Video clip.
    Video,
    /// Audio recording.
    Audio,
    /// Any other document.
    File,
}

impl MediaKind {
    /// Derives the kind from the top-level MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.split('/').next().unwrap_or_default() {
            "image" => Self::Image,
            "video" => Self::Video,
            "audio" => Self::Audio,
            _ => Self::File,
        }
    }

    /// Returns a short label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display-only description of an attachment.
///
/// Holds no file contents, so messages that reference media never keep the
/// uploaded bytes alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfo {
    kind: MediaKind,
    name: String,
    mime: String,
    size: u64,
}

impl MediaInfo {
    /// Creates media info.
    #[must_use]
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        let mime = mime.into();
        Self {
            kind: MediaKind::from_mime(&mime),
            name: name.into(),
            mime,
            size,
        }
    }

    /// Returns media kind.
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Returns file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns MIME type.
    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Returns size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the upper-cased file extension used as a badge.
    #[must_use]
    pub fn badge(&self) -> String {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .map_or_else(|| "FILE".to_string(), str::to_uppercase)
    }
}

/// A user-selected file staged for sending.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    info: MediaInfo,
    data: Bytes,
}

impl Attachment {
    /// Creates attachment from loaded file contents.
    #[must_use]
    pub fn new(name: impl Into<String>, mime: impl Into<String>, data: Bytes) -> Self {
        let size = data.len() as u64;
        Self {
            info: MediaInfo::new(name, mime, size),
            data,
        }
    }

    /// Returns the display summary.
    #[must_use]
    pub const fn info(&self) -> &MediaInfo {
        &self.info
    }

    /// Returns file name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.info.name()
    }

    /// Returns media kind.
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        self.info.kind()
    }

    /// Returns file contents.
    #[must_use]
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    /// Splits into summary and contents.
    #[must_use]
    pub fn into_parts(self) -> (MediaInfo, Bytes) {
        (self.info, self.data)
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("info", &self.info)
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .finish()
    }
}
