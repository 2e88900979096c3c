//! Loading user-selected files as attachments.

use std::path::Path;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

use crate::domain::entities::Attachment;

/// Document extensions accepted besides image, video and audio.
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt"];

/// Attachment loading errors.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum AttachmentError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns whether the file type may be attached.
#[must_use]
pub fn is_accepted(path: &Path) -> bool {
    let is_document = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        });
    if is_document {
        return true;
    }

    mime_guess::from_path(path).iter().any(|mime| {
        let top = mime.type_();
        top == mime_guess::mime::IMAGE
            || top == mime_guess::mime::VIDEO
            || top == mime_guess::mime::AUDIO
    })
}

/// Reads a file into an attachment, guessing its MIME type from the extension.
///
/// # Errors
/// Returns error if the type is not accepted or the file cannot be read.
pub async fn load_attachment(path: &Path) -> Result<Attachment, AttachmentError> {
    let display = path.display().to_string();
    if !is_accepted(path) {
        return Err(AttachmentError::Unsupported(display));
    }

    let data = tokio::fs::read(path)
        .await
        .map_err(|source| AttachmentError::Read {
            path: display.clone(),
            source,
        })?;

    let name = path
        .file_name()
        .map_or_else(|| display.clone(), |n| n.to_string_lossy().into_owned());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    debug!(file = %name, %mime, size = data.len(), "Loaded attachment");

    Ok(Attachment::new(name, mime.essence_str(), Bytes::from(data)))
}
