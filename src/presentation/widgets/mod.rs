mod file_explorer;
mod header_bar;
mod input;
mod media_preview;
mod message_pane;
mod status_bar;

pub use file_explorer::{FileExplorerAction, FileExplorerComponent};
pub use header_bar::HeaderBar;
pub use input::TextInput;
pub use media_preview::{MediaPreview, format_size, media_line};
pub use message_pane::{MessagePane, MessagePaneState};
pub use status_bar::{StatusBar, StatusLevel};
