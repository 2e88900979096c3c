mod assistant_api_port;
mod session_storage_port;

pub use assistant_api_port::AssistantApiPort;
pub use session_storage_port::SessionStoragePort;
