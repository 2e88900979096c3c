//! Session storage adapters.

mod disabled_storage;
mod state_file_storage;

pub use disabled_storage::DisabledSessionStorage;
pub use state_file_storage::StateFileSessionStorage;
