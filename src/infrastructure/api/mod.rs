//! Assistant backend HTTP adapter.

mod client;
pub mod dto;

pub use client::HttpAssistantClient;
