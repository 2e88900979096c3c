//! Mindline - a terminal client for the Mental Health Assistant.
//!
//! This crate provides a terminal chat client with clean architecture:
//! authentication (login, registration, guest access), a conversation
//! screen with attachment staging, and a thin HTTP adapter for the
//! assistant backend.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing UI components and event handling.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "mindline";

/// Product title shown in the UI.
pub const TITLE: &str = "Mental Health Assistant";
