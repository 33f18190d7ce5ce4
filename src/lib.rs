//! Code Mock interview backend
//!
//! A mock technical-interview server: a scripted multi-phase dialogue
//! driven by a local text-generation backend, plus candidate code
//! execution through a remote sandbox. All session state is process
//! memory behind a cookie-keyed store.

pub mod config;
pub mod core;
pub mod error;
pub mod server;
pub mod services;
pub mod traits;
pub mod types;
pub mod web;

// Re-export main types
pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use server::CodeMock;
pub use types::*;

// Re-export trait definitions
pub use traits::{CodeSandbox, TextGenerator};

// Re-export service implementations
pub use services::{InMemorySessionStore, OllamaClient, PistonClient};
