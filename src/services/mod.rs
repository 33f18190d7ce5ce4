//! Service implementations for the external backends and session storage

pub mod ollama;
pub mod piston;
pub mod session_store;

pub use ollama::OllamaClient;
pub use piston::PistonClient;
pub use session_store::InMemorySessionStore;
