//! Server configuration
//!
//! Resolved once at startup from command line flags with environment
//! variable fallbacks (`.env` is loaded before parsing).

use std::env;
use std::time::Duration;

/// Runtime configuration for the interview server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for HTTP server (browser connections)
    pub port: u16,
    /// Base URL of the Ollama instance
    pub ollama_url: String,
    /// Model tag requested from Ollama
    pub ollama_model: String,
    /// Full URL of the Piston execute endpoint
    pub piston_url: String,
    /// Idle lifetime of an interview session
    pub session_ttl: Duration,
}

impl ServerConfig {
    pub const DEFAULT_OLLAMA_URL: &'static str = "http://localhost:11434";
    pub const DEFAULT_OLLAMA_MODEL: &'static str = "qwen2.5-coder:7b";
    pub const DEFAULT_PISTON_URL: &'static str = "https://emkc.org/api/v2/piston/execute";

    /// Resolve a string setting: explicit flag wins, then the environment,
    /// then the built-in default
    pub fn resolve(flag: Option<String>, env_key: &str, default: &str) -> String {
        flag.or_else(|| env::var(env_key).ok())
            .unwrap_or_else(|| default.to_string())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            ollama_url: Self::DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: Self::DEFAULT_OLLAMA_MODEL.to_string(),
            piston_url: Self::DEFAULT_PISTON_URL.to_string(),
            session_ttl: Duration::from_secs(2 * 60 * 60),
        }
    }
}
