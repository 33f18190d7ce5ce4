//! Service trait definitions for dependency injection
//!
//! The two external collaborators are abstracted behind these traits so the
//! phase machine and handlers can be tested without live backends.

use async_trait::async_trait;

use crate::types::{BackendFailure, ExecutionOutput, GenerationOptions, Language};

/// Text-generation backend (Ollama in production)
#[mockall::automock]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt` and return the raw generated text
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, BackendFailure>;
}

/// Remote code-execution sandbox (Piston in production)
#[mockall::automock]
#[async_trait]
pub trait CodeSandbox: Send + Sync {
    /// Run `source` and capture stdout/stderr
    async fn execute(
        &self,
        language: Language,
        version: &str,
        source: &str,
    ) -> Result<ExecutionOutput, BackendFailure>;
}
