//! Piston client
//!
//! Dispatches an assembled program to the public Piston execute API and
//! captures its stdout/stderr. One HTTP round trip per test case, awaited
//! in order by the runner; no retries.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::traits::CodeSandbox;
use crate::types::{BackendFailure, ExecutionOutput, Language};

/// Client for the remote code-execution sandbox
pub struct PistonClient {
    client: reqwest::Client,
    execute_url: String,
}

impl PistonClient {
    pub fn new(execute_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            execute_url,
        }
    }
}

#[async_trait]
impl CodeSandbox for PistonClient {
    async fn execute(
        &self,
        language: Language,
        version: &str,
        source: &str,
    ) -> Result<ExecutionOutput, BackendFailure> {
        let body = json!({
            "language": language.as_str(),
            "version": version,
            "files": [{ "content": source }]
        });

        debug!(
            "dispatching {} {} program ({} bytes) to sandbox",
            language.as_str(),
            version,
            source.len()
        );

        let response = self
            .client
            .post(&self.execute_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendFailure::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return match response.status().as_u16() {
                429 => Err(BackendFailure::RateLimitExceeded),
                503 => Err(BackendFailure::ServiceUnavailable),
                _ => Err(BackendFailure::ServerError(response.status().to_string())),
            };
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| BackendFailure::InvalidResponse(format!("failed to parse response: {e}")))?;

        let run = response_json
            .get("run")
            .ok_or_else(|| BackendFailure::InvalidResponse("no run object in body".to_string()))?;

        Ok(ExecutionOutput {
            stdout: run
                .get("stdout")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            stderr: run
                .get("stderr")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}
