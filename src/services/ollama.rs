//! Ollama client
//!
//! Thin reqwest wrapper over Ollama's `/api/generate` endpoint. The
//! response is treated as untrusted free text; all shape-checking happens
//! in the interpreter, not here.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::traits::TextGenerator;
use crate::types::{BackendFailure, GenerationOptions};

/// Client for a locally hosted Ollama instance
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: &'a GenerationOptions,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, BackendFailure> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options,
        };

        debug!("sending {} char prompt to {}", prompt.len(), url);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendFailure::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return match response.status().as_u16() {
                404 => Err(BackendFailure::ModelUnavailable(self.model.clone())),
                429 => Err(BackendFailure::RateLimitExceeded),
                503 => Err(BackendFailure::ServiceUnavailable),
                _ => Err(BackendFailure::ServerError(response.status().to_string())),
            };
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| BackendFailure::InvalidResponse(format!("failed to parse response: {e}")))?;

        response_json
            .get("response")
            .and_then(|text| text.as_str())
            .map(|text| text.to_string())
            .ok_or_else(|| BackendFailure::InvalidResponse("no response field in body".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_returns_response_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({
                "model": "qwen2.5-coder:7b",
                "stream": false
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": "Hello candidate!"})),
            )
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri(), "qwen2.5-coder:7b".to_string());
        let text = client
            .generate("say hello", &GenerationOptions::dialogue())
            .await
            .unwrap();
        assert_eq!(text, "Hello candidate!");
    }

    #[tokio::test]
    async fn test_missing_response_field_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri(), "qwen2.5-coder:7b".to_string());
        let error = client
            .generate("hi", &GenerationOptions::dialogue())
            .await
            .unwrap_err();
        assert!(matches!(error, BackendFailure::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_status_codes_map_to_failures() {
        for (status, expected_unavailable) in [(503u16, true), (500u16, false)] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/generate"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let client = OllamaClient::new(server.uri(), "qwen2.5-coder:7b".to_string());
            let error = client
                .generate("hi", &GenerationOptions::dialogue())
                .await
                .unwrap_err();

            if expected_unavailable {
                assert_eq!(error, BackendFailure::ServiceUnavailable);
            } else {
                assert!(matches!(error, BackendFailure::ServerError(_)));
            }
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Nothing listens on this port
        let client = OllamaClient::new("http://127.0.0.1:1".to_string(), "m".to_string());
        let error = client
            .generate("hi", &GenerationOptions::dialogue())
            .await
            .unwrap_err();
        assert!(matches!(error, BackendFailure::NetworkError(_)));
    }
}
