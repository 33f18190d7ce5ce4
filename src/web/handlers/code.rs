//! Code execution endpoint
//!
//! Runs candidate code against the supplied test cases (visible plus
//! hidden for submissions) and reports per-case pass/fail.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::time::Instant;
use tracing::info;

use crate::core::runner::run_test_cases;
use crate::error::ApiError;
use crate::server::CodeMock;
use crate::traits::{CodeSandbox, TextGenerator};
use crate::types::{ExecuteRequest, Language};

/// Execute candidate code against its test cases
pub async fn execute<G, X>(
    State(server): State<CodeMock<G, X>>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<Value>, ApiError>
where
    G: TextGenerator + 'static,
    X: CodeSandbox + 'static,
{
    if request.code.trim().is_empty() || request.language.trim().is_empty() {
        return Err(ApiError::ExecutionBadRequest(
            "Code and language are required".to_string(),
        ));
    }

    let language = Language::parse(&request.language).ok_or_else(|| {
        ApiError::ExecutionBadRequest(format!("Unsupported language: {}", request.language))
    })?;

    let started = Instant::now();
    let results = run_test_cases(
        server.sandbox.as_ref(),
        language,
        &request.code,
        &request.test_cases,
    )
    .await
    .map_err(|reason| ApiError::ExecutionFailed {
        error: "Failed to execute code".to_string(),
        details: format!("{reason:?}"),
    })?;
    let runtime_ms = started.elapsed().as_millis() as u64;

    let passed = results.iter().filter(|result| result.passed).count();
    info!(
        "executed {} {} test cases: {passed} passed ({runtime_ms} ms)",
        results.len(),
        language.as_str(),
    );

    let mut data = json!({
        "language": language.as_str(),
        "version": language.version(),
        "testResults": results,
        "runtime": runtime_ms,
    });
    if request.is_submission {
        let status = if passed == results.len() {
            "Accepted"
        } else {
            "Wrong Answer"
        };
        data["submissionStatus"] = json!(status);
    }

    Ok(Json(json!({ "success": true, "data": data })))
}
