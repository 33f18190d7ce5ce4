//! Interview endpoints
//!
//! The chat turn endpoint plus the session-derived progress, reset, and
//! diagnostic endpoints. All interview state lives behind the session
//! store; these handlers only orchestrate one turn at a time.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::core::interpreter::{clean_response, generated_problem_or_fallback};
use crate::core::phases::{PostProcess, PromptSpec, TurnInput};
use crate::core::prompts::present_problem;
use crate::core::session::Phase;
use crate::error::ApiError;
use crate::server::CodeMock;
use crate::traits::{CodeSandbox, TextGenerator};
use crate::types::ChatRequest;
use crate::web::cookies::{session_cookie, session_id_from_headers};

/// One interview conversation turn
pub async fn chat<G, X>(
    State(server): State<CodeMock<G, X>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError>
where
    G: TextGenerator + 'static,
    X: CodeSandbox + 'static,
{
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    let session_id = session_id_from_headers(&headers).unwrap_or_else(Uuid::new_v4);
    let handle = server.store.get_or_create(session_id).await;

    // Held for the whole turn so concurrent tabs serialize on the session.
    let mut session = handle.lock().await;
    session.record_candidate(&request.message);

    let turn = TurnInput {
        message: &request.message,
        turn_type: request.turn_type,
        code: request.code.as_deref(),
        language: request.language.as_deref(),
        results: request.results.as_ref(),
    };
    let spec = server.controller.next(&mut session, &turn);

    let (response_text, synthesized_problem) = match spec {
        PromptSpec::Canned(text) => (text, None),
        PromptSpec::Generate {
            prompt,
            options,
            post,
        } => {
            let raw = server
                .generator
                .generate(&prompt, &options)
                .await
                .map_err(|reason| ApiError::Backend {
                    error: "Failed to communicate with the text-generation backend. \
                            Make sure Ollama is running."
                        .to_string(),
                    details: format!("{reason:?}"),
                })?;

            match post {
                PostProcess::Dialogue => (clean_response(&raw), None),
                PostProcess::SynthesizeProblem { difficulty } => {
                    let problem = generated_problem_or_fallback(&raw, server.controller.bank());
                    session.current_problem = Some(problem.clone());
                    (present_problem(&problem, difficulty), Some(problem))
                }
            }
        }
    };

    session.record_interviewer(&response_text);
    info!(
        "chat turn complete: phase={} progress={}",
        session.phase.as_str(),
        session.progress()
    );

    let mut body = json!({
        "response": response_text,
        "phase": session.phase,
        "progress": session.progress_details(),
    });
    if session.phase == Phase::Dsa {
        body["dsaStage"] = json!(session.dsa_stage.as_str());
    }
    if let Some(problem) = synthesized_problem {
        body["dsaProblem"] = serde_json::to_value(&problem).unwrap_or(Value::Null);
    }
    drop(session);

    let mut response = Json(body).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        session_cookie(session_id, server.config.session_ttl),
    );
    Ok(response)
}

/// Interview progress derived purely from session state; no side effects
pub async fn progress<G, X>(
    State(server): State<CodeMock<G, X>>,
    headers: HeaderMap,
) -> Json<Value>
where
    G: TextGenerator + 'static,
    X: CodeSandbox + 'static,
{
    let handle = match session_id_from_headers(&headers) {
        Some(id) => server.store.get(id).await,
        None => None,
    };

    match handle {
        None => Json(json!({ "phase": "not_started", "progress": 0 })),
        Some(handle) => {
            let session = handle.lock().await;
            Json(json!({
                "phase": session.phase,
                "progress": session.progress(),
                "details": session.progress_details(),
            }))
        }
    }
}

/// Clear the session so a new candidate can start; idempotent
pub async fn reset<G, X>(State(server): State<CodeMock<G, X>>, headers: HeaderMap) -> Json<Value>
where
    G: TextGenerator + 'static,
    X: CodeSandbox + 'static,
{
    if let Some(id) = session_id_from_headers(&headers) {
        server.store.remove(id).await;
    }
    info!("interview session reset - ready for new candidate");

    Json(json!({
        "message": "Interview session reset successfully! Code Mock is ready for a new candidate.",
        "status": "reset_complete"
    }))
}

/// Raw view of the current session (diagnostic)
pub async fn status<G, X>(State(server): State<CodeMock<G, X>>, headers: HeaderMap) -> Json<Value>
where
    G: TextGenerator + 'static,
    X: CodeSandbox + 'static,
{
    let handle = match session_id_from_headers(&headers) {
        Some(id) => server.store.get(id).await,
        None => None,
    };

    match handle {
        None => Json(json!({
            "interviewer": "Code Mock",
            "phase": "not_started",
            "state": null,
            "historyLength": 0,
            "selectedProblem": null,
        })),
        Some(handle) => {
            let session = handle.lock().await;
            Json(json!({
                "interviewer": "Code Mock",
                "phase": session.phase,
                "state": serde_json::to_value(&*session).unwrap_or(Value::Null),
                "historyLength": session.conversation.len(),
                "selectedProblem": session.current_problem.as_ref().map(|p| p.title.clone()),
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ForceTransitionRequest {
    #[serde(default)]
    pub phase: Option<String>,
}

/// Jump the session to an arbitrary phase (testing only)
pub async fn force_transition<G, X>(
    State(server): State<CodeMock<G, X>>,
    headers: HeaderMap,
    Json(request): Json<ForceTransitionRequest>,
) -> Result<Response, ApiError>
where
    G: TextGenerator + 'static,
    X: CodeSandbox + 'static,
{
    let target = match request.phase.as_deref() {
        None => Phase::Introduction,
        Some(tag) => Phase::parse(tag)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown phase: {tag}")))?,
    };

    let session_id = session_id_from_headers(&headers).unwrap_or_else(Uuid::new_v4);
    let handle = server.store.get_or_create(session_id).await;
    let mut session = handle.lock().await;
    session.force_phase(target);
    info!("forced transition to {}", target.as_str());

    let body = json!({
        "message": format!("Code Mock forced transition to {}", target.as_str()),
        "newState": serde_json::to_value(&*session).unwrap_or(Value::Null),
    });
    drop(session);

    let mut response = Json(body).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        session_cookie(session_id, server.config.session_ttl),
    );
    Ok(response)
}

/// Inspect the state machine without driving it (testing only)
pub async fn test_flow<G, X>(State(server): State<CodeMock<G, X>>, headers: HeaderMap) -> Json<Value>
where
    G: TextGenerator + 'static,
    X: CodeSandbox + 'static,
{
    let handle = match session_id_from_headers(&headers) {
        Some(id) => server.store.get(id).await,
        None => None,
    };

    let question_counts = server.controller.bank().question_counts();

    match handle {
        None => Json(json!({
            "currentState": null,
            "nextPhase": "introduction",
            "availableTopics": ["os", "oops", "dbms", "cns"],
            "fallbackProblems": 1,
            "coreQuestions": question_counts,
        })),
        Some(handle) => {
            let session = handle.lock().await;
            Json(json!({
                "currentState": serde_json::to_value(&*session).unwrap_or(Value::Null),
                "nextPhase": session.next_phase(),
                "availableTopics": session.available_topics(),
                "fallbackProblems": 1,
                "coreQuestions": question_counts,
            }))
        }
    }
}
