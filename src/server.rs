//! Main server implementation
//!
//! The `CodeMock` struct wires the phase controller, session store, and
//! injected backend clients together and exposes them through the axum
//! router. Generic over the two external services so tests can swap in
//! mocks.

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::core::bank::ProblemBank;
use crate::core::phases::PhaseController;
use crate::error::{ServerError, ServerResult};
use crate::services::session_store::InMemorySessionStore;
use crate::traits::{CodeSandbox, TextGenerator};
use crate::web::handlers::{code, interview};

/// Interval between expired-session sweeps
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Interview server with dependency injection
pub struct CodeMock<G, X>
where
    G: TextGenerator,
    X: CodeSandbox,
{
    pub config: Arc<ServerConfig>,
    pub store: Arc<InMemorySessionStore>,
    pub controller: Arc<PhaseController>,
    pub generator: Arc<G>,
    pub sandbox: Arc<X>,
}

// Manual impl: the services are shared through Arcs, so no Clone bound
// on G/X is needed.
impl<G, X> Clone for CodeMock<G, X>
where
    G: TextGenerator,
    X: CodeSandbox,
{
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            store: Arc::clone(&self.store),
            controller: Arc::clone(&self.controller),
            generator: Arc::clone(&self.generator),
            sandbox: Arc::clone(&self.sandbox),
        }
    }
}

impl<G, X> CodeMock<G, X>
where
    G: TextGenerator + 'static,
    X: CodeSandbox + 'static,
{
    /// Create a server with injected backend services
    pub fn new(config: ServerConfig, generator: G, sandbox: X) -> Self {
        let store = Arc::new(InMemorySessionStore::new(config.session_ttl));
        let controller = Arc::new(PhaseController::new(ProblemBank::new()));

        Self {
            config: Arc::new(config),
            store,
            controller,
            generator: Arc::new(generator),
            sandbox: Arc::new(sandbox),
        }
    }

    /// Build the axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/api/chat", post(interview::chat::<G, X>))
            .route("/api/progress", get(interview::progress::<G, X>))
            .route("/api/reset", post(interview::reset::<G, X>))
            .route("/api/status", get(interview::status::<G, X>))
            .route("/api/force-transition", post(interview::force_transition::<G, X>))
            .route("/api/test-flow", get(interview::test_flow::<G, X>))
            .route("/api/code/execute", post(code::execute::<G, X>))
            .layer(
                ServiceBuilder::new()
                    .layer(CorsLayer::permissive()) // Allow CORS for the dev frontend
                    .into_inner(),
            )
            .with_state(self.clone())
    }

    /// Start the HTTP server and the session sweep loop
    pub async fn run(self) -> ServerResult<()> {
        let router = self.build_router();
        let port = self.config.port;

        // Background sweep keeps abandoned interviews from piling up
        let sweep_store = Arc::clone(&self.store);
        let sweep_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                sweep_store.sweep_expired().await;
            }
        });

        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|e| ServerError::Startup {
                message: format!("failed to bind port {port}: {e}"),
            })?;

        info!("🚀 Code Mock interview server running on http://localhost:{port}");
        info!("🤖 Text generation: {} ({})", self.config.ollama_url, self.config.ollama_model);
        info!("📦 Code sandbox: {}", self.config.piston_url);

        let server_task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("server error: {e}");
            }
        });

        tokio::select! {
            _ = server_task => {
                info!("HTTP server task completed");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("received shutdown signal");
            }
        }
        sweep_task.abort();

        Ok(())
    }
}

/// Health check endpoint
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "interviewer": "Code Mock is ready!"
    }))
}
