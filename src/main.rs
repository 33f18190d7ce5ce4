//! Code Mock server entry point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codemock::{CodeMock, OllamaClient, PistonClient, ServerConfig};

/// Mock technical-interview server
#[derive(Parser, Debug)]
#[command(name = "codemock")]
#[command(about = "Mock technical-interview server backed by Ollama and Piston")]
struct Args {
    /// Port for HTTP server (browser connections)
    #[arg(long, default_value = "3001")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Base URL of the Ollama instance (env: OLLAMA_URL)
    #[arg(long)]
    ollama_url: Option<String>,

    /// Model tag requested from Ollama (env: OLLAMA_MODEL)
    #[arg(long)]
    ollama_model: Option<String>,

    /// Piston execute endpoint (env: PISTON_URL)
    #[arg(long)]
    piston_url: Option<String>,

    /// Idle session lifetime in minutes
    #[arg(long, default_value = "120")]
    session_ttl_minutes: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!(
                "codemock={},tower_http=info",
                args.log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig {
        port: args.port,
        ollama_url: ServerConfig::resolve(
            args.ollama_url,
            "OLLAMA_URL",
            ServerConfig::DEFAULT_OLLAMA_URL,
        ),
        ollama_model: ServerConfig::resolve(
            args.ollama_model,
            "OLLAMA_MODEL",
            ServerConfig::DEFAULT_OLLAMA_MODEL,
        ),
        piston_url: ServerConfig::resolve(
            args.piston_url,
            "PISTON_URL",
            ServerConfig::DEFAULT_PISTON_URL,
        ),
        session_ttl: std::time::Duration::from_secs(args.session_ttl_minutes * 60),
    };

    tracing::info!("📋 Interview flow:");
    tracing::info!("  1. 👋 Introduction (background + project experience)");
    tracing::info!("  2. 🧠 Core CS topics (2 questions from OS, OOPs, DBMS, CNS)");
    tracing::info!("  3. 💻 Progressive DSA challenges (easy → complexity → optimization → harder problem)");
    tracing::info!("  4. 🎯 Feedback & wrap-up");

    let generator = OllamaClient::new(config.ollama_url.clone(), config.ollama_model.clone());
    let sandbox = PistonClient::new(config.piston_url.clone());

    let server = CodeMock::new(config, generator, sandbox);
    server.run().await?;

    Ok(())
}
