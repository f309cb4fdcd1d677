use std::sync::Arc;

use inbox_digest::config::AppConfig;
use inbox_digest::error::Result;
use inbox_digest::gmail::GmailClient;
use inbox_digest::llm::create_provider;
use inbox_digest::oauth::OAuthClient;
use inbox_digest::pipeline::{SummarizeWorkflow, Summarizer};
use inbox_digest::session::{self, SessionStore};
use inbox_digest::web::{AppState, app_routes};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export GOOGLE_CLIENT_ID=... GOOGLE_CLIENT_SECRET=... GOOGLE_REDIRECT_URI=... OPENAI_API_KEY=...");
        e
    })?;

    eprintln!("📬 Inbox Digest v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.openai.model);
    eprintln!("   Workflow: http://0.0.0.0:{}/workflows/gmail-summarizer", config.port);
    eprintln!("   OAuth redirect: {}", config.google.redirect_uri);

    // ── Collaborators ───────────────────────────────────────────────────
    let mail = Arc::new(GmailClient::new(&config.google.gmail_api_base));
    let llm = create_provider(&config.openai);
    let workflow = SummarizeWorkflow::new(mail, Summarizer::new(llm), config.pipeline.clone());

    // ── Sessions ────────────────────────────────────────────────────────
    let sessions = SessionStore::new();
    let _expiry_handle = session::spawn_expiry_task(sessions.clone());

    let state = AppState {
        sessions,
        oauth: Arc::new(OAuthClient::new(&config.google)),
        workflow: Arc::new(workflow),
        secure_cookies: config.secure_cookies,
    };

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "HTTP server started");
    axum::serve(listener, app_routes(state)).await?;

    Ok(())
}
