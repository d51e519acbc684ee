//! NodeArc - an AI-assisted note-taking web application.
//!
//! This is the main entry point for the web server.
//! The application is organized into the following modules:
//!
//! - `models`: Notes, tags, collections, users and AI interactions
//! - `store`: Persistence on an embedded sled database
//! - `auth`: Signed session cookies, passwords and the route gate
//! - `page`: Notes page state and its reconciliation rules
//! - `ai`: Chat-completion gateway (ask, summarize, key points)
//! - `templates`: HTML/CSS/JS templates and rendering
//! - `handlers` / `api`: HTML and JSON route handlers

use std::process::ExitCode;
use std::sync::Arc;

use nodearc::{router, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// Main
// ============================================================================

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nodearc=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if std::env::var("NODEARC_LOG_FORMAT").is_ok_and(|f| f == "json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    if !config.secret_configured {
        tracing::warn!("NODEARC_SECRET not set; sessions will not survive a restart");
    }
    if config.ai.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; AI features will report failures");
    }

    let bind = config.bind.clone();
    let db_path = config.db_path.display().to_string();

    let state = match AppState::new(config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!(error = %e, db_path = %db_path, "failed to open database");
            return ExitCode::FAILURE;
        }
    };
    let model = state.ai.model().to_string();
    let store = state.store.clone();

    let listener = match tokio::net::TcpListener::bind(&bind).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, bind = %bind, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(db_path = %db_path, model = %model, "NodeArc server running at http://{}", bind);

    if let Err(e) = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    if let Err(e) = store.flush() {
        tracing::error!(error = %e, "failed to flush database");
        return ExitCode::FAILURE;
    }
    tracing::info!("shut down cleanly");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
