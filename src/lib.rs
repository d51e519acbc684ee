//! NodeArc library - re-exports for testing and external use.
//!
//! This module provides public access to all the application's modules
//! and builds the router so integration tests can drive it directly.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;

use chrono::{DateTime, Utc};

pub mod ai;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notes;
pub mod page;
pub mod store;
pub mod templates;

// ============================================================================
// Rate Limiting
// ============================================================================

/// Failures older than this are forgotten once the entry is no longer locked.
pub const LOGIN_FAILURE_WINDOW_MINUTES: i64 = 15;

/// Tracks login failures for rate limiting with exponential backoff.
#[derive(Debug, Default)]
pub struct LoginRateLimit {
    pub failures: u32,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
}

impl LoginRateLimit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if login attempts are currently locked out.
    pub fn is_locked(&self) -> bool {
        self.locked_until.is_some_and(|until| Utc::now() < until)
    }

    /// Record a failed login attempt. After 5 failures, apply exponential backoff capped at 64s.
    pub fn record_failure(&mut self) {
        self.failures += 1;
        self.last_failure = Some(Utc::now());
        if self.failures >= 5 {
            let delay_secs = std::cmp::min(1i64 << (self.failures - 5).min(6), 64);
            self.locked_until = Some(Utc::now() + chrono::Duration::seconds(delay_secs));
        }
    }

    /// Reset on successful login.
    pub fn reset(&mut self) {
        self.failures = 0;
        self.locked_until = None;
        self.last_failure = None;
    }

    /// Unlocked and idle for longer than the failure window.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        let idle_since = now - chrono::Duration::minutes(LOGIN_FAILURE_WINDOW_MINUTES);
        !self.is_locked() && self.last_failure.map_or(true, |at| at < idle_since)
    }
}

// ============================================================================
// Application State
// ============================================================================

pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub ai: AiGateway,
    /// Keyed by lowercased email.
    pub login_rate_limits: Mutex<HashMap<String, LoginRateLimit>>,
}

impl AppState {
    pub fn new(config: Config) -> error::Result<Self> {
        let store = Store::open(&config.db_path)?;
        let ai = AiGateway::from_config(&config.ai);
        Ok(Self::with_parts(config, store, ai))
    }

    pub fn with_parts(config: Config, store: Store, ai: AiGateway) -> Self {
        Self {
            config,
            store,
            ai,
            login_rate_limits: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_login_locked(&self, email: &str) -> bool {
        self.login_rate_limits
            .lock()
            .map(|limits| limits.get(&email.to_lowercase()).is_some_and(|l| l.is_locked()))
            .unwrap_or(false)
    }

    /// Stale entries are dropped here, so the map only holds emails with
    /// recent failures.
    pub fn record_login_failure(&self, email: &str) {
        if let Ok(mut limits) = self.login_rate_limits.lock() {
            let now = Utc::now();
            limits.retain(|_, limit| !limit.is_stale(now));
            limits.entry(email.to_lowercase()).or_default().record_failure();
        }
    }

    pub fn reset_login_failures(&self, email: &str) {
        if let Ok(mut limits) = self.login_rate_limits.lock() {
            limits.remove(&email.to_lowercase());
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    let gated = Router::new()
        .route("/", get(handlers::landing))
        .route("/notes", get(handlers::notes_page).post(handlers::create_note))
        .route(
            "/collections",
            get(handlers::collections_page).post(handlers::create_collection),
        )
        .route("/ai", get(handlers::ai_page).post(handlers::ai_send))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::auth_gate));

    let pages = Router::new()
        .route("/login", get(handlers::login_page).post(handlers::login_submit))
        .route("/signup", get(handlers::signup_page).post(handlers::signup_submit))
        .route("/logout", get(handlers::logout))
        // Note routes
        .route("/notes/{id}", post(handlers::update_note))
        .route("/notes/{id}/delete", post(handlers::delete_note))
        .route("/notes/{id}/favorite", post(handlers::toggle_favorite))
        .route("/notes/{id}/archive", post(handlers::toggle_archive))
        .route("/notes/{id}/tags", post(handlers::add_tag))
        .route("/notes/{id}/tags/{tag_id}/remove", post(handlers::remove_tag))
        .route("/notes/{id}/summary", post(handlers::summarize_note))
        .route("/notes/{id}/key-points", post(handlers::key_points_note))
        // Collection routes
        .route("/collections/{id}/delete", post(handlers::delete_collection))
        .route("/collections/{id}/notes", post(handlers::add_note_to_collection))
        .route(
            "/collections/{id}/notes/{note_id}/remove",
            post(handlers::remove_note_from_collection),
        );

    let api = Router::new()
        .route("/api/notes", get(api::list_notes).post(api::create_note))
        .route("/api/notes/{id}", put(api::update_note).delete(api::delete_note))
        .route("/api/notes/{id}/favorite", post(api::toggle_favorite))
        .route("/api/ai/ask", post(api::ask))
        .route("/api/ai/summary", post(api::summary))
        .route("/api/ai/key-points", post(api::key_points))
        .route("/api/ai/interactions", get(api::interactions));

    gated
        .merge(pages)
        .merge(api)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Re-export commonly used types
pub use ai::{AiError, AiGateway, CompletionClient, CompletionRequest, Conversation, OpenAiClient};
pub use auth::{Session, SESSION_COOKIE, SESSION_TTL_HOURS};
pub use config::{AiConfig, Config, ConfigError};
pub use error::{AppError, Result};
pub use models::{AiInteraction, Collection, Note, Tag, User};
pub use page::{NotesPage, PageAction, Selection};
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_locks_after_five_failures() {
        let mut limit = LoginRateLimit::new();
        for _ in 0..4 {
            limit.record_failure();
        }
        assert!(!limit.is_locked());
        limit.record_failure();
        assert!(limit.is_locked());
        limit.reset();
        assert!(!limit.is_locked());
        assert_eq!(limit.failures, 0);
    }

    #[test]
    fn test_rate_limit_backoff_is_capped() {
        let mut limit = LoginRateLimit::new();
        for _ in 0..40 {
            limit.record_failure();
        }
        let until = limit.locked_until.unwrap();
        assert!(until <= Utc::now() + chrono::Duration::seconds(64));
    }

    #[test]
    fn test_rate_limit_goes_stale_after_window() {
        let mut limit = LoginRateLimit::new();
        limit.record_failure();
        assert!(!limit.is_stale(Utc::now()));
        let later = Utc::now() + chrono::Duration::minutes(LOGIN_FAILURE_WINDOW_MINUTES + 1);
        assert!(limit.is_stale(later));
    }

    #[test]
    fn test_record_login_failure_drops_stale_entries() {
        let state = AppState::with_parts(
            Config::for_tests(),
            Store::temporary().unwrap(),
            AiGateway::from_config(&Config::for_tests().ai),
        );
        {
            let mut limits = state.login_rate_limits.lock().unwrap();
            let long_ago = Utc::now() - chrono::Duration::minutes(LOGIN_FAILURE_WINDOW_MINUTES * 2);
            for i in 0..100 {
                limits.insert(
                    format!("nobody{}@example.com", i),
                    LoginRateLimit {
                        failures: 1,
                        locked_until: None,
                        last_failure: Some(long_ago),
                    },
                );
            }
        }

        state.record_login_failure("alice@example.com");

        let limits = state.login_rate_limits.lock().unwrap();
        assert_eq!(limits.len(), 1);
        assert_eq!(limits["alice@example.com"].failures, 1);
    }

    #[test]
    fn test_record_login_failure_keeps_locked_entries() {
        let state = AppState::with_parts(
            Config::for_tests(),
            Store::temporary().unwrap(),
            AiGateway::from_config(&Config::for_tests().ai),
        );
        for _ in 0..5 {
            state.record_login_failure("mallory@example.com");
        }
        state.record_login_failure("alice@example.com");
        assert!(state.is_login_locked("MALLORY@example.com"));
        assert_eq!(state.login_rate_limits.lock().unwrap().len(), 2);
    }
}
