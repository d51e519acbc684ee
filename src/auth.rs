//! Authentication, session management and the route gate.
//!
//! Sessions are HMAC-signed cookies carrying the user id. A `Session` value is
//! extracted per request and handed explicitly to handlers; it comes into
//! existence at login/signup and is torn down by logout clearing the cookie.

use crate::error::{AppError, Result};
use crate::models::User;
use crate::AppState;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::convert::Infallible;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Session cookie name
pub const SESSION_COOKIE: &str = "nodearc_session";

/// Session time-to-live in hours
pub const SESSION_TTL_HOURS: i64 = 24;

pub const MIN_PASSWORD_LEN: usize = 8;

// ============================================================================
// Session Structure
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    created: i64,
    expires: i64,
    nonce: String,
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        let now = Utc::now().timestamp();
        let nonce: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        Self {
            user_id: user.id,
            email: user.email.clone(),
            created: now,
            expires: now + SESSION_TTL_HOURS * 3600,
            nonce,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.expires
    }
}

// ============================================================================
// Token Signing
// ============================================================================

/// Encode and sign a session as `base64(json).hex(hmac)`.
pub fn sign_session(session: &Session, secret: &[u8]) -> Option<String> {
    let session_json = serde_json::to_string(session).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(session_json.as_bytes());
    let signature = hex_encode(mac.finalize().into_bytes().as_slice());

    Some(format!("{}.{}", URL_SAFE_NO_PAD.encode(session_json.as_bytes()), signature))
}

/// Verify signature and expiry, returning the session on success.
pub fn verify_session(token: &str, secret: &[u8]) -> Option<Session> {
    let (payload, signature) = token.split_once('.')?;
    let session_json = String::from_utf8(URL_SAFE_NO_PAD.decode(payload).ok()?).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(session_json.as_bytes());
    let expected_sig = hex_encode(mac.finalize().into_bytes().as_slice());

    // Constant-time comparison to prevent timing attacks
    let sig_bytes = signature.as_bytes();
    let expected_bytes = expected_sig.as_bytes();
    if sig_bytes.len() != expected_bytes.len() || sig_bytes.ct_eq(expected_bytes).unwrap_u8() != 1 {
        return None;
    }

    let session: Session = serde_json::from_str(&session_json).ok()?;
    if session.is_expired() {
        return None;
    }
    Some(session)
}

pub fn session_from_jar(jar: &CookieJar, secret: &[u8]) -> Option<Session> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| verify_session(cookie.value(), secret))
}

pub fn session_cookie(token: &str, secure: bool) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        SESSION_COOKIE,
        token,
        SESSION_TTL_HOURS * 3600,
        if secure { "; Secure" } else { "" }
    )
}

pub fn clear_session_cookie(secure: bool) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{}",
        SESSION_COOKIE,
        if secure { "; Secure" } else { "" }
    )
}

// ============================================================================
// Passwords
// ============================================================================

pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AppError::Auth(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Auth(e.to_string()))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub fn validate_credentials(email: &str, password: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Enter a valid email address".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

// ============================================================================
// Extractors
// ============================================================================

/// Rejection for handlers that require a session: JSON 401 under `/api`,
/// a redirect to the landing page everywhere else.
#[derive(Debug)]
pub struct SessionRejection {
    api: bool,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        if self.api {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": AppError::Unauthorized.to_string() })),
            )
                .into_response()
        } else {
            Redirect::to("/").into_response()
        }
    }
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> std::result::Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        session_from_jar(&jar, &state.config.secret).ok_or(SessionRejection {
            api: parts.uri.path().starts_with("/api/"),
        })
    }
}

impl OptionalFromRequestParts<Arc<AppState>> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Option<Self>, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(session_from_jar(&jar, &state.config.secret))
    }
}

// ============================================================================
// Route Gate
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Redirect(&'static str),
}

/// Signed-in users skip the landing page; everyone else only sees the
/// landing, login and signup pages.
pub fn gate(path: &str, signed_in: bool) -> GateDecision {
    if signed_in && path == "/" {
        return GateDecision::Redirect("/notes");
    }
    if !signed_in && path != "/" && !path.starts_with("/login") && !path.starts_with("/signup") {
        return GateDecision::Redirect("/");
    }
    GateDecision::Proceed
}

pub async fn auth_gate(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let signed_in = session_from_jar(&jar, &state.config.secret).is_some();

    match gate(request.uri().path(), signed_in) {
        GateDecision::Proceed => next.run(request).await,
        GateDecision::Redirect(to) => {
            tracing::debug!(path = %request.uri().path(), to, "gate redirect");
            Redirect::to(to).into_response()
        }
    }
}

// ============================================================================
// Encoding Helpers
// ============================================================================

/// Encode bytes as hexadecimal
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"secret";

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_round_trip() {
        let user = user();
        let session = Session::for_user(&user);
        let token = sign_session(&session, SECRET).unwrap();
        let verified = verify_session(&token, SECRET).unwrap();
        assert_eq!(verified.user_id, user.id);
        assert_eq!(verified, session);
    }

    #[test]
    fn test_session_rejects_wrong_secret() {
        let token = sign_session(&Session::for_user(&user()), SECRET).unwrap();
        assert!(verify_session(&token, b"other").is_none());
    }

    #[test]
    fn test_session_rejects_tampered_payload() {
        let token = sign_session(&Session::for_user(&user()), SECRET).unwrap();
        let (_, sig) = token.split_once('.').unwrap();
        let mut forged = Session::for_user(&user());
        forged.email = "mallory@example.com".to_string();
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_string(&forged).unwrap());
        assert!(verify_session(&format!("{}.{}", payload, sig), SECRET).is_none());
        assert!(verify_session("garbage", SECRET).is_none());
    }

    #[test]
    fn test_session_rejects_expired() {
        let mut session = Session::for_user(&user());
        session.expires = Utc::now().timestamp() - 1;
        let token = sign_session(&session, SECRET).unwrap();
        assert!(verify_session(&token, SECRET).is_none());
    }

    #[test]
    fn test_password_hash_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-hash"));
    }

    #[test]
    fn test_credentials_validation() {
        assert!(validate_credentials("ada@example.com", "longenough").is_ok());
        assert!(validate_credentials("ada", "longenough").is_err());
        assert!(validate_credentials("ada@example.com", "short").is_err());
    }

    #[test]
    fn test_gate_signed_in_skips_landing() {
        assert_eq!(gate("/", true), GateDecision::Redirect("/notes"));
        assert_eq!(gate("/notes", true), GateDecision::Proceed);
        assert_eq!(gate("/ai", true), GateDecision::Proceed);
    }

    #[test]
    fn test_gate_signed_out_only_sees_public_pages() {
        assert_eq!(gate("/", false), GateDecision::Proceed);
        assert_eq!(gate("/login", false), GateDecision::Proceed);
        assert_eq!(gate("/signup", false), GateDecision::Proceed);
        assert_eq!(gate("/notes", false), GateDecision::Redirect("/"));
        assert_eq!(gate("/collections", false), GateDecision::Redirect("/"));
        assert_eq!(gate("/ai", false), GateDecision::Redirect("/"));
    }

    #[test]
    fn test_cookie_flags() {
        assert!(session_cookie("t", true).ends_with("; Secure"));
        assert!(!session_cookie("t", false).contains("Secure"));
        assert!(clear_session_cookie(false).contains("Max-Age=0"));
    }
}
