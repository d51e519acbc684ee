//! Runtime configuration, read once from the environment at startup.

use rand::RngCore;
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_DB_PATH: &str = ".nodearc_db";
pub const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_AI_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub db_path: PathBuf,
    /// HMAC key for session cookies.
    pub secret: Vec<u8>,
    /// False when `secret` was generated for this process only.
    pub secret_configured: bool,
    pub secure_cookies: bool,
    pub ai: AiConfig,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid OPENAI_BASE_URL: {0}")]
    InvalidBaseUrl(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let (secret, secret_configured) = match env::var("NODEARC_SECRET") {
            Ok(s) if !s.is_empty() => (s.into_bytes(), true),
            _ => (random_secret(), false),
        };

        let base_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_AI_BASE_URL.to_string());
        validate_base_url(&base_url)?;

        Ok(Self {
            bind: env::var("NODEARC_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
            db_path: env::var("NODEARC_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH)),
            secret,
            secret_configured,
            secure_cookies: env::var("NODEARC_SECURE_COOKIES")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            ai: AiConfig {
                api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
                base_url,
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.to_string()),
            },
        })
    }

    /// Fixed secret and no AI key; callers supply their own store.
    pub fn for_tests() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            secret: b"test-secret-key".to_vec(),
            secret_configured: true,
            secure_cookies: false,
            ai: AiConfig {
                api_key: None,
                base_url: DEFAULT_AI_BASE_URL.to_string(),
                model: DEFAULT_AI_MODEL.to_string(),
            },
        }
    }
}

fn random_secret() -> Vec<u8> {
    let mut bytes = vec![0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// The completion endpoint may be a local server, so only scheme and host are checked.
pub fn validate_base_url(base_url: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidBaseUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl("no host in URL".to_string()));
    }

    Ok(url)
}
