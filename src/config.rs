//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use deadpool_redis::{Config as RedisConfig, Pool as RedisPool, Runtime};
use efs_common::TopLevelCategory;

use crate::constants::{
    DEFAULT_ALLOW_LIST_CATEGORIES, DEFAULT_API_URL, DEFAULT_BACKEND_TIMEOUT_SECS,
    DEFAULT_COMPANY_SCOPE_BASE, DEFAULT_OAUTH2_AUTHORISE_URI, DEFAULT_OAUTH2_CLIENT_ID,
    DEFAULT_OAUTH2_REDIRECT_URI, DEFAULT_OAUTH2_STATE_EXPIRY_SECS, DEFAULT_REDIS_URL,
    DEFAULT_RUST_LOG, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SESSION_COOKIE_NAME,
    DEFAULT_SESSION_KEY_PREFIX, DEFAULT_SESSION_SIGNIN_ATTRIBUTE, DEFAULT_UPSTREAM_URL,
    MAX_OAUTH2_STATE_EXPIRY_SECS,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub oauth2: OAuth2Config,
    pub allow_list: AllowListConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Filing REST backend and upstream journey application
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub api_url: String,
    pub upstream_url: String,
    pub timeout: Duration,
}

/// Session store configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub redis_url: String,
    pub cookie_name: String,
    pub key_prefix: String,
    pub signin_attribute: String,
}

/// Identity provider (OAuth2) configuration
#[derive(Debug, Clone)]
pub struct OAuth2Config {
    pub authorise_uri: String,
    pub client_id: String,
    pub redirect_uri: String,
    /// Prefix of company scope grants, e.g. `https://api.example/company/<number>`
    pub company_scope_base: String,
    /// HMAC secret for the state token
    pub state_secret: String,
    pub state_expiry_secs: i64,
}

/// Email allow-list configuration
#[derive(Debug, Clone)]
pub struct AllowListConfig {
    /// Top-level categories whose forms may be unlocked by the allow-list
    pub categories: Vec<TopLevelCategory>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            backend: BackendConfig::from_env()?,
            session: SessionConfig::from_env(),
            oauth2: OAuth2Config::from_env()?,
            allow_list: AllowListConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.to_string()),
        })
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: trimmed_url("API_URL", DEFAULT_API_URL),
            upstream_url: trimmed_url("UPSTREAM_URL", DEFAULT_UPSTREAM_URL),
            timeout: Duration::from_secs(parse_var(
                "BACKEND_TIMEOUT_SECS",
                DEFAULT_BACKEND_TIMEOUT_SECS,
            )?),
        })
    }
}

impl SessionConfig {
    fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_SESSION_COOKIE_NAME.to_string()),
            key_prefix: env::var("SESSION_KEY_PREFIX")
                .unwrap_or_else(|_| DEFAULT_SESSION_KEY_PREFIX.to_string()),
            signin_attribute: env::var("SESSION_SIGNIN_ATTRIBUTE")
                .unwrap_or_else(|_| DEFAULT_SESSION_SIGNIN_ATTRIBUTE.to_string()),
        }
    }
}

impl OAuth2Config {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            authorise_uri: env::var("OAUTH2_AUTHORISE_URI")
                .unwrap_or_else(|_| DEFAULT_OAUTH2_AUTHORISE_URI.to_string()),
            client_id: env::var("OAUTH2_CLIENT_ID")
                .unwrap_or_else(|_| DEFAULT_OAUTH2_CLIENT_ID.to_string()),
            redirect_uri: env::var("OAUTH2_REDIRECT_URI")
                .unwrap_or_else(|_| DEFAULT_OAUTH2_REDIRECT_URI.to_string()),
            company_scope_base: trimmed_url("COMPANY_SCOPE_BASE", DEFAULT_COMPANY_SCOPE_BASE),
            state_secret: env::var("OAUTH2_STATE_SECRET")
                .map_err(|_| ConfigError::Missing("OAUTH2_STATE_SECRET".to_string()))?,
            state_expiry_secs: state_expiry(parse_var(
                "OAUTH2_STATE_EXPIRY_SECS",
                DEFAULT_OAUTH2_STATE_EXPIRY_SECS,
            )?)?,
        })
    }
}

impl AllowListConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("ALLOW_LIST_CATEGORIES")
            .unwrap_or_else(|_| DEFAULT_ALLOW_LIST_CATEGORIES.to_string());
        Ok(Self {
            categories: parse_categories(&raw)?,
        })
    }
}

/// Parse a comma separated list of top-level category codes.
pub fn parse_categories(raw: &str) -> Result<Vec<TopLevelCategory>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            TopLevelCategory::from_str(code)
                .map_err(|_| ConfigError::InvalidValue("ALLOW_LIST_CATEGORIES".to_string()))
        })
        .collect()
}

/// State tokens live between one second and one day.
fn state_expiry(secs: i64) -> Result<i64, ConfigError> {
    if (1..=MAX_OAUTH2_STATE_EXPIRY_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(ConfigError::InvalidValue("OAUTH2_STATE_EXPIRY_SECS".to_string()))
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

fn trimmed_url(name: &str, default: &str) -> String {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Create a Redis connection pool
pub fn create_redis_pool(redis_url: &str) -> Result<RedisPool, deadpool_redis::CreatePoolError> {
    let cfg = RedisConfig::from_url(redis_url);
    cfg.create_pool(Some(Runtime::Tokio1))
}

/// Create the HTTP client shared by backend lookups and upstream forwarding.
///
/// Redirects are never followed so upstream redirects reach the browser.
pub fn create_http_client(config: &BackendConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
