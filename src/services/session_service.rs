//! Session store access.
//!
//! Sessions are JSON documents stored in Redis under `{prefix}{session_id}`,
//! where the session ID comes from the session cookie. The identity
//! provider writes the user's sign-in info into one attribute of that
//! document.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use deadpool_redis::Pool as RedisPool;
use efs_common::{LookupError, LookupResult, SignInInfo};
use efs_rules::prelude::{RequestInput, SessionAccessor};
use redis::AsyncCommands;
use tracing::{debug, warn};

use crate::config::SessionConfig;

/// Reads sign-in info from the Redis session store
#[derive(Clone)]
pub struct SessionService {
    redis: RedisPool,
    cookie_name: String,
    key_prefix: String,
    signin_attribute: String,
}

impl SessionService {
    pub fn new(redis: RedisPool, config: &SessionConfig) -> Self {
        Self {
            redis,
            cookie_name: config.cookie_name.clone(),
            key_prefix: config.key_prefix.clone(),
            signin_attribute: config.signin_attribute.clone(),
        }
    }

    /// Load the sign-in attribute of the request's session, if it has one.
    pub async fn load_sign_in_info(&self, headers: &HeaderMap) -> LookupResult<Option<SignInInfo>> {
        let Some(session_id) = session_id(headers, &self.cookie_name) else {
            return Ok(None);
        };

        let mut conn = self
            .redis
            .get()
            .await
            .map_err(|e| LookupError::Session(e.to_string()))?;

        let key = format!("{}{}", self.key_prefix, session_id);
        let payload: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| LookupError::Session(e.to_string()))?;

        match payload {
            Some(payload) => extract_sign_in_info(&payload, &self.signin_attribute),
            None => {
                debug!(session_key = %key, "Session not found");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl SessionAccessor for SessionService {
    async fn sign_in_info(&self, request: &RequestInput) -> Option<SignInInfo> {
        match self.load_sign_in_info(&request.headers).await {
            Ok(Some(info)) if info.is_signed_in() => Some(info),
            Ok(_) => None,
            Err(e) => {
                warn!(code = e.error_code(), error = %e, "Failed to read session");
                None
            }
        }
    }
}

/// Value of the named cookie across all `Cookie` headers.
pub fn session_id(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Decode a session document and pull out the sign-in attribute.
pub fn extract_sign_in_info(payload: &str, attribute: &str) -> LookupResult<Option<SignInInfo>> {
    let session: serde_json::Value = serde_json::from_str(payload)?;
    match session.get(attribute) {
        Some(serde_json::Value::Null) | None => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
    }
}
