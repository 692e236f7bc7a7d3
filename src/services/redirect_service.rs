//! Company authorization redirect construction.
//!
//! Builds the identity provider's authorise URL for a company scope, with a
//! signed state token that carries the URI to return to.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::OAuth2Config;
use crate::constants::OAUTH2_RESPONSE_TYPE;
use crate::error::{AppError, AppResult};

/// OAuth2 state token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateClaims {
    /// Random per-redirect value
    pub nonce: String,
    /// Path and query the user asked for before being redirected
    pub return_uri: String,
    pub exp: i64,
    pub iat: i64,
}

/// Builds authorise redirects for company scopes
#[derive(Debug, Clone)]
pub struct RedirectService {
    config: OAuth2Config,
}

impl RedirectService {
    pub fn new(config: OAuth2Config) -> Self {
        Self { config }
    }

    /// `{scope_base}/company/{company_number}`
    pub fn company_scope(&self, company_number: &str) -> String {
        format!("{}/company/{}", self.config.company_scope_base, company_number)
    }

    /// Sign a state token for a redirect that should come back to `return_uri`.
    pub fn generate_state(&self, return_uri: &str) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = Duration::try_seconds(self.config.state_expiry_secs)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::Redirect(format!(
                    "State expiry of {}s is out of range",
                    self.config.state_expiry_secs
                ))
            })?;
        let claims = StateClaims {
            nonce: Uuid::new_v4().to_string(),
            return_uri: return_uri.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.state_secret.as_bytes()),
        )
        .map_err(|e| AppError::Redirect(format!("Failed to sign state: {}", e)))
    }

    /// Verify a state token returned by the identity provider.
    pub fn verify_state(&self, token: &str) -> AppResult<StateClaims> {
        let token_data = decode::<StateClaims>(
            token,
            &DecodingKey::from_secret(self.config.state_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Full authorise URL asking for the company's scope.
    pub fn authorise_url(&self, company_number: &str, return_uri: &str) -> AppResult<String> {
        let state = self.generate_state(return_uri)?;
        let scope = self.company_scope(company_number);

        let url = Url::parse_with_params(
            &self.config.authorise_uri,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", OAUTH2_RESPONSE_TYPE),
                ("scope", scope.as_str()),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| {
            AppError::Redirect(format!(
                "Invalid authorise URI {}: {}",
                self.config.authorise_uri, e
            ))
        })?;

        Ok(url.into())
    }
}
