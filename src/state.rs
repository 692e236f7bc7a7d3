//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers and middleware via Axum's State extractor.

use std::sync::Arc;

use deadpool_redis::Pool as RedisPool;
use efs_rules::prelude::CompanyAuthEvaluator;

use crate::config::Config;
use crate::services::RedirectService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Decides whether a request needs company authorization
    pub evaluator: CompanyAuthEvaluator,

    /// Builds authorise redirects
    pub redirects: RedirectService,

    /// Client for upstream forwarding
    pub http: reqwest::Client,

    /// Session store pool, used by readiness checks
    pub redis: RedisPool,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        evaluator: CompanyAuthEvaluator,
        http: reqwest::Client,
        redis: RedisPool,
        config: Config,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                evaluator,
                redirects: RedirectService::new(config.oauth2.clone()),
                http,
                redis,
                config,
            }),
        }
    }

    pub fn evaluator(&self) -> &CompanyAuthEvaluator {
        &self.inner.evaluator
    }

    pub fn redirects(&self) -> &RedirectService {
        &self.inner.redirects
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    /// Get a reference to the Redis pool
    pub fn redis(&self) -> &RedisPool {
        &self.inner.redis
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
