//! EFS Gateway - company authorization in front of the filing journey
//!
//! Every journey request is checked before it reaches the journey web
//! application: when the submission's form needs authentication and the
//! signed-in user holds neither a grant for the company in the URL nor an
//! allow-list exemption, the user is redirected to the identity provider to
//! authorize for that company.
//!
//! # Architecture
//!
//! - **efs-rules**: the evaluator (request cache, rule chain)
//! - **Services**: REST backend, Redis session store, redirect construction
//! - **Middleware**: company authorization filter, request logging
//! - **Handlers**: upstream forwarding and health probes

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
