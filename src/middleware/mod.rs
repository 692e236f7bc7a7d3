//! HTTP middleware

pub mod company_auth;
pub mod logging;

pub use company_auth::company_auth_middleware;
pub use logging::logging_middleware;
