//! Gateway services

pub mod backend_service;
pub mod redirect_service;
pub mod session_service;

pub use backend_service::BackendService;
pub use redirect_service::{RedirectService, StateClaims};
pub use session_service::SessionService;
