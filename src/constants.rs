//! Application-wide constants
//!
//! Defaults for configuration values and fixed protocol strings, grouped by
//! purpose.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default log filter
pub const DEFAULT_RUST_LOG: &str = "efs_gateway=debug,efs_rules=debug,tower_http=info";

// =============================================================================
// BACKEND DEFAULTS
// =============================================================================

/// Default base URL of the filing REST backend
pub const DEFAULT_API_URL: &str = "http://localhost:8081/efs-submission-api";

/// Default base URL of the journey web application behind the gateway
pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:3000";

/// Default timeout for a single backend call, in seconds
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;

/// Largest request body forwarded upstream (document uploads included)
pub const MAX_FORWARDED_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Upper bound on parent links followed when resolving a category's root
pub const MAX_CATEGORY_DEPTH: usize = 16;

// =============================================================================
// SESSION DEFAULTS
// =============================================================================

/// Default session store URL
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Default name of the session cookie
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "__SID";

/// Default prefix of session keys in the session store
pub const DEFAULT_SESSION_KEY_PREFIX: &str = "session:";

/// Default session attribute holding the identity provider's sign-in info
pub const DEFAULT_SESSION_SIGNIN_ATTRIBUTE: &str = "signin_info";

// =============================================================================
// OAUTH2 DEFAULTS
// =============================================================================

/// Default identity provider authorise endpoint
pub const DEFAULT_OAUTH2_AUTHORISE_URI: &str = "http://account.chs.local/oauth2/authorise";

/// Default OAuth2 client ID
pub const DEFAULT_OAUTH2_CLIENT_ID: &str = "efs-web";

/// Default OAuth2 callback
pub const DEFAULT_OAUTH2_REDIRECT_URI: &str = "http://chs.local/oauth2/user/callback";

/// Default prefix of company scope grants
pub const DEFAULT_COMPANY_SCOPE_BASE: &str = "https://api.company-information.service.gov.uk";

/// Default lifetime of the OAuth2 state token, in seconds
pub const DEFAULT_OAUTH2_STATE_EXPIRY_SECS: i64 = 600;

/// Longest accepted lifetime of the OAuth2 state token, in seconds
pub const MAX_OAUTH2_STATE_EXPIRY_SECS: i64 = 24 * 60 * 60;

/// OAuth2 response type requested from the identity provider
pub const OAUTH2_RESPONSE_TYPE: &str = "code";

// =============================================================================
// ALLOW-LIST
// =============================================================================

/// Default allow-list-eligible categories (comma separated)
pub const DEFAULT_ALLOW_LIST_CATEGORIES: &str = "INSOLVENCY";

// =============================================================================
// ROUTES
// =============================================================================

/// Health probe base path, never subject to company authorization
pub const HEALTH_BASE_PATH: &str = "/health";
