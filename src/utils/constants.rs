//! Shared constants and invariants

/// Production token endpoint, used when no URL is configured.
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// Fixed public-client credential presented on every token exchange.
/// Decodes to "bx:bx"; not a secret.
pub const IAM_BASIC_AUTH: &str = "Basic Yng6Yng=";

pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

// Grant types accepted by the token endpoint
pub const GRANT_TYPE_APIKEY: &str = "urn:ibm:params:oauth:grant-type:apikey";
pub const GRANT_TYPE_REFRESH: &str = "refresh_token";

/// Fraction of the declared lifetime a token is trusted for; past this
/// point a refresh is due.
pub const TOKEN_TTL_FRACTION: f64 = 0.8;

/// Grace window past `expiration` before a refresh token is written off.
pub const REFRESH_TOKEN_GRACE_SECS: i64 = 7 * 24 * 60 * 60;

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
