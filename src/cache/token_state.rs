use serde::Deserialize;

use crate::utils::constants::{REFRESH_TOKEN_GRACE_SECS, TOKEN_TTL_FRACTION};

/// One decoded token grant from the identity provider.
///
/// Replaced wholesale on every successful fetch; never partially mutated.
/// Lifetime fields stay optional because the wire may omit them; the expiry
/// predicates treat a token with missing lifetime fields as expired.
#[derive(Clone, Deserialize)]
pub struct TokenState {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Absolute end of the validity window, epoch seconds.
    #[serde(default)]
    pub expiration: Option<u64>,
    /// Declared time-to-live in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl TokenState {
    /// Whether the access token is due for replacement at `now`.
    ///
    /// Expired once 80% of the declared lifetime has elapsed, so a request
    /// never departs with a token that lapses mid-flight. A token missing
    /// either lifetime field is never trusted.
    pub fn is_access_token_expired(&self, now: i64) -> bool {
        let (Some(expiration), Some(expires_in)) = (self.expiration, self.expires_in) else {
            return true;
        };
        let refresh_at = expiration as f64 - expires_in as f64 * (1.0 - TOKEN_TTL_FRACTION);
        refresh_at < now as f64
    }

    /// Fail-safe for the refresh grant: a refresh token is written off when
    /// absent, when no expiry was recorded, or once the access-token expiry
    /// is more than the grace window in the past.
    pub fn is_refresh_token_expired(&self, now: i64) -> bool {
        if self.refresh_token.is_none() {
            return true;
        }
        let Some(expiration) = self.expiration else {
            return true;
        };
        (expiration as i64) + REFRESH_TOKEN_GRACE_SECS < now
    }
}

// Token material never appears in logs or debug dumps.
impl std::fmt::Debug for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenState")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[redacted]"))
            .field("expiration", &self.expiration)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
