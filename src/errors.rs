use std::sync::Arc;

use http::Method;
use thiserror::Error;

/// Snapshot of the request that produced an identity-provider rejection.
/// Kept for diagnostics; carries no credential material.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub method: Method,
    pub url: String,
    pub grant_type: &'static str,
}

#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Construction-time misconfiguration. Fatal, never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network-level failure reaching the identity provider, or a success
    /// response whose body could not be decoded.
    #[error("transport failure while {context}: {source}")]
    Transport {
        context: String,
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The identity provider answered with HTTP status >= 400.
    #[error("identity provider returned status {status}: {message}")]
    IdentityProvider {
        status: u16,
        message: String,
        body: String,
        request: RequestSnapshot,
    },
}

impl Error {
    pub(crate) fn transport<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport {
            context: context.into(),
            source: Arc::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
