//! Sources module
//!
//! Defines the transport contract for the identity-provider exchange and
//! the production reqwest-backed implementation.

use http::Method;

use crate::errors::Result;

pub mod iam;
pub mod request;

/// Dispatches a single call against the identity provider.
///
/// Implementations surface every HTTP response as `Ok`, whatever the
/// status; `Err` is reserved for transport-level failures (the caller
/// interprets the status code).
pub trait TokenTransport: Send + Sync {
    fn dispatch(
        &self,
        request: TokenRequest,
    ) -> impl std::future::Future<Output = Result<TransportResponse>> + Send;
}

/// One identity-provider call: method, url, fixed headers, form body.
#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, &'static str)>,
    pub form: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}
