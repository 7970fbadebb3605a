// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::config::settings::CoordinatorConfig;
use crate::errors::{Error, Result};
use crate::helpers::time::now_u64;
use crate::sources::{TokenRequest, TokenTransport, TransportResponse};
use crate::TokenCoordinator;

/// Scripted stand-in for the IAM transport: replays canned outcomes in
/// order (or one outcome forever), counts dispatches, records every
/// request, and can hold each call open to create overlap windows.
#[derive(Clone, Default)]
pub struct MockTransport {
    scripted: Arc<Mutex<VecDeque<Result<TransportResponse>>>>,
    fallback: Arc<Option<Result<TransportResponse>>>,
    delay: Option<Duration>,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<TokenRequest>>>,
}

impl MockTransport {
    /// Same outcome for every dispatch.
    pub fn always(outcome: Result<TransportResponse>) -> Self {
        Self {
            fallback: Arc::new(Some(outcome)),
            ..Self::default()
        }
    }

    /// One outcome per dispatch, in order; panics when the script runs dry.
    pub fn script(outcomes: Vec<Result<TransportResponse>>) -> Self {
        Self {
            scripted: Arc::new(Mutex::new(outcomes.into())),
            ..Self::default()
        }
    }

    /// Hold every dispatch open for `delay` before resolving.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<TokenRequest> {
        self.requests.lock().await.clone()
    }
}

impl TokenTransport for MockTransport {
    async fn dispatch(&self, request: TokenRequest) -> Result<TransportResponse> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(outcome) = self.scripted.lock().await.pop_front() {
            return outcome;
        }
        (*self.fallback)
            .clone()
            .expect("mock transport ran out of scripted outcomes")
    }
}

pub fn build_coordinator(transport: MockTransport) -> TokenCoordinator<MockTransport> {
    TokenCoordinator::new(CoordinatorConfig::new("test-api-key"), transport)
        .expect("coordinator construction")
}

pub fn ok_json(status: u16, body: serde_json::Value) -> Result<TransportResponse> {
    Ok(TransportResponse {
        status,
        body: body.to_string(),
    })
}

/// An HTTP rejection delivered by the provider (still `Ok` at the
/// transport level; the coordinator interprets the status).
pub fn http_error(status: u16, body: &str) -> Result<TransportResponse> {
    Ok(TransportResponse {
        status,
        body: body.to_string(),
    })
}

/// A network-level failure that never reached the provider.
pub fn network_error(context: &str) -> Result<TransportResponse> {
    Err(Error::transport(
        context.to_string(),
        std::io::Error::other("connection refused"),
    ))
}

/// Success body whose token stays comfortably inside its lifetime for the
/// duration of a test.
pub fn fresh_token_body(access_token: &str) -> serde_json::Value {
    let now = now_u64();
    json!({
        "access_token": access_token,
        "refresh_token": "refresh-1",
        "expiration": now + 3600,
        "expires_in": 3600,
    })
}

/// Success body whose token is already past the refresh threshold while
/// its refresh token is still well inside the grace window.
pub fn stale_token_body(access_token: &str) -> serde_json::Value {
    let now = now_u64();
    json!({
        "access_token": access_token,
        "refresh_token": "refresh-1",
        "expiration": now,
        "expires_in": 3600,
    })
}

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}
