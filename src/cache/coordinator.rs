use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::config::settings::CoordinatorConfig;
use crate::errors::{Error, Result};
use crate::helpers::time::now_i64;
use crate::sources::iam::IamTransport;
use crate::sources::request::{interpret_response, Grant};
use crate::sources::TokenTransport;

use super::token_state::TokenState;

/// Settled outcome of a shared in-flight fetch. `None` until it settles.
type FetchOutcome = Option<std::result::Result<TokenState, Error>>;

/// The cached token and the in-flight marker. Every decision in
/// [`TokenCoordinator::get_token`] runs with this slot locked, so two
/// callers can never both believe they are first.
#[derive(Default)]
struct Slot {
    token: Option<TokenState>,
    inflight: Option<watch::Receiver<FetchOutcome>>,
}

/// What a single `get_token` call decided to do, resolved under the slot
/// lock and executed after it is released.
enum Plan {
    Cached(String),
    Fetch(Grant),
    Publish(Grant, watch::Sender<FetchOutcome>, watch::Receiver<FetchOutcome>),
    Await(watch::Receiver<FetchOutcome>),
}

/// Coordinates the lifecycle of one credential identity: decides per call
/// whether the cached token is still usable, fetches or refreshes it when
/// not, and lets concurrent cold callers share a single in-flight fetch.
///
/// Cheap to clone; clones share the same cache slot.
pub struct TokenCoordinator<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    api_key: String,
    iam_url: String,
    transport: T,
    slot: Mutex<Slot>,
}

impl<T> Clone for TokenCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> std::fmt::Debug for TokenCoordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCoordinator").finish_non_exhaustive()
    }
}

impl TokenCoordinator<IamTransport> {
    /// Production coordinator backed by the reqwest transport.
    pub fn from_config(config: CoordinatorConfig) -> Result<Self> {
        let transport = IamTransport::new()?;
        Self::new(config, transport)
    }
}

impl<T: TokenTransport + 'static> TokenCoordinator<T> {
    /// Fails when the API key is absent; the IAM URL falls back to the
    /// production endpoint.
    pub fn new(config: CoordinatorConfig, transport: T) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Configuration(
                "an API key is required to request tokens".to_string(),
            ));
        }
        let iam_url = config.resolved_iam_url().to_string();
        Ok(Self {
            inner: Arc::new(Inner {
                api_key: config.api_key,
                iam_url,
                transport,
                slot: Mutex::new(Slot::default()),
            }),
        })
    }

    /// Returns a currently-valid bearer token.
    ///
    /// A cached, unexpired token is returned without a network call. An
    /// expired token triggers a refresh-grant fetch while the refresh token
    /// is still good, an apikey-grant fetch otherwise; failures on these
    /// paths propagate directly. When nothing is cached yet, the first
    /// caller publishes a shared fetch that every concurrent caller awaits;
    /// a caller that watched someone else's fetch fail gets exactly one
    /// fresh attempt of its own before any error surfaces.
    pub async fn get_token(&self) -> Result<String> {
        let plan = {
            let mut guard = self.inner.slot.lock().await;
            let slot = &mut *guard;
            let now = now_i64();
            match &slot.token {
                Some(state) if state.is_access_token_expired(now) => {
                    let grant = match state.refresh_token.as_ref() {
                        Some(refresh) if !state.is_refresh_token_expired(now) => {
                            debug!("access token expired, refresh token still valid");
                            Grant::Refresh(refresh.clone())
                        }
                        _ => {
                            debug!("access token expired, falling back to the apikey grant");
                            Grant::ApiKey(self.inner.api_key.clone())
                        }
                    };
                    Plan::Fetch(grant)
                }
                Some(state) => Plan::Cached(state.access_token.clone()),
                None => match &slot.inflight {
                    Some(rx) => Plan::Await(rx.clone()),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        slot.inflight = Some(rx.clone());
                        Plan::Publish(Grant::ApiKey(self.inner.api_key.clone()), tx, rx)
                    }
                },
            }
        };

        match plan {
            Plan::Cached(token) => {
                debug!("returning cached access token");
                Ok(token)
            }
            Plan::Fetch(grant) => {
                let state = self.inner.fetch_and_store(grant).await?;
                Ok(state.access_token)
            }
            Plan::Publish(grant, tx, rx) => {
                // The fetch runs in its own task so dropping this caller
                // does not abandon the waiters piggybacking on it.
                let inner = self.inner.clone();
                tokio::spawn(async move {
                    let result = inner.fetch_and_store(grant).await;
                    {
                        let mut slot = inner.slot.lock().await;
                        slot.inflight = None;
                    }
                    let _ = tx.send(Some(result));
                });
                // The publishing caller itself takes the direct path:
                // failures propagate, no retry.
                match Self::settled(rx).await {
                    Some(Ok(state)) => Ok(state.access_token),
                    Some(Err(err)) => Err(err),
                    None => Err(Error::transport(
                        "awaiting token fetch",
                        std::io::Error::other("fetch task stopped before settling"),
                    )),
                }
            }
            Plan::Await(rx) => match Self::settled(rx).await {
                Some(Ok(state)) => Ok(state.access_token),
                other => {
                    match &other {
                        Some(Err(err)) => {
                            warn!(error = %err, "shared token fetch failed, retrying once")
                        }
                        _ => warn!("shared token fetch abandoned, retrying once"),
                    }
                    let grant = Grant::ApiKey(self.inner.api_key.clone());
                    let state = self.inner.fetch_and_store(grant).await?;
                    Ok(state.access_token)
                }
            },
        }
    }

    /// Calls [`Self::get_token`] and formats the bearer-scheme header value.
    pub async fn get_auth_header(&self) -> Result<String> {
        let token = self.get_token().await?;
        Ok(format!("Bearer {token}"))
    }

    async fn settled(mut rx: watch::Receiver<FetchOutcome>) -> FetchOutcome {
        match rx.wait_for(|outcome| outcome.is_some()).await {
            Ok(outcome) => (*outcome).clone(),
            // Sender dropped without settling, e.g. runtime teardown.
            Err(_) => None,
        }
    }
}

impl<T: TokenTransport> Inner<T> {
    /// Performs one exchange and, on success, replaces the cached state
    /// wholesale. A failed fetch never touches the slot.
    async fn fetch_and_store(&self, grant: Grant) -> Result<TokenState> {
        let snapshot = grant.snapshot(&self.iam_url);
        info!(grant_type = grant.grant_type(), "requesting token from identity provider");

        let response = self
            .transport
            .dispatch(grant.into_request(&self.iam_url))
            .await?;
        let state = interpret_response(snapshot, response)?;

        let mut slot = self.slot.lock().await;
        slot.token = Some(state.clone());
        info!(
            expiration = state.expiration,
            expires_in = state.expires_in,
            "token fetch succeeded"
        );
        Ok(state)
    }
}
