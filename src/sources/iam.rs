use std::time::Duration;

use reqwest::Client;

use crate::errors::{Error, Result};
use crate::utils::constants::DEFAULT_HTTP_TIMEOUT_MS;

use super::{TokenRequest, TokenTransport, TransportResponse};

/// reqwest-backed transport for the identity-provider exchange.
///
/// Owns the call deadline; the coordinator imposes no timeout of its own.
#[derive(Debug, Clone)]
pub struct IamTransport {
    client: Client,
}

impl IamTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS))
            .build()
            .map_err(|err| Error::transport("building HTTP client", err))?;
        Ok(Self { client })
    }

    /// Reuse an existing client (connection pool, custom TLS, proxies).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl TokenTransport for IamTransport {
    async fn dispatch(&self, request: TokenRequest) -> Result<TransportResponse> {
        let mut builder = self.client.request(request.method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(*key, *value);
        }

        let response = builder
            .form(&request.form)
            .send()
            .await
            .map_err(|err| Error::transport("sending token request", err))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| Error::transport("reading token response body", err))?;
        Ok(TransportResponse { status, body })
    }
}
