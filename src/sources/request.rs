use http::Method;

use crate::cache::token_state::TokenState;
use crate::errors::{Error, RequestSnapshot, Result};
use crate::utils::constants::{
    CONTENT_TYPE_FORM, GRANT_TYPE_APIKEY, GRANT_TYPE_REFRESH, IAM_BASIC_AUTH,
};

use super::{TokenRequest, TransportResponse};

/// Which credential the next fetch presents to the provider.
#[derive(Clone)]
pub enum Grant {
    ApiKey(String),
    Refresh(String),
}

// Grants wrap credential material; only the kind is ever printed.
impl std::fmt::Debug for Grant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grant::ApiKey(_) => f.debug_tuple("ApiKey").field(&"[redacted]").finish(),
            Grant::Refresh(_) => f.debug_tuple("Refresh").field(&"[redacted]").finish(),
        }
    }
}

impl Grant {
    pub fn grant_type(&self) -> &'static str {
        match self {
            Grant::ApiKey(_) => GRANT_TYPE_APIKEY,
            Grant::Refresh(_) => GRANT_TYPE_REFRESH,
        }
    }

    /// Diagnostic view of the exchange this grant produces. No secrets.
    pub fn snapshot(&self, iam_url: &str) -> RequestSnapshot {
        RequestSnapshot {
            method: Method::POST,
            url: iam_url.to_string(),
            grant_type: self.grant_type(),
        }
    }

    /// Form-encoded exchange request against the token endpoint.
    pub fn into_request(self, iam_url: &str) -> TokenRequest {
        let form = match self {
            Grant::ApiKey(apikey) => vec![
                ("grant_type", GRANT_TYPE_APIKEY.to_string()),
                ("apikey", apikey),
            ],
            Grant::Refresh(refresh_token) => vec![
                ("grant_type", GRANT_TYPE_REFRESH.to_string()),
                ("refresh_token", refresh_token),
            ],
        };
        TokenRequest {
            method: Method::POST,
            url: iam_url.to_string(),
            headers: vec![
                ("Content-Type", CONTENT_TYPE_FORM),
                ("Authorization", IAM_BASIC_AUTH),
            ],
            form,
        }
    }
}

/// Interpret the provider's answer: any status >= 400 is a rejection and
/// never treated as a payload; anything below decodes as a fresh
/// [`TokenState`].
pub fn interpret_response(
    snapshot: RequestSnapshot,
    response: TransportResponse,
) -> Result<TokenState> {
    if response.status >= 400 {
        return Err(Error::IdentityProvider {
            status: response.status,
            message: provider_message(&response.body),
            body: response.body,
            request: snapshot,
        });
    }
    serde_json::from_str(&response.body)
        .map_err(|err| Error::transport("decoding token response body", err))
}

/// Providers report failures as `error` or `errorMessage`; fall back to the
/// raw body when neither is present.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("errorMessage")
                .or_else(|| value.get("error"))
                .and_then(|message| message.as_str().map(str::to_owned))
        })
        .unwrap_or_else(|| body.to_string())
}
