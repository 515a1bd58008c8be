//! OAuth 2.0 client credentials token exchange with a JWT client assertion.
//!
//! The signed assertion is posted form-encoded to the NetSuite token endpoint:
//!
//! ```text
//! POST /services/rest/auth/oauth2/v1/token
//! Content-Type: application/x-www-form-urlencoded
//!
//! grant_type=client_credentials
//! &client_assertion_type=urn%3Aietf%3Aparams%3Aoauth%3Aclient-assertion-type%3Ajwt-bearer
//! &client_assertion=<signed JWT>
//! ```
//!
//! A successful response is a JSON object carrying `access_token`.

use std::fmt;

use serde::Deserialize;
use url::Url;

use crate::error::PipelineError;
use crate::token::SignedAssertion;
use crate::transport::{RemoteFailure, describe_send_error};

/// OAuth 2.0 grant type used for the exchange.
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

/// Client assertion type for JWT bearer client authentication (RFC 7523).
pub const JWT_BEARER_ASSERTION_TYPE: &str =
    "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Bearer access token scoped to a single invocation.
///
/// Never logged and never returned to the caller.
pub struct AccessToken(String);

impl AccessToken {
    /// Returns the token value for use in an `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Token endpoint response. Only `access_token` is consumed.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Exchanges signed assertions for access tokens at one token endpoint.
pub struct TokenExchanger<'a> {
    http_client: &'a reqwest::Client,
    token_url: &'a Url,
}

impl<'a> TokenExchanger<'a> {
    /// Creates an exchanger for `token_url`.
    #[must_use]
    pub fn new(http_client: &'a reqwest::Client, token_url: &'a Url) -> Self {
        Self {
            http_client,
            token_url,
        }
    }

    /// Posts the assertion and returns the issued access token.
    ///
    /// The assertion is consumed: it is valid for exactly one exchange.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::TokenExchange` if the request fails or times
    /// out, the endpoint answers with a non-success status, the body is not
    /// JSON, or it lacks an `access_token`.
    pub async fn exchange(&self, assertion: SignedAssertion) -> Result<AccessToken, PipelineError> {
        let params = [
            ("grant_type", CLIENT_CREDENTIALS_GRANT),
            ("client_assertion_type", JWT_BEARER_ASSERTION_TYPE),
            ("client_assertion", assertion.as_str()),
        ];

        tracing::debug!(token_url = %self.token_url, "Requesting NetSuite access token");

        let response = self
            .http_client
            .post(self.token_url.as_str())
            .form(&params)
            .send()
            .await
            .map_err(|e| PipelineError::token_exchange(describe_send_error(&e)))?;

        if !response.status().is_success() {
            return Err(RemoteFailure::read(response)
                .await
                .into_error(|m| PipelineError::token_exchange(m)));
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            PipelineError::token_exchange(format!("Failed to parse token response: {e}"))
        })?;

        let access_token = token_response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PipelineError::token_exchange("token response missing access_token"))?;

        tracing::debug!(
            token_type = token_response.token_type.as_deref().unwrap_or("unknown"),
            expires_in = token_response.expires_in,
            "Access token issued"
        );

        Ok(AccessToken(access_token))
    }
}
