//! Bearer-authenticated SuiteQL requests.

use url::Url;

use super::SuiteQlResponse;
use super::query::SuiteQlRequest;
use crate::error::PipelineError;
use crate::oauth::AccessToken;
use crate::transport::{RemoteFailure, describe_send_error};

/// Runs the contact-by-email query against a SuiteQL endpoint.
pub struct ContactLookup<'a> {
    http_client: &'a reqwest::Client,
    query_url: &'a Url,
}

impl<'a> ContactLookup<'a> {
    /// Creates a lookup against `query_url`.
    #[must_use]
    pub fn new(http_client: &'a reqwest::Client, query_url: &'a Url) -> Self {
        Self {
            http_client,
            query_url,
        }
    }

    /// Queries active contacts matching `email`, case-insensitively.
    ///
    /// `email` is untrusted; it is escaped before being embedded in the query.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Query` if the request fails or times out, the
    /// endpoint answers with a non-success status, or the body is malformed.
    pub async fn find_by_email(
        &self,
        access_token: &AccessToken,
        email: &str,
    ) -> Result<SuiteQlResponse, PipelineError> {
        let request = SuiteQlRequest::contact_by_email(email);

        tracing::debug!(query_url = %self.query_url, "Running SuiteQL contact lookup");

        let response = self
            .http_client
            .post(self.query_url.as_str())
            .bearer_auth(access_token.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header("Prefer", "transient")
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::query(describe_send_error(&e)))?;

        if !response.status().is_success() {
            return Err(RemoteFailure::read(response)
                .await
                .into_error(|m| PipelineError::query(m)));
        }

        let result: SuiteQlResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::query(format!("Failed to parse SuiteQL response: {e}")))?;

        tracing::debug!(
            rows = result.items.len(),
            count = result.count,
            "SuiteQL lookup completed"
        );

        Ok(result)
    }
}
