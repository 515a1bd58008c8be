//! Auth0 database-connection password reset.
//!
//! `POST https://{domain}/dbconnections/change_password` with
//! `{client_id, email, connection}` asks the identity provider to email a
//! reset link. The endpoint answers with plain text on success; the body is
//! not inspected.

use serde::Serialize;
use url::Url;

use crate::error::PipelineError;
use crate::transport::{RemoteFailure, describe_send_error};

/// Request body of the change-password endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest<'a> {
    /// Identity provider application client id.
    pub client_id: &'a str,
    /// Address that receives the reset link.
    pub email: &'a str,
    /// Database connection holding the user.
    pub connection: &'a str,
}

/// Sends password-reset requests to one identity provider connection.
pub struct PasswordResetClient<'a> {
    http_client: &'a reqwest::Client,
    reset_url: &'a Url,
    client_id: &'a str,
    connection: &'a str,
}

impl<'a> PasswordResetClient<'a> {
    /// Creates a client for `reset_url`.
    #[must_use]
    pub fn new(
        http_client: &'a reqwest::Client,
        reset_url: &'a Url,
        client_id: &'a str,
        connection: &'a str,
    ) -> Self {
        Self {
            http_client,
            reset_url,
            client_id,
            connection,
        }
    }

    /// Requests a reset email for `email`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::PasswordReset` if the request fails, times out,
    /// or is answered with a non-success status.
    pub async fn send_reset_email(&self, email: &str) -> Result<(), PipelineError> {
        let body = ChangePasswordRequest {
            client_id: self.client_id,
            email,
            connection: self.connection,
        };

        tracing::debug!(
            reset_url = %self.reset_url,
            connection = self.connection,
            "Requesting password reset email"
        );

        let response = self
            .http_client
            .post(self.reset_url.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::password_reset(describe_send_error(&e)))?;

        if !response.status().is_success() {
            return Err(RemoteFailure::read(response)
                .await
                .into_error(|m| PipelineError::password_reset(m)));
        }

        Ok(())
    }
}
