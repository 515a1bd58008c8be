//! Connector service: the lookup and login pipelines.
//!
//! Each invocation runs the same strictly sequential stages:
//!
//! 1. validate configuration for the mode (no network before this passes)
//! 2. normalize the private key and sign a client assertion
//! 3. exchange the assertion for an access token
//! 4. query SuiteQL for active contacts with the email
//! 5. apply the outcome policy (login may send a password-reset email)
//!
//! A failing stage ends the invocation; nothing is retried and no later stage
//! runs. Operational faults are translated into a single
//! [`ConnectorError::Transport`] at this boundary.
//!
//! # Example
//!
//! ```ignore
//! use nsbridge_auth::{ConnectorConfig, ConnectorService};
//!
//! let service = ConnectorService::new(config)?;
//! match service.lookup("jane@example.com").await? {
//!     Some(profile) => println!("{}", profile.user_id),
//!     None => println!("not found"),
//! }
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::ConnectorResult;
use crate::config::{ConfigError, ConnectorConfig, Endpoints, Mode};
use crate::error::{AuthFailureKind, ConnectorError, PipelineError};
use crate::federation::PasswordResetClient;
use crate::oauth::{AccessToken, TokenExchanger};
use crate::policy::{IdentityProfile, LoginDecision, login_decision, lookup_profile};
use crate::suiteql::{ContactLookup, SuiteQlResponse};
use crate::token::{
    AssertionClaims, AssertionSigner, PRIVATE_KEY_LABEL, SignedAssertion, normalize_pem,
};
use crate::transport::build_client;

/// Runs lookup and login invocations for one connector configuration.
///
/// Holds no per-invocation state; it is `Send + Sync` and can be shared
/// behind an [`Arc`].
pub struct ConnectorService {
    config: ConnectorConfig,
    endpoints: Option<Endpoints>,
    http_client: reqwest::Client,
}

impl ConnectorService {
    /// Creates a service that derives its endpoints from the configuration.
    ///
    /// Configuration is not validated here; each invocation validates the
    /// settings its mode needs.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ConnectorConfig) -> ConnectorResult<Self> {
        let http_client = build_client(config.request_timeout)
            .map_err(|e| ConnectorError::transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            endpoints: None,
            http_client,
        })
    }

    /// Creates a service that talks to explicit endpoints.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::Transport` if the HTTP client cannot be built.
    pub fn with_endpoints(config: ConnectorConfig, endpoints: Endpoints) -> ConnectorResult<Self> {
        let mut service = Self::new(config)?;
        service.endpoints = Some(endpoints);
        Ok(service)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Looks up the active contact with `email`.
    ///
    /// Returns `Ok(None)` when no usable contact exists.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::Configuration` if a required setting is
    /// missing, or `ConnectorError::Transport` if any stage fails.
    #[tracing::instrument(name = "lookup", skip(self), fields(account = %self.config.account_id))]
    pub async fn lookup(&self, email: &str) -> ConnectorResult<Option<IdentityProfile>> {
        let endpoints = self.prepare(Mode::Lookup)?;

        let response = self
            .query_contacts(&endpoints, email)
            .await
            .map_err(report)?;

        let profile = lookup_profile(&response, email);
        match &profile {
            Some(p) => tracing::info!(outcome = "found", user_id = %p.user_id, "Contact found"),
            None => tracing::info!(outcome = "not_found", rows = response.items.len(), "Contact not found"),
        }
        Ok(profile)
    }

    /// Handles a login attempt for `email`.
    ///
    /// Login never succeeds. If no active contact matches, the attempt is
    /// rejected with [`AuthFailureKind::InvalidCredentials`]. If one does, a
    /// password-reset email is requested and the attempt is rejected with
    /// [`AuthFailureKind::ResetRequired`]. The password is not inspected.
    ///
    /// # Errors
    ///
    /// Always returns an error: one of the two `AuthFailure` rejections,
    /// `ConnectorError::Configuration`, or `ConnectorError::Transport`.
    #[tracing::instrument(
        name = "login",
        skip(self, _password),
        fields(account = %self.config.account_id)
    )]
    pub async fn login(&self, email: &str, _password: &str) -> ConnectorResult<Infallible> {
        let endpoints = self.prepare(Mode::Login)?;

        let response = self
            .query_contacts(&endpoints, email)
            .await
            .map_err(report)?;

        match login_decision(&response) {
            LoginDecision::Reject => {
                tracing::info!(outcome = "not_found", "Login rejected: no matching contact");
                Err(ConnectorError::auth_failure(
                    AuthFailureKind::InvalidCredentials,
                ))
            }
            LoginDecision::ResetRequired => {
                let reset_url = endpoints
                    .password_reset_url
                    .as_ref()
                    .ok_or(ConfigError::Missing(vec!["identity_domain"]))?;

                PasswordResetClient::new(
                    &self.http_client,
                    reset_url,
                    self.config.client_id.trim(),
                    self.config.connection_name(),
                )
                .send_reset_email(email)
                .await
                .map_err(report)?;

                tracing::info!(outcome = "reset_email_sent", "Login rejected: password reset email sent");
                Err(ConnectorError::auth_failure(AuthFailureKind::ResetRequired))
            }
        }
    }

    /// Signs a client assertion for the token endpoint without sending it.
    ///
    /// Useful for checking key, algorithm and certificate id settings offline.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::Configuration` if a lookup setting is missing,
    /// or `ConnectorError::Transport` if the key cannot sign.
    pub fn client_assertion(&self) -> ConnectorResult<SignedAssertion> {
        let endpoints = self.prepare(Mode::Lookup)?;
        self.sign_assertion(&endpoints).map_err(report)
    }

    /// Runs [`lookup`](Self::lookup) on a spawned task and hands the result to
    /// `callback` exactly once.
    pub fn spawn_lookup<F>(self: Arc<Self>, email: impl Into<String>, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(ConnectorResult<Option<IdentityProfile>>) + Send + 'static,
    {
        let email = email.into();
        let span = tracing::Span::current();
        tokio::spawn(
            async move {
                let result = self.lookup(&email).await;
                callback(result);
            }
            .instrument(span),
        )
    }

    /// Runs [`login`](Self::login) on a spawned task and hands the result to
    /// `callback` exactly once.
    pub fn spawn_login<F>(
        self: Arc<Self>,
        email: impl Into<String>,
        password: impl Into<String>,
        callback: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(ConnectorResult<Infallible>) + Send + 'static,
    {
        let email = email.into();
        let password = password.into();
        let span = tracing::Span::current();
        tokio::spawn(
            async move {
                let result = self.login(&email, &password).await;
                callback(result);
            }
            .instrument(span),
        )
    }

    /// Validates configuration for `mode` and resolves endpoints.
    fn prepare(&self, mode: Mode) -> Result<Endpoints, ConfigError> {
        if let Err(err) = self.config.validate_for(mode) {
            tracing::warn!(%mode, error = %err, "Connector configuration rejected");
            return Err(err);
        }

        let endpoints = match &self.endpoints {
            Some(endpoints) => endpoints.clone(),
            None => Endpoints::from_config(&self.config)?,
        };

        if mode == Mode::Login && endpoints.password_reset_url.is_none() {
            return Err(ConfigError::Missing(vec!["identity_domain"]));
        }

        Ok(endpoints)
    }

    /// Stages 2 to 4: sign, exchange, query.
    async fn query_contacts(
        &self,
        endpoints: &Endpoints,
        email: &str,
    ) -> Result<SuiteQlResponse, PipelineError> {
        let access_token = self.acquire_token(endpoints).await?;
        ContactLookup::new(&self.http_client, &endpoints.query_url)
            .find_by_email(&access_token, email)
            .await
    }

    async fn acquire_token(&self, endpoints: &Endpoints) -> Result<AccessToken, PipelineError> {
        let assertion = self.sign_assertion(endpoints)?;

        TokenExchanger::new(&self.http_client, &endpoints.token_url)
            .exchange(assertion)
            .await
    }

    /// Signs a fresh assertion whose audience is the token endpoint.
    fn sign_assertion(&self, endpoints: &Endpoints) -> Result<SignedAssertion, PipelineError> {
        let pem = normalize_pem(&self.config.private_key, PRIVATE_KEY_LABEL);
        let signer = AssertionSigner::new(
            &pem,
            self.config.sign_algorithm(),
            self.config.certificate_id.trim(),
        )?;

        let claims = AssertionClaims::issued_now(
            self.config.consumer_key.trim(),
            endpoints.token_url.as_str(),
        );
        let assertion = signer.sign(&claims)?;

        tracing::debug!(
            alg = %signer.algorithm(),
            kid = signer.key_id(),
            exp = claims.exp,
            "Client assertion signed"
        );

        Ok(assertion)
    }
}

/// Logs a stage failure and translates it for the caller.
fn report(err: PipelineError) -> ConnectorError {
    tracing::warn!(stage = err.stage(), error = %err, "Connector pipeline failed");
    err.into()
}
