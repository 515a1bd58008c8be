//! Error types for the connector pipeline.
//!
//! Two layers exist:
//!
//! - [`PipelineError`] describes an operational fault inside one stage of the
//!   pipeline (signing, token exchange, SuiteQL query, password reset).
//! - [`ConnectorError`] is what callers of [`crate::ConnectorService`] see.
//!   Every `PipelineError` is collapsed into [`ConnectorError::Transport`] by
//!   the `From` conversion at the pipeline boundary.
//!
//! Configuration errors and the two login rejections never pass through the
//! translation; they reach the caller as-is.

use std::fmt;

use serde_json::Value;

use crate::config::ConfigError;

// ============================================================================
// Pipeline Errors
// ============================================================================

/// A fault raised by one stage of the pipeline.
///
/// Each variant carries a local message and, when the remote service answered
/// with a JSON body, that body verbatim.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The private key could not be parsed or the algorithm is unsupported.
    #[error("Failed to sign client assertion: {message}")]
    Signing {
        /// Description of the signing failure.
        message: String,
    },

    /// The OAuth2 token request failed or returned no access token.
    #[error("Token exchange failed: {message}")]
    TokenExchange {
        /// Description of the failure.
        message: String,
        /// JSON error body returned by the token endpoint, if any.
        remote_body: Option<Value>,
    },

    /// The SuiteQL query failed or returned a malformed body.
    #[error("SuiteQL query failed: {message}")]
    Query {
        /// Description of the failure.
        message: String,
        /// JSON error body returned by the query endpoint, if any.
        remote_body: Option<Value>,
    },

    /// The identity provider rejected the password-reset request.
    #[error("Password reset request failed: {message}")]
    PasswordReset {
        /// Description of the failure.
        message: String,
        /// JSON error body returned by the identity provider, if any.
        remote_body: Option<Value>,
    },
}

impl PipelineError {
    /// Creates a new `Signing` error.
    #[must_use]
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Creates a new `TokenExchange` error without a remote body.
    #[must_use]
    pub fn token_exchange(message: impl Into<String>) -> Self {
        Self::TokenExchange {
            message: message.into(),
            remote_body: None,
        }
    }

    /// Creates a new `Query` error without a remote body.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
            remote_body: None,
        }
    }

    /// Creates a new `PasswordReset` error without a remote body.
    #[must_use]
    pub fn password_reset(message: impl Into<String>) -> Self {
        Self::PasswordReset {
            message: message.into(),
            remote_body: None,
        }
    }

    /// Attaches the remote service's JSON error body.
    ///
    /// Has no effect on `Signing`, which never involves a remote call.
    #[must_use]
    pub fn with_remote_body(mut self, body: Value) -> Self {
        match &mut self {
            Self::TokenExchange { remote_body, .. }
            | Self::Query { remote_body, .. }
            | Self::PasswordReset { remote_body, .. } => *remote_body = Some(body),
            Self::Signing { .. } => {}
        }
        self
    }

    /// Returns the local failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Signing { message }
            | Self::TokenExchange { message, .. }
            | Self::Query { message, .. }
            | Self::PasswordReset { message, .. } => message,
        }
    }

    /// Returns the remote JSON error body, if the remote service sent one.
    #[must_use]
    pub fn remote_body(&self) -> Option<&Value> {
        match self {
            Self::Signing { .. } => None,
            Self::TokenExchange { remote_body, .. }
            | Self::Query { remote_body, .. }
            | Self::PasswordReset { remote_body, .. } => remote_body.as_ref(),
        }
    }

    /// Returns the pipeline stage that raised this error.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Signing { .. } => "signing",
            Self::TokenExchange { .. } => "token_exchange",
            Self::Query { .. } => "query",
            Self::PasswordReset { .. } => "password_reset",
        }
    }

    /// Renders the single message reported to the caller.
    ///
    /// Prefers the remote structured error body, then the local message, then
    /// the `Display` form. The result is never empty.
    #[must_use]
    pub fn report_message(&self) -> String {
        if let Some(body) = self.remote_body().filter(|b| !b.is_null()) {
            return body.to_string();
        }
        let message = self.message().trim();
        if !message.is_empty() {
            return message.to_string();
        }
        self.to_string()
    }
}

// ============================================================================
// Connector Errors
// ============================================================================

/// Why a login attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthFailureKind {
    /// No active contact matched the email.
    InvalidCredentials,
    /// A contact matched; a password-reset email was sent instead of a session.
    ResetRequired,
}

impl AuthFailureKind {
    /// Returns the stable machine-readable code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::ResetRequired => "reset_required",
        }
    }

    /// Returns the message delivered to the end user.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid credentials provided.",
            Self::ResetRequired => "Reset Email Sent, Please Reset to Continue",
        }
    }
}

impl fmt::Display for AuthFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported to the host that invoked the connector.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Required settings are missing or invalid. Raised before any network call.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// Login was rejected. This is an expected business outcome, not a fault.
    #[error("{message}")]
    AuthFailure {
        /// Which rejection applies.
        kind: AuthFailureKind,
        /// User-facing message.
        message: String,
    },

    /// An operational fault in any pipeline stage.
    #[error("{message}")]
    Transport {
        /// Translated, non-empty failure message.
        message: String,
    },
}

impl ConnectorError {
    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates the `AuthFailure` for the given kind with its fixed message.
    #[must_use]
    pub fn auth_failure(kind: AuthFailureKind) -> Self {
        Self::AuthFailure {
            kind,
            message: kind.user_message().to_string(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Returns `true` if this is a login rejection.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailure { .. })
    }

    /// Returns `true` if this is an operational fault.
    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns the login rejection kind, if this is one.
    #[must_use]
    pub fn auth_failure_kind(&self) -> Option<AuthFailureKind> {
        match self {
            Self::AuthFailure { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<PipelineError> for ConnectorError {
    fn from(err: PipelineError) -> Self {
        Self::Transport {
            message: err.report_message(),
        }
    }
}

impl From<ConfigError> for ConnectorError {
    fn from(err: ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}
