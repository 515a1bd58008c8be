//! # nsbridge-auth
//!
//! NetSuite-backed identity connector.
//!
//! This crate provides:
//! - OAuth 2.0 client credentials with a JWT client assertion (RFC 7523)
//! - SuiteQL lookup of active contacts by email
//! - A login policy that never authenticates and instead asks the identity
//!   provider to send a password-reset email to known contacts
//!
//! ## Overview
//!
//! Each invocation signs a fresh assertion, exchanges it for an access token,
//! queries SuiteQL, and applies the outcome policy. Nothing is cached between
//! invocations.
//!
//! ## Modules
//!
//! - [`config`] - Connector configuration and endpoint resolution
//! - [`token`] - PEM normalization and client assertion signing
//! - [`oauth`] - Token exchange
//! - [`suiteql`] - Contact query and response model
//! - [`federation`] - Identity provider password reset
//! - [`policy`] - Lookup and login outcome policy
//! - [`service`] - The lookup and login pipelines

pub mod config;
pub mod error;
pub mod federation;
pub mod oauth;
pub mod policy;
pub mod service;
pub mod suiteql;
pub mod token;

mod transport;

pub use config::{ConfigError, ConnectorConfig, Endpoints, Mode};
pub use error::{AuthFailureKind, ConnectorError, PipelineError};
pub use policy::{IdentityProfile, LoginDecision, Outcome};
pub use service::ConnectorService;
pub use token::{NormalizedPem, SigningAlgorithm, normalize_pem};

/// Type alias for connector results.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use nsbridge_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ConnectorResult;
    pub use crate::config::{ConfigError, ConnectorConfig, Endpoints, Mode};
    pub use crate::error::{AuthFailureKind, ConnectorError, PipelineError};
    pub use crate::policy::{IdentityProfile, Outcome};
    pub use crate::service::ConnectorService;
}
