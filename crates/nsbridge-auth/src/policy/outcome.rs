//! Invocation outcomes.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::error::{AuthFailureKind, ConnectorError};

/// External identity profile returned by a successful lookup.
///
/// `user_id` is the NetSuite internal id of the contact, so it is stable
/// across lookups of the same contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProfile {
    /// NetSuite contact id.
    pub user_id: String,
    /// Contact email.
    pub email: String,
}

/// Single result of one invocation, flattened for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Lookup found a contact.
    Profile(IdentityProfile),
    /// Lookup found no usable contact.
    NoProfile,
    /// Login was rejected.
    AuthFailure {
        /// Which rejection applies.
        kind: AuthFailureKind,
        /// User-facing message.
        message: String,
    },
    /// Any other failure, including configuration errors.
    TransportError(String),
}

impl Outcome {
    /// Returns `true` for the two lookup outcomes.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Profile(_) | Self::NoProfile)
    }
}

impl From<ConnectorError> for Outcome {
    fn from(err: ConnectorError) -> Self {
        match err {
            ConnectorError::AuthFailure { kind, message } => Self::AuthFailure { kind, message },
            other => Self::TransportError(other.to_string()),
        }
    }
}

impl From<Result<Option<IdentityProfile>, ConnectorError>> for Outcome {
    fn from(result: Result<Option<IdentityProfile>, ConnectorError>) -> Self {
        match result {
            Ok(Some(profile)) => Self::Profile(profile),
            Ok(None) => Self::NoProfile,
            Err(err) => err.into(),
        }
    }
}

impl From<Result<Infallible, ConnectorError>> for Outcome {
    fn from(result: Result<Infallible, ConnectorError>) -> Self {
        match result {
            Ok(never) => match never {},
            Err(err) => err.into(),
        }
    }
}
