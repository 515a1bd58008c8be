//! JWT client assertion construction and signing (RFC 7523).
//!
//! NetSuite's OAuth 2.0 client credentials flow authenticates the integration
//! with a JWT signed by the private key whose certificate was uploaded to the
//! integration record. The assertion carries:
//!
//! - `iss`: the integration consumer key
//! - `scope`: `rest_webservices`
//! - `aud`: the exact token endpoint URL the assertion is posted to
//! - `iat` / `exp`: issue time and issue time + 3600 seconds
//!
//! The JWS header carries `alg`, `typ: "JWT"` and `kid` (the certificate id).
//!
//! ## Supported Algorithms
//!
//! - **RS256 / RS384 / RS512**: RSA PKCS#1 v1.5
//! - **PS256 / PS384 / PS512**: RSA-PSS (NetSuite's recommended choice)
//! - **ES256 / ES384**: ECDSA over P-256 / P-384

use std::fmt;
use std::str::FromStr;

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::pem::NormalizedPem;
use crate::error::PipelineError;

/// Lifetime of a client assertion in seconds.
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Scope requested for NetSuite REST web services.
pub const REST_WEBSERVICES_SCOPE: &str = "rest_webservices";

// ============================================================================
// Signing Algorithm
// ============================================================================

/// Signing algorithms accepted for client assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
    /// RSA PKCS#1 v1.5 with SHA-256.
    RS256,
    /// RSA PKCS#1 v1.5 with SHA-384.
    RS384,
    /// RSA PKCS#1 v1.5 with SHA-512.
    RS512,
    /// RSA-PSS with SHA-256.
    PS256,
    /// RSA-PSS with SHA-384.
    PS384,
    /// RSA-PSS with SHA-512.
    PS512,
    /// ECDSA with P-256 and SHA-256.
    ES256,
    /// ECDSA with P-384 and SHA-384.
    ES384,
}

impl SigningAlgorithm {
    /// Converts to the `jsonwebtoken` Algorithm type.
    #[must_use]
    pub fn to_jwt_algorithm(self) -> Algorithm {
        match self {
            Self::RS256 => Algorithm::RS256,
            Self::RS384 => Algorithm::RS384,
            Self::RS512 => Algorithm::RS512,
            Self::PS256 => Algorithm::PS256,
            Self::PS384 => Algorithm::PS384,
            Self::PS512 => Algorithm::PS512,
            Self::ES256 => Algorithm::ES256,
            Self::ES384 => Algorithm::ES384,
        }
    }

    /// Returns the algorithm name as used in JWS headers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
        }
    }

    /// Returns `true` if this is an RSA-based algorithm.
    #[must_use]
    pub fn is_rsa(&self) -> bool {
        !self.is_ec()
    }

    /// Returns `true` if this is an EC-based algorithm.
    #[must_use]
    pub fn is_ec(&self) -> bool {
        matches!(self, Self::ES256 | Self::ES384)
    }
}

impl FromStr for SigningAlgorithm {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RS256" => Ok(Self::RS256),
            "RS384" => Ok(Self::RS384),
            "RS512" => Ok(Self::RS512),
            "PS256" => Ok(Self::PS256),
            "PS384" => Ok(Self::PS384),
            "PS512" => Ok(Self::PS512),
            "ES256" => Ok(Self::ES256),
            "ES384" => Ok(Self::ES384),
            other => Err(PipelineError::signing(format!(
                "unsupported signing algorithm '{other}'"
            ))),
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Claims
// ============================================================================

/// Claim set of a NetSuite client assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionClaims {
    /// Issuer: the integration consumer key.
    pub iss: String,

    /// Requested scope.
    pub scope: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp), always `iat + 3600`.
    pub exp: i64,

    /// Audience: the token endpoint URL.
    pub aud: String,
}

impl AssertionClaims {
    /// Builds claims issued at `now`.
    #[must_use]
    pub fn issued_at(
        consumer_key: impl Into<String>,
        token_url: impl Into<String>,
        now: OffsetDateTime,
    ) -> Self {
        let iat = now.unix_timestamp();
        Self {
            iss: consumer_key.into(),
            scope: REST_WEBSERVICES_SCOPE.to_string(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
            aud: token_url.into(),
        }
    }

    /// Builds claims issued at the current time.
    #[must_use]
    pub fn issued_now(consumer_key: impl Into<String>, token_url: impl Into<String>) -> Self {
        Self::issued_at(consumer_key, token_url, OffsetDateTime::now_utc())
    }
}

/// A compact, signed JWS ready to be posted once to the token endpoint.
///
/// Deliberately not `Clone`: an assertion is consumed by a single exchange.
pub struct SignedAssertion(String);

impl SignedAssertion {
    /// Returns the compact serialization.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SignedAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignedAssertion(<redacted>)")
    }
}

// ============================================================================
// Signer
// ============================================================================

/// Signs client assertions with the integration's private key.
pub struct AssertionSigner {
    algorithm: SigningAlgorithm,
    key_id: String,
    encoding_key: EncodingKey,
}

impl AssertionSigner {
    /// Parses the key for the named algorithm.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Signing` if the algorithm is unsupported or the
    /// key cannot be parsed for it.
    pub fn new(
        pem: &NormalizedPem,
        algorithm: &str,
        key_id: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        let algorithm: SigningAlgorithm = algorithm.parse()?;

        let encoding_key = if algorithm.is_rsa() {
            EncodingKey::from_rsa_pem(pem.as_bytes())
        } else {
            EncodingKey::from_ec_pem(pem.as_bytes())
        }
        .map_err(|e| {
            PipelineError::signing(format!("invalid {algorithm} private key: {e}"))
        })?;

        Ok(Self {
            algorithm,
            key_id: key_id.into(),
            encoding_key,
        })
    }

    /// Returns the signing algorithm.
    #[must_use]
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Returns the key id placed in the `kid` header.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Signs `claims` into a compact JWS.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Signing` if serialization or signing fails.
    pub fn sign(&self, claims: &AssertionClaims) -> Result<SignedAssertion, PipelineError> {
        let mut header = Header::new(self.algorithm.to_jwt_algorithm());
        header.typ = Some("JWT".to_string());
        header.kid = Some(self.key_id.clone());

        encode(&header, claims, &self.encoding_key)
            .map(SignedAssertion)
            .map_err(|e| PipelineError::signing(e.to_string()))
    }
}
