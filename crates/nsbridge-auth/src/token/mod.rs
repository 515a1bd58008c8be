//! Client assertion key handling and signing.
//!
//! - [`pem`] - Strict PEM normalization of configured key material
//! - [`assertion`] - RFC 7523 client assertion claims and signing

pub mod assertion;
pub mod pem;

pub use assertion::{
    ASSERTION_LIFETIME_SECS, AssertionClaims, AssertionSigner, REST_WEBSERVICES_SCOPE,
    SignedAssertion, SigningAlgorithm,
};
pub use pem::{NormalizedPem, PEM_LINE_WIDTH, PRIVATE_KEY_LABEL, normalize_pem};
