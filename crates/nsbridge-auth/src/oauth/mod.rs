//! OAuth 2.0 client side of the NetSuite integration.

pub mod token;

pub use token::{AccessToken, CLIENT_CREDENTIALS_GRANT, JWT_BEARER_ASSERTION_TYPE, TokenExchanger};
