//! Shared fixtures for connector integration tests.

#![allow(dead_code)]

use std::sync::OnceLock;
use std::time::Duration;

use nsbridge_auth::{ConnectorConfig, ConnectorService, Endpoints};
use p384::pkcs8::{EncodePrivateKey as _, EncodePublicKey as _};
use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/services/rest/auth/oauth2/v1/token";
pub const SUITEQL_PATH: &str = "/services/rest/query/v1/suiteql";
pub const RESET_PATH: &str = "/dbconnections/change_password";

pub const CONSUMER_KEY: &str = "consumer-key-1";
pub const CERTIFICATE_ID: &str = "cert-abc";
pub const CLIENT_ID: &str = "auth0-client";
pub const ACCESS_TOKEN: &str = "ns-access-token";

/// PEM key pair generated once per test binary.
pub struct KeyPair {
    pub private_pem: String,
    pub public_pem: String,
}

/// 2048-bit RSA key pair in PKCS#8 / SPKI PEM.
pub fn rsa_keys() -> &'static KeyPair {
    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| {
        let private_key = RsaPrivateKey::new(&mut OsRng, 2048).expect("Failed to generate RSA key");
        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .expect("Failed to encode RSA private key")
            .to_string();
        let public_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .expect("Failed to encode RSA public key");
        KeyPair {
            private_pem,
            public_pem,
        }
    })
}

/// P-384 key pair in PKCS#8 / SPKI PEM.
pub fn ec_keys() -> &'static KeyPair {
    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| {
        let secret_key = p384::SecretKey::random(&mut OsRng);
        let private_pem = secret_key
            .to_pkcs8_pem(p384::pkcs8::LineEnding::LF)
            .expect("Failed to encode EC private key")
            .to_string();
        let public_pem = secret_key
            .public_key()
            .to_public_key_pem(p384::pkcs8::LineEnding::LF)
            .expect("Failed to encode EC public key");
        KeyPair {
            private_pem,
            public_pem,
        }
    })
}

/// Configuration valid for both lookup and login.
pub fn full_config() -> ConnectorConfig {
    ConnectorConfig {
        account_id: "1234567_SB1".to_string(),
        consumer_key: CONSUMER_KEY.to_string(),
        certificate_id: CERTIFICATE_ID.to_string(),
        private_key: rsa_keys().private_pem.clone(),
        identity_domain: "tenant.auth0.com".to_string(),
        client_id: CLIENT_ID.to_string(),
        request_timeout: Duration::from_secs(5),
        ..ConnectorConfig::default()
    }
}

/// Endpoints that point every remote at `server`.
pub fn mock_endpoints(server: &MockServer) -> Endpoints {
    Endpoints::from_base_urls(&server.uri(), Some(&server.uri()))
        .expect("mock server URI is a valid base URL")
}

pub fn service(server: &MockServer, config: ConnectorConfig) -> ConnectorService {
    ConnectorService::with_endpoints(config, mock_endpoints(server))
        .expect("Failed to create connector service")
}

/// Mounts a token endpoint that issues [`ACCESS_TOKEN`] `times` times.
pub async fn mount_token(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts a SuiteQL endpoint answering with `body` `times` times.
pub async fn mount_suiteql(server: &MockServer, body: Value, times: u64) {
    Mock::given(method("POST"))
        .and(path(SUITEQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts a password-reset endpoint expected `times` times.
pub async fn mount_reset(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path(RESET_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("We've just sent you an email to reset your password."),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Number of requests the server received on `request_path`.
pub async fn hits(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .count()
}

/// The `client_assertion` form field of the first token request.
pub async fn posted_assertion(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap_or_default();
    let token_request = requests
        .iter()
        .find(|r| r.url.path() == TOKEN_PATH)
        .expect("no token request was made");
    url::form_urlencoded::parse(&token_request.body)
        .find(|(key, _)| key == "client_assertion")
        .map(|(_, value)| value.into_owned())
        .expect("token request has no client_assertion")
}
