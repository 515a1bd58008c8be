//! Verifies the client assertion and token request the connector posts.

mod common;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use common::*;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use nsbridge_auth::ConnectorConfig;
use nsbridge_auth::token::AssertionClaims;
use serde_json::{Value, json};
use wiremock::MockServer;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn run_lookup(server: &MockServer, config: ConnectorConfig) {
    mount_token(server, 1).await;
    mount_suiteql(server, json!({"items": []}), 1).await;
    service(server, config)
        .lookup("a@b.com")
        .await
        .expect("lookup should succeed");
}

fn validation(alg: Algorithm, audience: &str) -> Validation {
    let mut validation = Validation::new(alg);
    validation.set_audience(&[audience]);
    validation.set_issuer(&[CONSUMER_KEY]);
    validation.set_required_spec_claims(&["exp", "aud", "iss"]);
    validation
}

#[tokio::test]
async fn test_assertion_is_verifiable_ps256() {
    let server = MockServer::start().await;
    run_lookup(&server, full_config()).await;

    let assertion = posted_assertion(&server).await;
    let token_url = mock_endpoints(&server).token_url.to_string();

    let header = decode_header(&assertion).unwrap();
    assert_eq!(header.alg, Algorithm::PS256);
    assert_eq!(header.kid.as_deref(), Some(CERTIFICATE_ID));
    assert_eq!(header.typ.as_deref(), Some("JWT"));

    let key = DecodingKey::from_rsa_pem(rsa_keys().public_pem.as_bytes()).unwrap();
    let data =
        decode::<AssertionClaims>(&assertion, &key, &validation(Algorithm::PS256, &token_url))
            .unwrap();

    assert_eq!(data.claims.iss, CONSUMER_KEY);
    assert_eq!(data.claims.scope, "rest_webservices");
    assert_eq!(data.claims.aud, token_url);
    assert_eq!(data.claims.exp - data.claims.iat, 3600);
}

#[tokio::test]
async fn test_assertion_with_es384_key() {
    let server = MockServer::start().await;
    let config = ConnectorConfig {
        private_key: ec_keys().private_pem.clone(),
        sign_algorithm: "ES384".to_string(),
        ..full_config()
    };
    run_lookup(&server, config).await;

    let assertion = posted_assertion(&server).await;
    let token_url = mock_endpoints(&server).token_url.to_string();

    let key = DecodingKey::from_ec_pem(ec_keys().public_pem.as_bytes()).unwrap();
    let data =
        decode::<AssertionClaims>(&assertion, &key, &validation(Algorithm::ES384, &token_url))
            .unwrap();

    assert_eq!(data.claims.iss, CONSUMER_KEY);
}

#[tokio::test]
async fn test_assertion_claims_have_exact_shape() {
    let server = MockServer::start().await;
    run_lookup(&server, full_config()).await;

    let assertion = posted_assertion(&server).await;
    let payload = assertion.split('.').nth(1).unwrap();
    let claims: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();

    let mut keys: Vec<&str> = claims
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(keys, ["aud", "exp", "iat", "iss", "scope"]);
}

#[tokio::test]
async fn test_escaped_single_line_key_is_accepted() {
    let server = MockServer::start().await;
    let escaped = rsa_keys().private_pem.trim().replace('\n', "\\n");
    let config = ConnectorConfig {
        private_key: escaped,
        ..full_config()
    };
    run_lookup(&server, config).await;

    let assertion = posted_assertion(&server).await;
    let token_url = mock_endpoints(&server).token_url.to_string();
    let key = DecodingKey::from_rsa_pem(rsa_keys().public_pem.as_bytes()).unwrap();
    assert!(
        decode::<AssertionClaims>(&assertion, &key, &validation(Algorithm::PS256, &token_url))
            .is_ok()
    );
}

#[tokio::test]
async fn test_key_without_line_breaks_is_accepted() {
    let server = MockServer::start().await;
    let flattened: String = rsa_keys()
        .private_pem
        .lines()
        .collect::<Vec<_>>()
        .join(" ");
    let config = ConnectorConfig {
        private_key: flattened,
        sign_algorithm: "RS256".to_string(),
        ..full_config()
    };
    run_lookup(&server, config).await;

    let header = decode_header(&posted_assertion(&server).await).unwrap();
    assert_eq!(header.alg, Algorithm::RS256);
}

#[tokio::test]
async fn test_token_request_is_form_encoded_client_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains(
            "client_assertion_type=urn%3Aietf%3Aparams%3Aoauth%3Aclient-assertion-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("client_assertion=ey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_suiteql(&server, json!({"items": []}), 1).await;

    service(&server, full_config())
        .lookup("a@b.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_each_invocation_signs_a_new_assertion() {
    let server = MockServer::start().await;
    mount_token(&server, 2).await;
    mount_suiteql(&server, json!({"items": []}), 2).await;

    let service = service(&server, full_config());
    service.lookup("a@b.com").await.unwrap();
    service.lookup("a@b.com").await.unwrap();

    assert_eq!(hits(&server, TOKEN_PATH).await, 2);
}

#[tokio::test]
async fn test_offline_assertion_makes_no_requests() {
    let server = MockServer::start().await;

    let assertion = service(&server, full_config()).client_assertion().unwrap();

    let header = decode_header(assertion.as_str()).unwrap();
    assert_eq!(header.kid.as_deref(), Some(CERTIFICATE_ID));
    assert!(server.received_requests().await.unwrap().is_empty());
}
