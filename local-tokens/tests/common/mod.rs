#![allow(dead_code)]

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use local_tokens::server::ServerInfo;
use local_tokens::LocalTokenServer;
use serde_json::Value;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Start a server on a free port so tests can run in parallel.
pub async fn started_server(audience: &str) -> (LocalTokenServer, ServerInfo) {
    init_logger();
    let mut server = LocalTokenServer::new(audience);
    let info = server
        .start(0, "127.0.0.1")
        .await
        .expect("server should start on a free port");
    (server, info)
}

/// Fetch the JWKS and return the decoding key matching the token's kid.
pub async fn decoding_key_for(info: &ServerInfo, token: &str) -> DecodingKey {
    let jwks: Value = reqwest::get(info.jwks_uri.clone())
        .await
        .expect("jwks endpoint should respond")
        .json()
        .await
        .expect("jwks body should be JSON");
    let kid = decode_header(token)
        .expect("token header should parse")
        .kid
        .expect("token header should carry a kid");

    let jwk = jwks["keys"]
        .as_array()
        .expect("jwks should list keys")
        .iter()
        .find(|key| key["kid"] == kid.as_str())
        .expect("token kid should be published in the JWKS");
    DecodingKey::from_rsa_components(
        jwk["n"].as_str().expect("jwk n"),
        jwk["e"].as_str().expect("jwk e"),
    )
    .expect("jwk components should form a key")
}

/// Full verification: signature, audience, and issuer.
pub async fn decode_verified(info: &ServerInfo, token: &str) -> Value {
    let key = decoding_key_for(info, token).await;
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[info.audience.as_str()]);
    validation.set_issuer(&[info.issuer_uri.as_str().trim_end_matches('/')]);
    decode::<Value>(token, &key, &validation)
        .expect("token should verify against the published JWKS")
        .claims
}

/// Signature-only verification, for tokens deliberately issued with bad
/// time or issuer claims.
pub async fn decode_signature_only(info: &ServerInfo, token: &str) -> Value {
    let key = decoding_key_for(info, token).await;
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims::<&str>(&[]);
    decode::<Value>(token, &key, &validation)
        .expect("signature should still verify")
        .claims
}
