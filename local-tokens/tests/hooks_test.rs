mod common;

use common::{decode_signature_only, decode_verified, started_server};
use local_tokens::builtin::{CustomClaim, CustomClaims, ExpireTokens, InvalidateSignature};
use local_tokens::errors::{ClientError, HookError};
use local_tokens::{hook_fn, BEFORE_TOKEN_SIGNING};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const AUDIENCE: &str = "apiAudience";

#[tokio::test]
async fn custom_hooks_shape_the_issued_payload() {
    let (mut server, info) = started_server(AUDIENCE).await;

    server
        .hooks
        .add(
            BEFORE_TOKEN_SIGNING,
            hook_fn(|draft, _| {
                draft.set_claim("foo", "bar");
                Ok(())
            }),
        )
        .unwrap();
    // Pull an id out of the requested scope, e.g. "email fancy:123".
    server
        .hooks
        .add(
            BEFORE_TOKEN_SIGNING,
            hook_fn(|draft, request| {
                if let Some(id) = request
                    .scope()
                    .unwrap_or_default()
                    .split_whitespace()
                    .find_map(|part| part.strip_prefix("fancy:"))
                {
                    draft.set_claim("fancyId", id);
                }
                Ok(())
            }),
        )
        .unwrap();

    let clients = server.build_clients().unwrap();
    let response = clients
        .client_credentials
        .get_token("email fancy:123")
        .await
        .unwrap();

    let claims = decode_verified(&info, &response.access_token).await;
    assert_eq!(claims["foo"], "bar");
    assert_eq!(claims["fancyId"], "123");
    assert_eq!(claims["aud"], json!([AUDIENCE]));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn removed_hook_stops_affecting_new_tokens() {
    let (mut server, info) = started_server(AUDIENCE).await;
    let id = server
        .hooks
        .add(
            BEFORE_TOKEN_SIGNING,
            hook_fn(|draft, _| {
                draft.set_claim("transient", true);
                Ok(())
            }),
        )
        .unwrap();
    let clients = server.build_clients().unwrap();

    let first = clients.client_credentials.get_token("email").await.unwrap();
    let claims = decode_verified(&info, &first.access_token).await;
    assert_eq!(claims["transient"], true);

    server.hooks.remove(BEFORE_TOKEN_SIGNING, id).unwrap();

    let second = clients.client_credentials.get_token("email").await.unwrap();
    let claims = decode_verified(&info, &second.access_token).await;
    assert!(claims.get("transient").is_none());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn custom_claims_hook_applies_every_claim() {
    let (mut server, info) = started_server(AUDIENCE).await;
    server
        .hooks
        .add(
            BEFORE_TOKEN_SIGNING,
            CustomClaims::new(vec![
                CustomClaim::new("tenant", "acme"),
                CustomClaim::new("roles", json!(["admin", "auditor"])),
            ]),
        )
        .unwrap();
    let clients = server.build_clients().unwrap();

    let response = clients.client_credentials.get_token("email").await.unwrap();
    let claims = decode_verified(&info, &response.access_token).await;
    assert_eq!(claims["tenant"], "acme");
    assert_eq!(claims["roles"], json!(["admin", "auditor"]));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn expire_tokens_hook_backdates_the_expiry() {
    let (mut server, info) = started_server(AUDIENCE).await;
    server
        .hooks
        .add(BEFORE_TOKEN_SIGNING, ExpireTokens::default())
        .unwrap();
    let clients = server.build_clients().unwrap();

    let response = clients.client_credentials.get_token("email").await.unwrap();
    let claims = decode_signature_only(&info, &response.access_token).await;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    let exp: i64 = claims["exp"].as_str().unwrap().parse().unwrap();
    let backdated = now - exp;
    assert!(
        (398..=402).contains(&backdated),
        "exp should be about 400s in the past, was {backdated}s"
    );

    server.stop().await.unwrap();
}

#[tokio::test]
async fn invalidate_signature_hook_breaks_issuer_validation() {
    let (mut server, info) = started_server(AUDIENCE).await;
    server
        .hooks
        .add(BEFORE_TOKEN_SIGNING, InvalidateSignature)
        .unwrap();
    let clients = server.build_clients().unwrap();

    let response = clients.client_credentials.get_token("email").await.unwrap();
    let claims = decode_signature_only(&info, &response.access_token).await;
    assert_ne!(claims["iss"], info.issuer_uri.as_str().trim_end_matches('/'));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn failing_hook_aborts_issuance_but_not_its_siblings() {
    let (mut server, _info) = started_server(AUDIENCE).await;
    server
        .hooks
        .add(
            BEFORE_TOKEN_SIGNING,
            hook_fn(|_, _| Err(HookError::Execution("database unavailable".to_string()))),
        )
        .unwrap();
    let sibling_runs = Arc::new(AtomicUsize::new(0));
    let counter = sibling_runs.clone();
    server
        .hooks
        .add(
            BEFORE_TOKEN_SIGNING,
            hook_fn(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )
        .unwrap();
    let clients = server.build_clients().unwrap();

    let err = clients
        .client_credentials
        .get_token("email")
        .await
        .unwrap_err();
    match err {
        ClientError::TokenEndpoint { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("server_error"), "unexpected body: {body}");
        }
        other => panic!("expected a token endpoint error, got {other}"),
    }
    assert_eq!(sibling_runs.load(Ordering::SeqCst), 1);

    server.stop().await.unwrap();
}
