//! OAuth 2.0 / OIDC HTTP surface.
//!
//! Endpoints: OpenID discovery, JWKS, and `/token` for the
//! client_credentials and password grants. Client credentials are not
//! validated; this issuer exists to mint tokens for local tests, so any
//! client is accepted.

use crate::events::IssuerEvent;
use crate::keys::{Jwks, Keystore};
use crate::service::IssuerService;
use crate::token::{IssueRequest, TokenDraft};
use axum::extract::{Form, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Lifetime of issued access tokens, in seconds.
pub const TOKEN_TTL_SECS: u64 = 3600;

#[derive(Clone)]
pub(crate) struct IssuerState {
    pub keystore: Arc<Keystore>,
    pub service: Arc<IssuerService>,
    /// Issuer identifier, without a trailing slash.
    pub issuer: String,
}

pub(crate) fn router(state: IssuerState) -> Router {
    Router::new()
        .route(
            "/.well-known/openid-configuration",
            get(openid_configuration),
        )
        .route("/jwks", get(jwks))
        .route("/token", post(token))
        .with_state(state)
}

/// Subset of the OpenID Provider Metadata (OpenID Connect Discovery 1.0).
#[derive(Debug, Serialize)]
struct OpenIdConfiguration {
    issuer: String,
    token_endpoint: String,
    jwks_uri: String,
    grant_types_supported: Vec<String>,
    response_types_supported: Vec<String>,
    subject_types_supported: Vec<String>,
    id_token_signing_alg_values_supported: Vec<String>,
}

async fn openid_configuration(State(state): State<IssuerState>) -> Json<OpenIdConfiguration> {
    Json(OpenIdConfiguration {
        issuer: state.issuer.clone(),
        token_endpoint: format!("{}/token", state.issuer),
        jwks_uri: format!("{}/jwks", state.issuer),
        grant_types_supported: vec!["client_credentials".to_string(), "password".to_string()],
        response_types_supported: vec!["token".to_string()],
        subject_types_supported: vec!["public".to_string()],
        id_token_signing_alg_values_supported: vec!["RS256".to_string()],
    })
}

async fn jwks(State(state): State<IssuerState>) -> Json<Jwks> {
    Json(state.keystore.jwks())
}

/// OAuth 2.0 token request form (RFC 6749 Sections 4.3 and 4.4).
#[derive(Debug, Deserialize)]
struct TokenRequestForm {
    grant_type: String,
    client_id: Option<String>,
    #[allow(dead_code)]
    client_secret: Option<String>,
    username: Option<String>,
    #[allow(dead_code)]
    password: Option<String>,
    scope: Option<String>,
}

/// OAuth 2.0 Token Response
#[derive(Debug, Serialize)]
struct TokenResponse {
    /// The access token string
    access_token: String,
    /// Token type - always "Bearer"
    token_type: String,
    /// Token expiration in seconds
    expires_in: u64,
    /// Granted scopes (space-separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

/// OAuth 2.0 error body (RFC 6749 Section 5.2).
#[derive(Debug, Serialize)]
struct OAuthError {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_description: Option<String>,
}

impl OAuthError {
    fn response(status: StatusCode, error: &str, description: impl ToString) -> Response {
        (
            status,
            Json(OAuthError {
                error: error.to_string(),
                error_description: Some(description.to_string()),
            }),
        )
            .into_response()
    }
}

async fn token(State(state): State<IssuerState>, Form(form): Form<TokenRequestForm>) -> Response {
    if form.grant_type != "client_credentials" && form.grant_type != "password" {
        return OAuthError::response(
            StatusCode::BAD_REQUEST,
            "unsupported_grant_type",
            format!("unsupported grant_type: {}", form.grant_type),
        );
    }

    let request = IssueRequest {
        grant_type: form.grant_type.clone(),
        client_id: form.client_id.clone(),
        username: form.username.clone(),
        scope: form.scope.clone(),
    };

    let mut draft = default_draft(&state.issuer, &request);

    if let Err(err) = state
        .service
        .dispatch(IssuerEvent::BeforeTokenSigning, &mut draft, &request)
        .await
    {
        warn!(
            "Aborting issuance, {} interceptor failed: {}",
            IssuerEvent::BeforeTokenSigning,
            err
        );
        return OAuthError::response(StatusCode::INTERNAL_SERVER_ERROR, "server_error", err);
    }

    match state.keystore.sign(&draft) {
        Ok(access_token) => {
            debug!("Issued token for sub={:?}", draft.claim("sub"));
            Json(TokenResponse {
                access_token,
                token_type: "Bearer".to_string(),
                expires_in: TOKEN_TTL_SECS,
                scope: form.scope,
            })
            .into_response()
        }
        Err(err) => OAuthError::response(StatusCode::INTERNAL_SERVER_ERROR, "server_error", err),
    }
}

/// Default claims for a fresh draft. Interceptors may overwrite any of them.
fn default_draft(issuer: &str, request: &IssueRequest) -> TokenDraft {
    let now = unix_now();
    let mut draft = TokenDraft::new();
    draft.set_claim("iss", issuer);
    let sub = request
        .username
        .clone()
        .or_else(|| request.client_id.clone())
        .unwrap_or_else(|| "user".to_string());
    draft.set_claim("sub", sub);
    draft.set_claim("iat", now);
    draft.set_claim("exp", now + TOKEN_TTL_SECS);
    draft.set_claim("jti", Uuid::new_v4().to_string());
    if let Some(scope) = request.scope() {
        draft.set_claim("scope", scope);
    }
    draft
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_draft_prefers_username_over_client_id() {
        let request = IssueRequest {
            grant_type: "password".to_string(),
            client_id: Some("client".to_string()),
            username: Some("alice".to_string()),
            scope: Some("email".to_string()),
        };
        let draft = default_draft("http://issuer.test", &request);
        assert_eq!(draft.claim("sub"), Some(&"alice".into()));
        assert_eq!(draft.claim("iss"), Some(&"http://issuer.test".into()));
        assert_eq!(draft.claim("scope"), Some(&"email".into()));
        assert!(draft.claim("iat").is_some());
        assert!(draft.claim("exp").is_some());
        assert!(draft.claim("jti").is_some());
    }

    #[test]
    fn default_draft_falls_back_to_client_id_then_user() {
        let request = IssueRequest {
            grant_type: "client_credentials".to_string(),
            client_id: Some("client".to_string()),
            ..Default::default()
        };
        let draft = default_draft("http://issuer.test", &request);
        assert_eq!(draft.claim("sub"), Some(&"client".into()));

        let draft = default_draft("http://issuer.test", &IssueRequest::default());
        assert_eq!(draft.claim("sub"), Some(&"user".into()));
        assert!(draft.claim("scope").is_none());
    }
}
