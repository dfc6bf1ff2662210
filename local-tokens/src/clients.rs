//! Pre-built token clients pointed at a running server.
//!
//! Thin wrappers over `reqwest` for the two grants the issuer supports.
//! Pure composition: requesting a token through these clients goes through
//! the same HTTP surface any external client would use.

use crate::errors::ClientError;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// Shared configuration for the pre-built grant clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: Url,
}

/// Successful token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Client credentials grant client (RFC 6749 Section 4.4).
#[derive(Debug, Clone)]
pub struct ClientCredentialsClient {
    http: Client,
    config: ClientConfig,
}

impl ClientCredentialsClient {
    fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub async fn get_token(&self, scope: &str) -> Result<TokenResponse, ClientError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", scope),
        ];
        send_token_request(&self.http, &self.config.token_url, &form).await
    }
}

/// Resource owner password grant client (RFC 6749 Section 4.3).
#[derive(Debug, Clone)]
pub struct ResourceOwnerPasswordClient {
    http: Client,
    config: ClientConfig,
}

impl ResourceOwnerPasswordClient {
    fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub async fn get_token(
        &self,
        username: &str,
        password: &str,
        scope: &str,
    ) -> Result<TokenResponse, ClientError> {
        let form = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", scope),
        ];
        send_token_request(&self.http, &self.config.token_url, &form).await
    }
}

/// Both grant clients plus the configuration they share.
#[derive(Debug, Clone)]
pub struct TokenClients {
    pub client_credentials: ClientCredentialsClient,
    pub resource_owner_password: ResourceOwnerPasswordClient,
    pub config: ClientConfig,
}

impl TokenClients {
    pub(crate) fn new(config: ClientConfig) -> Self {
        Self {
            client_credentials: ClientCredentialsClient::new(config.clone()),
            resource_owner_password: ResourceOwnerPasswordClient::new(config.clone()),
            config,
        }
    }
}

async fn send_token_request(
    http: &Client,
    token_url: &Url,
    form: &[(&str, &str)],
) -> Result<TokenResponse, ClientError> {
    debug!("Requesting token from {}", token_url);
    let response = http.post(token_url.clone()).form(form).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::TokenEndpoint {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}
