//! The `LocalTokenServer` facade.
//!
//! Composes the hook registry with the issuing engine: construction wires
//! the mandatory audience conformance hook and one registry adapter per
//! issuance event, then lifecycle and client-building delegate to the
//! issuer.

use crate::builtin::ConformAudience;
use crate::clients::{ClientConfig, TokenClients};
use crate::config::LocalTokenConfig;
use crate::errors::LocalTokensError;
use crate::hooks::HookRegistry;
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use token_issuer::{
    InterceptError, IssueRequest, IssuerEvent, OAuth2Issuer, SigningInterceptor, TokenDraft,
};
use url::Url;

/// Live server addresses returned by [`LocalTokenServer::start`].
#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// JSON Web Key Store URL
    pub jwks_uri: Url,
    /// Well-known OpenID Configuration URL
    pub openid_uri: Url,
    /// Issuer URL, aka server URL
    pub issuer_uri: Url,
    /// Audience, aka the client id
    pub audience: String,
}

/// Adapter that runs the hook registry when the issuer fires an event.
///
/// An aggregate hook failure becomes an [`InterceptError`], which the
/// issuer treats as a signal to abort the issuance.
struct RegistryInterceptor {
    event: IssuerEvent,
    hooks: Arc<HookRegistry>,
}

#[async_trait]
impl SigningInterceptor for RegistryInterceptor {
    async fn intercept(
        &self,
        draft: &mut TokenDraft,
        request: &IssueRequest,
    ) -> Result<(), InterceptError> {
        self.hooks
            .execute(self.event.as_str(), draft, request)
            .await
            .map_err(InterceptError::new)
    }
}

/// An in-memory OAuth2 mock server for generating and validating tokens,
/// with JWKS support and a hook pipeline for mutating payloads before they
/// are signed.
pub struct LocalTokenServer {
    /// Hook registry; add and remove hooks here at any time.
    pub hooks: Arc<HookRegistry>,
    config: LocalTokenConfig,
    issuer: OAuth2Issuer,
}

impl LocalTokenServer {
    /// Create a server from a full config or a bare audience string.
    ///
    /// Registers the audience conformance hook first, so later hooks can
    /// see or override the `aud` claim it sets, then subscribes a registry
    /// adapter for every supported event.
    pub fn new(config: impl Into<LocalTokenConfig>) -> Self {
        let config = config.into();
        let issuer = OAuth2Issuer::new();
        let hooks = Arc::new(HookRegistry::new());

        hooks
            .add(
                IssuerEvent::BeforeTokenSigning.as_str(),
                ConformAudience::new(config.audience.as_str()),
            )
            .expect("before-token-signing is always supported");

        for event in IssuerEvent::ALL {
            debug!("Registering {} adapter with the issuer", event);
            issuer.subscribe(
                event,
                Arc::new(RegistryInterceptor {
                    event,
                    hooks: hooks.clone(),
                }),
            );
        }

        Self {
            hooks,
            config,
            issuer,
        }
    }

    /// Issuer URL. Fails until the server has been started.
    pub fn issuer_url(&self) -> Result<Url, LocalTokensError> {
        self.issuer
            .url()
            .cloned()
            .ok_or(LocalTokensError::IssuerNotAvailable)
    }

    /// Generate a signing key if the keystore is empty, then bind and serve.
    ///
    /// Port 0 picks a free port; the returned [`ServerInfo`] carries the
    /// URLs that were actually bound.
    pub async fn start(
        &mut self,
        port: u16,
        hostname: &str,
    ) -> Result<ServerInfo, LocalTokensError> {
        self.issuer.keystore().ensure_rs256()?;
        let issuer_uri = self.issuer.start(port, hostname).await?;
        let info = ServerInfo {
            jwks_uri: issuer_uri.join("jwks")?,
            openid_uri: issuer_uri.join(".well-known/openid-configuration")?,
            issuer_uri,
            audience: self.config.audience.clone(),
        };
        info!("Local token server ready, issuer {}", info.issuer_uri);
        Ok(info)
    }

    /// Stop the server. A second stop fails cleanly with the issuer's
    /// `NotRunning` error rather than hanging.
    pub async fn stop(&mut self) -> Result<(), LocalTokensError> {
        self.issuer.stop().await?;
        Ok(())
    }

    /// Pre-built token clients configured for this server.
    ///
    /// Pure composition, no hook interaction. Requires a started server.
    pub fn build_clients(&self) -> Result<TokenClients, LocalTokensError> {
        let issuer_uri = self.issuer_url()?;
        let config = ClientConfig {
            client_id: self.config.audience.clone(),
            client_secret: self.config.secret.clone(),
            token_url: issuer_uri.join("token")?,
        };
        debug!("Client configuration: {:?}", config);
        Ok(TokenClients::new(config))
    }
}
