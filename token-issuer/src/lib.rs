//! # token-issuer
//!
//! An in-memory OAuth2/OIDC issuing engine for local testing.
//!
//! ## Components
//!
//! - **Keystore:** RS256 key generation, JWT signing, and JWKS publication.
//! - **Service:** a pre-signing interceptor seam that lets callers mutate
//!   the token payload before it is signed.
//! - **HTTP:** axum endpoints for OpenID discovery, JWKS, and the
//!   client_credentials and password token grants.
//!
//! [`OAuth2Issuer`] composes the three and owns the listener lifecycle.

pub mod error;
pub mod events;
pub mod http;
pub mod keys;
pub mod service;
pub mod token;

pub use error::{InterceptError, IssuerError};
pub use events::IssuerEvent;
pub use keys::{Jwk, Jwks, Keystore};
pub use service::{IssuerService, SigningInterceptor};
pub use token::{IssueRequest, TokenDraft};

use log::{debug, error, info};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

/// An in-memory OAuth2 issuer with a start/stop HTTP lifecycle.
///
/// Keys are not generated automatically; callers decide when to populate
/// the [`Keystore`] (typically once, before the first `start`).
pub struct OAuth2Issuer {
    keystore: Arc<Keystore>,
    service: Arc<IssuerService>,
    running: Option<RunningIssuer>,
}

struct RunningIssuer {
    url: Url,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl OAuth2Issuer {
    pub fn new() -> Self {
        Self {
            keystore: Arc::new(Keystore::new()),
            service: Arc::new(IssuerService::new()),
            running: None,
        }
    }

    /// Keystore backing this issuer.
    pub fn keystore(&self) -> &Arc<Keystore> {
        &self.keystore
    }

    /// Subscribe an interceptor to one of the issuance events.
    pub fn subscribe(&self, event: IssuerEvent, interceptor: Arc<dyn SigningInterceptor>) {
        self.service.subscribe(event, interceptor);
    }

    /// Issuer URL while running, `None` otherwise.
    pub fn url(&self) -> Option<&Url> {
        self.running.as_ref().map(|running| &running.url)
    }

    /// Bind `hostname:port` and serve until [`stop`](Self::stop).
    ///
    /// Port 0 asks the kernel for a free port; the returned URL carries the
    /// port that was actually bound. Fails with
    /// [`IssuerError::AlreadyRunning`] on a second start and surfaces bind
    /// failures as [`IssuerError::Io`].
    pub async fn start(&mut self, port: u16, hostname: &str) -> Result<Url, IssuerError> {
        if let Some(running) = &self.running {
            return Err(IssuerError::AlreadyRunning(running.url.clone()));
        }

        let listener = TcpListener::bind((hostname, port)).await?;
        let bound_port = listener.local_addr()?.port();
        let url = Url::parse(&format!("http://{}:{}/", hostname, bound_port))?;

        let state = http::IssuerState {
            keystore: self.keystore.clone(),
            service: self.service.clone(),
            issuer: url.as_str().trim_end_matches('/').to_string(),
        };
        let app = http::router(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(err) = serve.await {
                error!("Issuer server error: {}", err);
            }
        });

        info!("Issuer listening on {}", url);
        self.running = Some(RunningIssuer {
            url: url.clone(),
            shutdown: shutdown_tx,
            handle,
        });
        Ok(url)
    }

    /// Shut the listener down and wait for in-flight requests to drain.
    ///
    /// Fails with [`IssuerError::NotRunning`] when the issuer was never
    /// started or has already been stopped.
    pub async fn stop(&mut self) -> Result<(), IssuerError> {
        let running = self.running.take().ok_or(IssuerError::NotRunning)?;
        let _ = running.shutdown.send(());
        running
            .handle
            .await
            .map_err(|e| IssuerError::Shutdown(e.to_string()))?;
        debug!("Issuer stopped");
        Ok(())
    }
}

impl Default for OAuth2Issuer {
    fn default() -> Self {
        Self::new()
    }
}
