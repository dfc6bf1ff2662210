//! # local-tokens
//!
//! An in-memory OAuth2/OIDC mock server for testing token-consuming
//! clients without a real authorization server, with JWKS support and a
//! hook pipeline for shaping token payloads before they are signed.
//!
//! ## Modules
//!
//! - [`hooks`] — event-scoped hook registry with stable removal handles
//! - [`builtin`] — predefined hooks (audience conformance, custom claims,
//!   forced expiry, verification invalidation)
//! - [`server`] — the [`LocalTokenServer`] facade over the issuing engine
//! - [`clients`] — pre-built client_credentials / password grant clients
//! - [`config`] — facade and binary configuration
//!
//! ## Quick start
//!
//! ```no_run
//! use local_tokens::{hook_fn, LocalTokenServer, BEFORE_TOKEN_SIGNING};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = LocalTokenServer::new("apiAudience");
//! server.hooks.add(
//!     BEFORE_TOKEN_SIGNING,
//!     hook_fn(|draft, _request| {
//!         draft.set_claim("foo", "bar");
//!         Ok(())
//!     }),
//! )?;
//!
//! let live = server.start(0, "127.0.0.1").await?;
//! let clients = server.build_clients()?;
//! let token = clients.client_credentials.get_token("email").await?;
//! println!("jwks: {}, token: {}", live.jwks_uri, token.access_token);
//! server.stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod builtin;
pub mod clients;
pub mod config;
pub mod errors;
pub mod hooks;
pub mod server;

pub use config::LocalTokenConfig;
pub use errors::{AggregateHookError, ClientError, HookError, HookFailure, LocalTokensError};
pub use hooks::{hook_fn, HookId, HookRegistry, TokenHook};
pub use server::{LocalTokenServer, ServerInfo};

// Collaborator types that appear in the hook signature.
pub use token_issuer::{IssueRequest, IssuerEvent, TokenDraft};

/// Wire name of the pre-signing interception point.
pub const BEFORE_TOKEN_SIGNING: &str = IssuerEvent::BeforeTokenSigning.as_str();
