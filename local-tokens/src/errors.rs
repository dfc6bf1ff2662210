use crate::hooks::HookId;
use thiserror::Error;
use token_issuer::IssuerError;

/// Errors raised by the hook registry and the built-in hook factories.
#[derive(Error, Debug)]
pub enum HookError {
    /// Event name outside the supported set (add/remove/execute).
    #[error("{0} Hook not supported")]
    UnsupportedEvent(String),

    /// `remove` with an identifier that is not registered for the event.
    #[error("Hook not found: {event} id:{id}")]
    HandlerNotFound { event: String, id: HookId },

    /// Rejected hook factory argument, raised at construction time.
    #[error("Invalid hook argument: {0}")]
    InvalidArgument(String),

    /// Failure reported by a hook while it ran.
    #[error("Hook execution failed: {0}")]
    Execution(String),

    /// One or more hooks failed during a fan-out.
    #[error(transparent)]
    Aggregate(#[from] AggregateHookError),
}

/// Collected failures from one `execute` fan-out.
///
/// Every registered hook was attempted before this was returned; a failing
/// hook never blocks its siblings.
#[derive(Error, Debug)]
#[error("{} of {} {} hook(s) failed", .failures.len(), .attempted, .event)]
pub struct AggregateHookError {
    pub event: String,
    pub attempted: usize,
    pub failures: Vec<HookFailure>,
}

/// A single hook failure inside an [`AggregateHookError`].
#[derive(Error, Debug)]
#[error("hook {id}: {source}")]
pub struct HookFailure {
    pub id: HookId,
    #[source]
    pub source: HookError,
}

/// Errors raised by the [`LocalTokenServer`](crate::server::LocalTokenServer) facade.
#[derive(Error, Debug)]
pub enum LocalTokensError {
    /// The issuer URL was requested before the server was started.
    #[error("Issuer URL is not available, did you start the server?")]
    IssuerNotAvailable,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error(transparent)]
    Issuer(#[from] IssuerError),

    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Errors raised by the pre-built token clients.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Token request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Token endpoint returned {status}: {body}")]
    TokenEndpoint { status: u16, body: String },
}
