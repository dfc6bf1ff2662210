use thiserror::Error;

#[derive(Error, Debug)]
pub enum IssuerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Issuer already running on {0}")]
    AlreadyRunning(url::Url),

    #[error("Issuer not running")]
    NotRunning,

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("No signing key in keystore")]
    NoSigningKey,

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Issuer shutdown failed: {0}")]
    Shutdown(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Signing interceptor failed: {0}")]
    Interceptor(#[from] InterceptError),
}

/// Failure reported by a [`SigningInterceptor`](crate::service::SigningInterceptor).
///
/// The issuer treats this as a signal to abort the issuance in progress.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct InterceptError(String);

impl InterceptError {
    pub fn new(message: impl ToString) -> Self {
        Self(message.to_string())
    }
}
