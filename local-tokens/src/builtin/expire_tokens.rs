use crate::errors::HookError;
use crate::hooks::TokenHook;
use async_trait::async_trait;
use std::time::{SystemTime, UNIX_EPOCH};
use token_issuer::{IssueRequest, TokenDraft};

/// Default number of seconds to push `exp` into the past.
pub const DEFAULT_MINUS_SECONDS: i64 = 400;

/// Forces an already-expired token: `exp` becomes the string form of
/// `now - minus_seconds`.
///
/// Useful for exercising a client's expiry handling without waiting for a
/// real token to age out.
#[derive(Debug, Clone)]
pub struct ExpireTokens {
    minus_seconds: i64,
}

impl ExpireTokens {
    /// Fails with [`HookError::InvalidArgument`] unless `minus_seconds` is
    /// positive. Validated here, not at execution time.
    pub fn new(minus_seconds: i64) -> Result<Self, HookError> {
        if minus_seconds <= 0 {
            return Err(HookError::InvalidArgument(
                "minus_seconds must be a positive number".to_string(),
            ));
        }
        Ok(Self { minus_seconds })
    }
}

impl Default for ExpireTokens {
    fn default() -> Self {
        Self {
            minus_seconds: DEFAULT_MINUS_SECONDS,
        }
    }
}

#[async_trait]
impl TokenHook for ExpireTokens {
    async fn run(&self, draft: &mut TokenDraft, _request: &IssueRequest) -> Result<(), HookError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| HookError::Execution(format!("system time error: {e}")))?
            .as_secs() as i64;
        draft.set_claim("exp", (timestamp - self.minus_seconds).to_string());
        Ok(())
    }
}
