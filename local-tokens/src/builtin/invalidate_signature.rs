use crate::errors::HookError;
use crate::hooks::TokenHook;
use async_trait::async_trait;
use token_issuer::{IssueRequest, TokenDraft};

/// Issuer value guaranteed not to match any running server.
const BOGUS_ISSUER: &str = "http://invalid-issuer.local";

/// Guarantees that verification of the issued token fails.
///
/// A pre-signing hook cannot reach the signature bytes, so this corrupts
/// the `iss` claim instead: any verifier checking the token against the
/// real issuer rejects it deterministically.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidateSignature;

impl InvalidateSignature {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TokenHook for InvalidateSignature {
    async fn run(&self, draft: &mut TokenDraft, _request: &IssueRequest) -> Result<(), HookError> {
        draft.set_claim("iss", BOGUS_ISSUER);
        Ok(())
    }
}
