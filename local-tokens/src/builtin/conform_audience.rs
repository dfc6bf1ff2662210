use crate::errors::HookError;
use crate::hooks::TokenHook;
use async_trait::async_trait;
use serde_json::json;
use token_issuer::{IssueRequest, TokenDraft};

/// Sets `aud` to a single-element array holding the configured audience.
///
/// Auth0-style verifiers expect the audience claim as an array, so
/// [`LocalTokenServer`](crate::server::LocalTokenServer) registers this
/// hook first and unconditionally; downstream verification depends on it.
#[derive(Debug, Clone)]
pub struct ConformAudience {
    audience: String,
}

impl ConformAudience {
    pub fn new(audience: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
        }
    }
}

#[async_trait]
impl TokenHook for ConformAudience {
    async fn run(&self, draft: &mut TokenDraft, _request: &IssueRequest) -> Result<(), HookError> {
        draft.set_claim("aud", json!([self.audience]));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sets_the_audience_as_an_array() {
        let hook = ConformAudience::new("apiAudience");
        let mut draft = TokenDraft::new();
        hook.run(&mut draft, &IssueRequest::default()).await.unwrap();
        assert_eq!(draft.claim("aud"), Some(&json!(["apiAudience"])));
    }

    #[tokio::test]
    async fn overrides_a_preexisting_audience() {
        let hook = ConformAudience::new("apiAudience");
        let mut draft = TokenDraft::new();
        draft.set_claim("aud", "someone-else");
        hook.run(&mut draft, &IssueRequest::default()).await.unwrap();
        assert_eq!(draft.claim("aud"), Some(&json!(["apiAudience"])));
    }
}
