use crate::errors::HookError;
use crate::hooks::TokenHook;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use token_issuer::{IssueRequest, TokenDraft};

/// One claim to inject into the token payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomClaim {
    pub name: String,
    pub value: Value,
}

impl CustomClaim {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Injects each claim with a non-empty name; an empty list is a no-op.
#[derive(Debug, Clone, Default)]
pub struct CustomClaims {
    claims: Vec<CustomClaim>,
}

impl CustomClaims {
    pub fn new(claims: Vec<CustomClaim>) -> Self {
        Self { claims }
    }
}

#[async_trait]
impl TokenHook for CustomClaims {
    async fn run(&self, draft: &mut TokenDraft, _request: &IssueRequest) -> Result<(), HookError> {
        for claim in &self.claims {
            if claim.name.is_empty() {
                continue;
            }
            draft.set_claim(claim.name.as_str(), claim.value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn injects_every_named_claim() {
        let hook = CustomClaims::new(vec![
            CustomClaim::new("role", "admin"),
            CustomClaim::new("flags", json!(["a", "b"])),
        ]);
        let mut draft = TokenDraft::new();
        hook.run(&mut draft, &IssueRequest::default()).await.unwrap();
        assert_eq!(draft.claim("role"), Some(&json!("admin")));
        assert_eq!(draft.claim("flags"), Some(&json!(["a", "b"])));
    }

    #[tokio::test]
    async fn skips_claims_with_empty_names() {
        let hook = CustomClaims::new(vec![CustomClaim::new("", "ignored")]);
        let mut draft = TokenDraft::new();
        hook.run(&mut draft, &IssueRequest::default()).await.unwrap();
        assert!(draft.payload.is_empty());
    }

    #[tokio::test]
    async fn empty_list_is_a_no_op() {
        let hook = CustomClaims::default();
        let mut draft = TokenDraft::new();
        hook.run(&mut draft, &IssueRequest::default()).await.unwrap();
        assert!(draft.payload.is_empty());
    }
}
