//! The in-progress token and the request that triggered its issuance.

use serde_json::{Map, Value};

/// An in-progress, not-yet-signed token.
///
/// The issuer owns the draft for the duration of one issuance; interceptors
/// borrow it mutably while they run and must not retain any part of it
/// afterwards. `payload` maps claim names to claim values and becomes the
/// JWT payload verbatim once signed.
#[derive(Debug, Clone, Default)]
pub struct TokenDraft {
    pub payload: Map<String, Value>,
}

impl TokenDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a claim, replacing any existing value under the same name.
    pub fn set_claim(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.payload.insert(name.into(), value.into());
    }

    /// Current value of a claim, if present.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }
}

/// The token request that originated an issuance, as seen by interceptors.
#[derive(Debug, Clone, Default)]
pub struct IssueRequest {
    /// OAuth 2.0 grant type ("client_credentials" or "password").
    pub grant_type: String,
    /// Client identifier, when the request carried one.
    pub client_id: Option<String>,
    /// Resource owner username (password grant).
    pub username: Option<String>,
    /// Requested scopes, space-separated.
    pub scope: Option<String>,
}

impl IssueRequest {
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }
}
