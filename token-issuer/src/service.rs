//! Pre-signing extensibility seam.
//!
//! Callers subscribe interceptors per [`IssuerEvent`]; the issuer dispatches
//! them with the mutable token draft and the originating request right
//! before signing.

use crate::error::InterceptError;
use crate::events::IssuerEvent;
use crate::token::{IssueRequest, TokenDraft};
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Hook seam invoked by the issuer during issuance.
///
/// Subscribers receive the mutable token draft and the originating request
/// and may mutate the draft's payload. Returning an error aborts the
/// issuance; how errors from multiple underlying handlers are combined is
/// the subscriber's concern.
#[async_trait]
pub trait SigningInterceptor: Send + Sync {
    async fn intercept(
        &self,
        draft: &mut TokenDraft,
        request: &IssueRequest,
    ) -> Result<(), InterceptError>;
}

/// Per-event interceptor subscriptions.
#[derive(Default)]
pub struct IssuerService {
    listeners: RwLock<HashMap<IssuerEvent, Vec<Arc<dyn SigningInterceptor>>>>,
}

impl IssuerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor for `event`. Subscription order is dispatch order.
    pub fn subscribe(&self, event: IssuerEvent, interceptor: Arc<dyn SigningInterceptor>) {
        debug!("Subscribing interceptor for {}", event);
        self.listeners
            .write()
            .expect("listener table lock poisoned")
            .entry(event)
            .or_default()
            .push(interceptor);
    }

    /// Invoke every interceptor subscribed to `event`, in subscription order.
    /// The first failure aborts the dispatch and is returned.
    pub async fn dispatch(
        &self,
        event: IssuerEvent,
        draft: &mut TokenDraft,
        request: &IssueRequest,
    ) -> Result<(), InterceptError> {
        let listeners: Vec<Arc<dyn SigningInterceptor>> = self
            .listeners
            .read()
            .expect("listener table lock poisoned")
            .get(&event)
            .cloned()
            .unwrap_or_default();

        for listener in listeners {
            listener.intercept(draft, request).await?;
        }
        Ok(())
    }
}
