//! Event-scoped hook registry for the token-mutation pipeline.
//!
//! Hooks are keyed by issuance event and run in insertion order, which is
//! what makes the pipeline deterministic: the audience conformance hook is
//! registered first by the server, so later hooks can read or override the
//! claims it set. Removal uses the [`HookId`] returned at registration.

use crate::errors::{AggregateHookError, HookError, HookFailure};
use async_trait::async_trait;
use log::debug;
use std::fmt;
use std::sync::{Arc, RwLock};
use token_issuer::{IssueRequest, IssuerEvent, TokenDraft};
use uuid::Uuid;

/// Unique handle for a registered hook; the only way to remove it later.
///
/// Identifiers are random v4 UUIDs and are never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(Uuid);

impl HookId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A hook that mutates a token draft before it is signed.
///
/// Synchronous and asynchronous hooks share this contract uniformly; the
/// registry awaits every hook the same way. See [`hook_fn`] for wrapping a
/// plain closure.
#[async_trait]
pub trait TokenHook: Send + Sync {
    async fn run(&self, draft: &mut TokenDraft, request: &IssueRequest) -> Result<(), HookError>;
}

/// Wrap a synchronous closure as a [`TokenHook`].
pub fn hook_fn<F>(f: F) -> FnHook<F>
where
    F: Fn(&mut TokenDraft, &IssueRequest) -> Result<(), HookError> + Send + Sync,
{
    FnHook(f)
}

/// Closure adapter returned by [`hook_fn`].
pub struct FnHook<F>(F);

#[async_trait]
impl<F> TokenHook for FnHook<F>
where
    F: Fn(&mut TokenDraft, &IssueRequest) -> Result<(), HookError> + Send + Sync,
{
    async fn run(&self, draft: &mut TokenDraft, request: &IssueRequest) -> Result<(), HookError> {
        (self.0)(draft, request)
    }
}

type HookEntry = (HookId, Arc<dyn TokenHook>);

/// Registry of hooks keyed by issuance event.
///
/// The event set is closed ([`IssuerEvent`]); event names arriving as
/// strings are parsed once at the boundary, so an unsupported name can
/// never hold registrations. The table is lock-guarded because hooks may
/// be added or removed from any task while the server is issuing tokens.
pub struct HookRegistry {
    /// One ordered slot per event in [`IssuerEvent::ALL`].
    entries: Vec<RwLock<Vec<HookEntry>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            entries: IssuerEvent::ALL
                .iter()
                .map(|_| RwLock::new(Vec::new()))
                .collect(),
        }
    }

    /// Events accepting registrations. Fixed at construction.
    pub fn supported_events(&self) -> &'static [IssuerEvent] {
        &IssuerEvent::ALL
    }

    /// Wire names of every supported event.
    pub fn registered(&self) -> Vec<&'static str> {
        IssuerEvent::ALL.iter().map(|event| event.as_str()).collect()
    }

    /// Identifiers currently registered for `event`, in insertion order.
    pub fn hook_ids(&self, event: &str) -> Result<Vec<HookId>, HookError> {
        let parsed = Self::parse(event)?;
        Ok(self
            .slot(parsed)
            .read()
            .expect("hook table lock poisoned")
            .iter()
            .map(|(id, _)| *id)
            .collect())
    }

    /// Register `hook` at the end of `event`'s pipeline.
    ///
    /// Returns the fresh [`HookId`] to use for removal. Fails with
    /// [`HookError::UnsupportedEvent`] for an unknown event name.
    pub fn add(&self, event: &str, hook: impl TokenHook + 'static) -> Result<HookId, HookError> {
        let parsed = Self::parse(event)?;
        let id = HookId::new();
        self.slot(parsed)
            .write()
            .expect("hook table lock poisoned")
            .push((id, Arc::new(hook)));
        debug!("Added hook {} {}", event, id);
        Ok(id)
    }

    /// Remove the hook registered under `id` for `event`.
    ///
    /// Fails with [`HookError::UnsupportedEvent`] for an unknown event name
    /// and [`HookError::HandlerNotFound`] when `id` is not currently
    /// registered there. Success returns `true`; the remaining hooks keep
    /// their relative order.
    pub fn remove(&self, event: &str, id: HookId) -> Result<bool, HookError> {
        let parsed = Self::parse(event)?;
        let mut entries = self.slot(parsed).write().expect("hook table lock poisoned");
        let position = entries
            .iter()
            .position(|(entry_id, _)| *entry_id == id)
            .ok_or_else(|| HookError::HandlerNotFound {
                event: event.to_string(),
                id,
            })?;
        entries.remove(position);
        debug!("Removed hook {} {}", event, id);
        Ok(true)
    }

    /// Run every hook registered for `event`, in insertion order.
    ///
    /// A failing hook does not stop the fan-out: every hook is attempted,
    /// and failures are collected into one
    /// [`HookError::Aggregate`](crate::errors::AggregateHookError) returned
    /// afterwards so the caller can decide whether to abort issuance.
    ///
    /// No timeout is applied; a hook that never completes stalls the
    /// issuance request. Keeping hooks well-behaved is the caller's
    /// responsibility.
    pub async fn execute(
        &self,
        event: &str,
        draft: &mut TokenDraft,
        request: &IssueRequest,
    ) -> Result<(), HookError> {
        let parsed = Self::parse(event)?;
        // Snapshot so hooks can add or remove entries without deadlocking
        // on the table lock.
        let hooks: Vec<HookEntry> = self
            .slot(parsed)
            .read()
            .expect("hook table lock poisoned")
            .clone();

        let attempted = hooks.len();
        let mut failures = Vec::new();
        for (id, hook) in hooks {
            debug!("Executing hook {} {}", event, id);
            if let Err(source) = hook.run(draft, request).await {
                failures.push(HookFailure { id, source });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AggregateHookError {
                event: event.to_string(),
                attempted,
                failures,
            }
            .into())
        }
    }

    fn parse(event: &str) -> Result<IssuerEvent, HookError> {
        IssuerEvent::from_name(event)
            .ok_or_else(|| HookError::UnsupportedEvent(event.to_string()))
    }

    fn slot(&self, event: IssuerEvent) -> &RwLock<Vec<HookEntry>> {
        &self.entries[event.index()]
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
