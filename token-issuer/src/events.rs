//! Interception points in the token issuance pipeline.
//!
//! The event set is closed and known at compile time. Adding a new event
//! means adding a variant here; registries keyed by [`IssuerEvent`] pick it
//! up without changing shape.

use std::fmt;

/// A point in the issuance pipeline where subscribers may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssuerEvent {
    /// Fired with the token draft and originating request immediately
    /// before the draft is signed.
    BeforeTokenSigning,
}

impl IssuerEvent {
    /// Every event the issuer can emit, in a stable order.
    pub const ALL: [IssuerEvent; 1] = [IssuerEvent::BeforeTokenSigning];

    /// Wire name used for registration and lookups.
    pub const fn as_str(&self) -> &'static str {
        match self {
            IssuerEvent::BeforeTokenSigning => "before-token-signing",
        }
    }

    /// Resolve a wire name back to an event. `None` for unknown names.
    pub fn from_name(name: &str) -> Option<IssuerEvent> {
        IssuerEvent::ALL
            .iter()
            .copied()
            .find(|event| event.as_str() == name)
    }

    /// Position of this event in [`IssuerEvent::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for IssuerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
