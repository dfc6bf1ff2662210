//! Built-in, parameterized hooks.
//!
//! Each type here is a factory whose constructor validates its arguments
//! eagerly and whose instance implements [`TokenHook`](crate::hooks::TokenHook).

mod conform_audience;
mod custom_claims;
mod expire_tokens;
mod invalidate_signature;

pub use conform_audience::ConformAudience;
pub use custom_claims::{CustomClaim, CustomClaims};
pub use expire_tokens::ExpireTokens;
pub use invalidate_signature::InvalidateSignature;
