//! Bearer-token authentication for the city catalogue.
//!
//! Responsibilities:
//! - Check credentials through a [`UserDirectory`] and sign HS256 tokens
//!   carrying the user's identity and home city.
//! - Validate incoming tokens against the configured issuer and audience.
//! - Evaluate claim-based authorisation policies.
//!
//! Boundaries:
//! - No HTTP or header parsing; callers hand over the raw token string.
//! - Credentials are not stored here; the directory owns that concern.

#![forbid(unsafe_code)]

mod error;
mod policy;
mod token;
mod user;

pub use error::AuthError;
pub use policy::{ClaimPolicy, MUST_BE_FROM_ANTWERP};
pub use token::{
    AuthenticatedUser, Claims, DEFAULT_TOKEN_LIFETIME, MIN_SECRET_BYTES, TokenIssuer,
    TokenSettings,
};
pub use user::{PermissiveDirectory, UserDirectory, UserProfile};
