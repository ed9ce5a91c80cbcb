//! Errors raised while issuing or checking bearer tokens.

use thiserror::Error;

/// Failures of token issuance, validation and authorisation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The signing secret is too short for HS256.
    #[error("signing secret must be at least {min} bytes (found {len})")]
    SecretTooShort {
        /// Minimum accepted length in bytes.
        min: usize,
        /// Supplied length in bytes.
        len: usize,
    },
    /// The user directory rejected the credentials.
    #[error("invalid user name or password")]
    InvalidCredentials,
    /// The system clock is set before the Unix epoch.
    #[error("system clock is before the Unix epoch")]
    Clock,
    /// Signing the token failed.
    #[error("failed to sign token")]
    Encode {
        /// Source error returned by `jsonwebtoken`.
        #[source]
        source: jsonwebtoken::errors::Error,
    },
    /// The token has expired.
    #[error("token expired")]
    Expired,
    /// The token is not valid yet.
    #[error("token not valid yet")]
    Immature,
    /// The signature does not match.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The token was issued by someone else.
    #[error("invalid token issuer")]
    InvalidIssuer,
    /// The token was issued for another audience.
    #[error("invalid token audience")]
    InvalidAudience,
    /// The token could not be decoded.
    #[error("malformed token")]
    Malformed {
        /// Source error returned by `jsonwebtoken`.
        #[source]
        source: jsonwebtoken::errors::Error,
    },
    /// The claims do not satisfy an authorisation policy.
    #[error("policy '{policy}' denied access")]
    Forbidden {
        /// Name of the denying policy.
        policy: String,
    },
}
