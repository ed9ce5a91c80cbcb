//! HS256 bearer-token issuance and validation.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{AuthError, UserDirectory, UserProfile};

/// Shortest signing secret accepted, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Token lifetime used when none is configured.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Settings shared by issuance and validation.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSettings {
    /// HMAC secret.
    pub secret: Vec<u8>,
    /// Value of the `iss` claim.
    pub issuer: String,
    /// Value of the `aud` claim.
    pub audience: String,
    /// Time between `nbf` and `exp`.
    pub lifetime: Duration,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// Claims carried by issued tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier.
    pub sub: String,
    /// Given name.
    pub given_name: String,
    /// Family name.
    pub family_name: String,
    /// Home city.
    pub city: String,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: String,
    /// Not before, in Unix seconds.
    pub nbf: u64,
    /// Issued at, in Unix seconds.
    pub iat: u64,
    /// Expiry, in Unix seconds.
    pub exp: u64,
}

impl Claims {
    /// Value of a named claim, for the string-valued identity claims.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "sub" => Some(&self.sub),
            "given_name" => Some(&self.given_name),
            "family_name" => Some(&self.family_name),
            "city" => Some(&self.city),
            "iss" => Some(&self.iss),
            "aud" => Some(&self.aud),
            _ => None,
        }
    }
}

/// Response returned to a user who authenticated successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// User identifier.
    pub id: i64,
    /// Login name.
    pub user_name: String,
    /// Home city.
    pub city: String,
    /// Signed bearer token.
    pub token: String,
}

/// Signs and checks bearer tokens for users of a [`UserDirectory`].
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use cityinfo_auth::{PermissiveDirectory, TokenIssuer, TokenSettings};
///
/// # fn main() -> Result<(), cityinfo_auth::AuthError> {
/// let settings = TokenSettings {
///     secret: b"an example secret that is long enough".to_vec(),
///     issuer: "https://localhost:7169".into(),
///     audience: "cityinfoapi".into(),
///     lifetime: Duration::from_secs(3600),
/// };
/// let issuer = TokenIssuer::new(settings, PermissiveDirectory)?;
/// let user = issuer.authenticate("kevin", "secret")?;
/// let claims = issuer.validate(&user.token)?;
/// assert_eq!(claims.city, "Antwerp");
/// # Ok(())
/// # }
/// ```
pub struct TokenIssuer<D> {
    settings: TokenSettings,
    encoding: EncodingKey,
    decoding: DecodingKey,
    directory: D,
}

impl<D: std::fmt::Debug> std::fmt::Debug for TokenIssuer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("settings", &self.settings)
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

fn unix_now() -> Result<u64, AuthError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .map_err(|_| AuthError::Clock)
}

impl<D: UserDirectory> TokenIssuer<D> {
    /// Build an issuer after checking the secret length.
    ///
    /// # Errors
    /// Returns [`AuthError::SecretTooShort`] for secrets under
    /// [`MIN_SECRET_BYTES`].
    pub fn new(settings: TokenSettings, directory: D) -> Result<Self, AuthError> {
        let len = settings.secret.len();
        if len < MIN_SECRET_BYTES {
            return Err(AuthError::SecretTooShort {
                min: MIN_SECRET_BYTES,
                len,
            });
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(&settings.secret),
            decoding: DecodingKey::from_secret(&settings.secret),
            settings,
            directory,
        })
    }

    /// Check credentials and issue a token for the user.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] when the directory rejects
    /// the credentials, or a signing error.
    pub fn authenticate(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let Some(profile) = self.directory.verify(user_name, password) else {
            warn!("rejected credentials for user '{user_name}'");
            return Err(AuthError::InvalidCredentials);
        };
        let token = self.issue(&profile)?;
        info!("issued token for user {}", profile.id);
        Ok(AuthenticatedUser {
            id: profile.id,
            user_name: profile.user_name,
            city: profile.city,
            token,
        })
    }

    /// Sign a token for `profile`, valid from now for the configured
    /// lifetime.
    ///
    /// # Errors
    /// Returns [`AuthError::Clock`] or [`AuthError::Encode`].
    pub fn issue(&self, profile: &UserProfile) -> Result<String, AuthError> {
        self.issue_at(profile, unix_now()?)
    }

    /// Sign a token for `profile` as if issued at `issued_at` Unix seconds.
    ///
    /// # Errors
    /// Returns [`AuthError::Encode`] when signing fails.
    pub fn issue_at(&self, profile: &UserProfile, issued_at: u64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: profile.id.to_string(),
            given_name: profile.first_name.clone(),
            family_name: profile.last_name.clone(),
            city: profile.city.clone(),
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            nbf: issued_at,
            iat: issued_at,
            exp: issued_at.saturating_add(self.settings.lifetime.as_secs()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|source| AuthError::Encode { source })
    }

    /// Check signature, issuer, audience and validity window.
    ///
    /// # Errors
    /// Returns the [`AuthError`] variant describing the rejection.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.settings.issuer]);
        validation.set_audience(&[&self.settings.audience]);
        validation.validate_nbf = true;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| {
                debug!("validated token for subject {}", data.claims.sub);
                data.claims
            })
            .map_err(|source| {
                let err = match source.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    ErrorKind::ImmatureSignature => AuthError::Immature,
                    ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                    ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                    ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                    _ => AuthError::Malformed { source },
                };
                warn!("rejected token: {err}");
                err
            })
    }
}
