//! User lookup collaborator.

use serde::{Deserialize, Serialize};

/// A user known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier.
    pub id: i64,
    /// Login name.
    pub user_name: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Home city, used by city-scoped policies.
    pub city: String,
}

/// Credential check performed before a token is issued.
pub trait UserDirectory {
    /// Return the profile for valid credentials, or `None`.
    fn verify(&self, user_name: &str, password: &str) -> Option<UserProfile>;
}

/// Directory that accepts every credential pair.
///
/// Every login resolves to the same demonstration profile (id 1, Kevin
/// Dockx from Antwerp) under the supplied user name.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissiveDirectory;

impl UserDirectory for PermissiveDirectory {
    fn verify(&self, user_name: &str, _password: &str) -> Option<UserProfile> {
        Some(UserProfile {
            id: 1,
            user_name: user_name.to_owned(),
            first_name: "Kevin".to_owned(),
            last_name: "Dockx".to_owned(),
            city: "Antwerp".to_owned(),
        })
    }
}
