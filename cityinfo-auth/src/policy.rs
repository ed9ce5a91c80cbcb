//! Claim-based authorisation policies.

use log::warn;

use crate::{AuthError, Claims};

/// Name of the policy restricting access to Antwerp residents.
pub const MUST_BE_FROM_ANTWERP: &str = "MustBeFromAntwerp";

/// Requires a claim to hold an exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimPolicy {
    name: String,
    claim: String,
    value: String,
}

impl ClaimPolicy {
    /// Build a policy named `name` requiring `claim` to equal `value`.
    #[must_use]
    pub fn require(
        name: impl Into<String>,
        claim: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            claim: claim.into(),
            value: value.into(),
        }
    }

    /// Policy admitting only users whose `city` claim is `Antwerp`.
    #[must_use]
    pub fn must_be_from_antwerp() -> Self {
        Self::require(MUST_BE_FROM_ANTWERP, "city", "Antwerp")
    }

    /// Policy name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `claims` carry the required value. Comparison is exact.
    #[must_use]
    pub fn is_satisfied_by(&self, claims: &Claims) -> bool {
        claims.get(&self.claim) == Some(self.value.as_str())
    }

    /// Admit `claims` or refuse with [`AuthError::Forbidden`].
    ///
    /// # Errors
    /// Returns [`AuthError::Forbidden`] when the claim is absent or differs.
    pub fn authorize(&self, claims: &Claims) -> Result<(), AuthError> {
        if self.is_satisfied_by(claims) {
            return Ok(());
        }
        warn!("policy {} denied subject {}", self.name, claims.sub);
        Err(AuthError::Forbidden {
            policy: self.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn claims(city: &str) -> Claims {
        Claims {
            sub: "1".to_owned(),
            given_name: "Kevin".to_owned(),
            family_name: "Dockx".to_owned(),
            city: city.to_owned(),
            iss: "cityinfo".to_owned(),
            aud: "cityinfoapi".to_owned(),
            nbf: 0,
            iat: 0,
            exp: 1,
        }
    }

    #[rstest]
    #[case("Antwerp", true)]
    #[case("antwerp", false)]
    #[case("Paris", false)]
    fn antwerp_policy_compares_exactly(#[case] city: &str, #[case] admitted: bool) {
        let policy = ClaimPolicy::must_be_from_antwerp();
        assert_eq!(policy.is_satisfied_by(&claims(city)), admitted);
        assert_eq!(policy.authorize(&claims(city)).is_ok(), admitted);
    }

    #[rstest]
    fn unknown_claims_never_satisfy() {
        let policy = ClaimPolicy::require("Admins", "role", "admin");
        let err = policy.authorize(&claims("Antwerp")).expect_err("no role claim");
        assert!(matches!(err, AuthError::Forbidden { ref policy } if policy == "Admins"));
    }
}
