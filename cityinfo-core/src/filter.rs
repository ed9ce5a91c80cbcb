//! Normalised city filters.
//!
//! Both filters compare text ASCII case-insensitively. Stores must apply the
//! same folding so results do not depend on the backing engine.

/// Name and free-text filters applied to the city collection.
///
/// Blank inputs are dropped and the rest trimmed, so a filter built from
/// `Some("  ")` behaves like no filter at all.
///
/// # Examples
/// ```
/// use cityinfo_core::{City, CityFilter, CityId};
///
/// let paris = City::new(CityId::new(3), "Paris", Some("The one with that big tower.".into()));
/// assert!(CityFilter::new(None, Some(" TOWER ")).matches(&paris));
/// assert!(!CityFilter::new(Some("Antwerp"), None).matches(&paris));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityFilter {
    name: Option<String>,
    search_query: Option<String>,
}

fn normalise(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

impl CityFilter {
    /// Build a filter from raw request parameters.
    #[must_use]
    pub fn new(name: Option<&str>, search_query: Option<&str>) -> Self {
        Self {
            name: normalise(name),
            search_query: normalise(search_query),
        }
    }

    /// Trimmed exact-name filter, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Trimmed substring filter, if any.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    /// Whether no filter applies.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.search_query.is_none()
    }

    /// Evaluate both filters against a row (AND semantics).
    #[must_use]
    pub fn matches_parts(&self, name: &str, description: Option<&str>) -> bool {
        let name_matches = self
            .name
            .as_deref()
            .is_none_or(|wanted| name.eq_ignore_ascii_case(wanted));
        let search_matches = self.search_query.as_deref().is_none_or(|needle| {
            contains_folded(name, needle) || description.is_some_and(|d| contains_folded(d, needle))
        });
        name_matches && search_matches
    }

    /// Evaluate both filters against a city.
    #[must_use]
    pub fn matches(&self, city: &crate::City) -> bool {
        self.matches_parts(&city.name, city.description.as_deref())
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}
