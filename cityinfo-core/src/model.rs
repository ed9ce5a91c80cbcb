//! Core domain records: cities and the points of interest they own.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationErrors, validate_named};
use crate::{CityId, PointOfInterestId};

/// A city and, when requested, the points of interest it owns.
///
/// `points_of_interest` is `None` when the children were not loaded. An
/// empty vector means they were loaded and the city has none.
///
/// # Examples
/// ```
/// use cityinfo_core::{City, CityId};
///
/// let city = City::new(CityId::new(2), "Antwerp", None);
/// assert!(city.points_of_interest.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    /// Store-assigned identifier.
    pub id: CityId,
    /// Display name; also the sort and filter key.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Children, if they were requested.
    pub points_of_interest: Option<Vec<PointOfInterest>>,
}

impl City {
    /// Construct a city whose children have not been loaded.
    pub fn new(id: CityId, name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description,
            points_of_interest: None,
        }
    }

    /// Attach a loaded child collection.
    #[must_use]
    pub fn with_points_of_interest(mut self, points_of_interest: Vec<PointOfInterest>) -> Self {
        self.points_of_interest = Some(points_of_interest);
        self
    }
}

/// A place worth visiting inside a city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointOfInterest {
    /// Store-assigned identifier.
    pub id: PointOfInterestId,
    /// Owning city.
    pub city_id: CityId,
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
}

impl PointOfInterest {
    /// Overwrite every mutable field from `draft`.
    pub fn overwrite(&mut self, draft: PointOfInterestDraft) {
        self.name = draft.name;
        self.description = draft.description;
    }
}

/// Payload used to create or fully replace a point of interest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestDraft {
    /// Display name; required, at most 50 characters.
    #[serde(default)]
    pub name: String,
    /// Optional description, at most 200 characters.
    #[serde(default)]
    pub description: Option<String>,
}

impl PointOfInterestDraft {
    /// Build a draft from its parts.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }

    /// Check the name and description bounds.
    ///
    /// # Errors
    /// Returns every violated constraint.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_named(Some(&self.name), self.description.as_deref())
    }
}

impl From<&PointOfInterest> for PointOfInterestDraft {
    fn from(poi: &PointOfInterest) -> Self {
        Self::new(poi.name.clone(), poi.description.clone())
    }
}

/// Payload used to create a city.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDraft {
    /// Display name; required, at most 50 characters.
    #[serde(default)]
    pub name: String,
    /// Optional description, at most 200 characters.
    #[serde(default)]
    pub description: Option<String>,
}

impl CityDraft {
    /// Build a draft from its parts.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }

    /// Check the name and description bounds.
    ///
    /// # Errors
    /// Returns every violated constraint.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_named(Some(&self.name), self.description.as_deref())
    }
}
