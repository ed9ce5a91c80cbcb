//! Serialisable presentations of cities and points of interest.

use serde::Serialize;

use crate::{City, CityId, PointOfInterest, PointOfInterestId};

/// A point of interest as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestView {
    /// Identifier.
    pub id: PointOfInterestId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

impl From<&PointOfInterest> for PointOfInterestView {
    fn from(poi: &PointOfInterest) -> Self {
        Self {
            id: poi.id,
            name: poi.name.clone(),
            description: poi.description.clone(),
        }
    }
}

/// A city without its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityView {
    /// Identifier.
    pub id: CityId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

impl From<&City> for CityView {
    fn from(city: &City) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
            description: city.description.clone(),
        }
    }
}

/// A city with its loaded children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWithPointsOfInterest {
    /// Identifier.
    pub id: CityId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Number of owned points of interest.
    pub number_of_points_of_interest: usize,
    /// Owned points of interest.
    pub points_of_interest: Vec<PointOfInterestView>,
}

/// The shape a city takes on the wire.
///
/// Cities whose children were not loaded render as [`CityView`]; loaded
/// cities, even childless ones, render with their collection.
///
/// # Examples
///
/// ```rust
/// use cityinfo_core::{City, CityId, CityRepresentation};
///
/// let city = City::new(CityId::new(1), "Ghent", None);
/// let summary = serde_json::to_value(CityRepresentation::from(&city)).expect("serialise");
/// assert!(summary.get("pointsOfInterest").is_none());
///
/// let loaded = city.with_points_of_interest(Vec::new());
/// let detail = serde_json::to_value(CityRepresentation::from(&loaded)).expect("serialise");
/// assert_eq!(detail["numberOfPointsOfInterest"], 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CityRepresentation {
    /// Children not requested.
    Summary(CityView),
    /// Children loaded.
    Detailed(CityWithPointsOfInterest),
}

impl From<&City> for CityRepresentation {
    fn from(city: &City) -> Self {
        match &city.points_of_interest {
            None => Self::Summary(CityView::from(city)),
            Some(children) => Self::Detailed(CityWithPointsOfInterest {
                id: city.id,
                name: city.name.clone(),
                description: city.description.clone(),
                number_of_points_of_interest: children.len(),
                points_of_interest: children.iter().map(PointOfInterestView::from).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn detailed_cities_count_their_children() {
        let city = City::new(CityId::new(3), "Paris", None).with_points_of_interest(vec![
            PointOfInterest {
                id: PointOfInterestId::new(6),
                city_id: CityId::new(3),
                name: "The Louvre".into(),
                description: None,
            },
        ]);
        let value = serde_json::to_value(CityRepresentation::from(&city)).expect("serialise");
        assert_eq!(
            value,
            json!({
                "id": 3,
                "name": "Paris",
                "description": null,
                "numberOfPointsOfInterest": 1,
                "pointsOfInterest": [{"id": 6, "name": "The Louvre", "description": null}],
            })
        );
    }
}
