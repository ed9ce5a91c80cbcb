//! Demonstration catalogue loaded into empty stores.

use log::{debug, info};

use crate::{CityDraft, CityFilter, EntityStore, PointOfInterestDraft, UnitOfWork};

/// A seeded city and the points of interest it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCity {
    /// City name.
    pub name: &'static str,
    /// City description.
    pub description: &'static str,
    /// `(name, description)` pairs of the owned points of interest.
    pub points_of_interest: &'static [(&'static str, &'static str)],
}

/// Cities and points of interest in insertion order.
///
/// Inserted into an empty store, the cities receive ids 1 to 3 and the
/// points of interest ids 1 to 6.
pub const CATALOGUE: &[SeedCity] = &[
    SeedCity {
        name: "New York City",
        description: "The one with that big park.",
        points_of_interest: &[
            (
                "Central Park",
                "The most visited urban park in the united states.",
            ),
            (
                "Empire State Building",
                "A 102-story skyscraper located in Midtown Manhattan",
            ),
        ],
    },
    SeedCity {
        name: "Antwerp",
        description: "The one with the cathedral that was never really finished.",
        points_of_interest: &[
            (
                "Cathedral of Our Lady",
                "A Gothic style cathedral, concieved by architects Jan and Piete.",
            ),
            (
                "Antwerp Central Station",
                "The finest example of railway architecture in Belgium.",
            ),
        ],
    },
    SeedCity {
        name: "Paris",
        description: "The one with that big tower.",
        points_of_interest: &[
            (
                "Eiffel Tower",
                "A wrought iron lattice tower on the Champ de Mars, named after.",
            ),
            ("The Louvre", "The world's biggest museum."),
        ],
    },
];

/// Load [`CATALOGUE`] into `store` unless it already holds cities.
///
/// Returns `true` when the catalogue was written.
///
/// # Errors
/// Returns the store error when a read, insert or the commit fails.
pub fn seed_catalogue<S: EntityStore>(store: &mut S) -> Result<bool, S::Error> {
    let mut unit = store.begin()?;
    let existing = unit.count_cities(&CityFilter::default())?;
    if existing > 0 {
        debug!("store already holds {existing} cities; skipping seed");
        return Ok(false);
    }
    let city_ids = CATALOGUE
        .iter()
        .map(|city| {
            unit.insert_city(&CityDraft::new(
                city.name,
                Some(city.description.to_owned()),
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;
    for (city, city_id) in CATALOGUE.iter().zip(city_ids) {
        for (name, description) in city.points_of_interest {
            unit.insert_point_of_interest(
                city_id,
                &PointOfInterestDraft::new(*name, Some((*description).to_owned())),
            )?;
        }
    }
    let affected = unit.commit()?;
    info!("seeded {affected} row(s)");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CityId, MemoryStore, PointOfInterestId};
    use rstest::rstest;

    #[rstest]
    fn assigns_sequential_ids() {
        let mut store = MemoryStore::default();
        assert!(seed_catalogue(&mut store).expect("seed"));
        let unit = store.begin().expect("begin");
        let cathedral = unit
            .find_point_of_interest(CityId::new(2), PointOfInterestId::new(3))
            .expect("read")
            .expect("seeded");
        assert_eq!(cathedral.name, "Cathedral of Our Lady");
        assert_eq!(
            unit.points_of_interest_for_city(CityId::new(3))
                .expect("read")
                .len(),
            2
        );
    }

    #[rstest]
    fn seeding_twice_is_a_no_op() {
        let mut store = MemoryStore::default();
        assert!(seed_catalogue(&mut store).expect("seed"));
        assert!(!seed_catalogue(&mut store).expect("reseed"));
        let unit = store.begin().expect("begin");
        assert_eq!(unit.count_cities(&CityFilter::default()).expect("count"), 3);
    }
}
