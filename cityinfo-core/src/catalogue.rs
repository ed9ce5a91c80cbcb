//! City creation and removal.
//!
//! A city that still owns points of interest is never removed. Callers must
//! delete the children first.

use log::info;

use crate::{City, CityDraft, CityId, RepositoryError, UnitOfWork};

/// Outcome of a city removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityRemoval {
    /// The city was staged for removal.
    Deleted,
    /// No such city.
    NotFound,
    /// The city still owns points of interest and was left in place.
    HasPointsOfInterest {
        /// Number of children blocking the removal.
        count: usize,
    },
}

/// Writes to the city collection.
#[derive(Debug)]
pub struct CityCatalogue<U> {
    unit: U,
}

impl<U: UnitOfWork> CityCatalogue<U> {
    /// Wrap a unit of work.
    pub const fn new(unit: U) -> Self {
        Self { unit }
    }

    /// Unit of work backing this catalogue.
    pub const fn unit(&self) -> &U {
        &self.unit
    }

    /// Stage a new city with a store-assigned id.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Validation`] for an invalid draft and
    /// [`RepositoryError::Store`] on store failure.
    pub fn create(&mut self, draft: CityDraft) -> Result<City, RepositoryError<U::Error>> {
        draft.validate()?;
        let id = self
            .unit
            .insert_city(&draft)
            .map_err(RepositoryError::Store)?;
        info!("staged city {id}");
        Ok(City::new(id, draft.name, draft.description).with_points_of_interest(Vec::new()))
    }

    /// Stage removal of a childless city.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Store`] on store failure.
    pub fn delete(&mut self, id: CityId) -> Result<CityRemoval, RepositoryError<U::Error>> {
        if !self.unit.city_exists(id).map_err(RepositoryError::Store)? {
            return Ok(CityRemoval::NotFound);
        }
        let count = self
            .unit
            .points_of_interest_for_city(id)
            .map_err(RepositoryError::Store)?
            .len();
        if count > 0 {
            info!("refusing to remove city {id}: {count} point(s) of interest remain");
            return Ok(CityRemoval::HasPointsOfInterest { count });
        }
        self.unit.delete_city(id).map_err(RepositoryError::Store)?;
        info!("staged removal of city {id}");
        Ok(CityRemoval::Deleted)
    }

    /// Commit staged writes. Returns `false` when nothing was persisted.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Store`] when the commit fails.
    pub fn save_changes(self) -> Result<bool, RepositoryError<U::Error>> {
        let affected = self.unit.commit().map_err(RepositoryError::Store)?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_catalogue;
    use crate::{CityFilter, EntityStore, MemoryStore, MemoryStoreError};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MemoryStore {
        let mut store = MemoryStore::default();
        seed_catalogue(&mut store).expect("seed");
        store
    }

    #[rstest]
    fn refuses_to_remove_cities_with_children(mut store: MemoryStore) {
        let mut catalogue = CityCatalogue::new(store.begin().expect("begin"));
        assert_eq!(
            catalogue.delete(CityId::new(2)).expect("delete"),
            CityRemoval::HasPointsOfInterest { count: 2 }
        );
        assert_eq!(
            catalogue.delete(CityId::new(7)).expect("delete"),
            CityRemoval::NotFound
        );
        assert!(!catalogue.save_changes().expect("save"));
    }

    #[rstest]
    fn created_cities_can_be_removed(mut store: MemoryStore) {
        let mut catalogue = CityCatalogue::new(store.begin().expect("begin"));
        let city = catalogue
            .create(CityDraft::new("Ghent", Some("Canals.".into())))
            .expect("create");
        assert_eq!(city.id, CityId::new(4));
        assert!(catalogue.save_changes().expect("save"));

        let mut removal = CityCatalogue::new(store.begin().expect("begin"));
        assert_eq!(
            removal.delete(city.id).expect("delete"),
            CityRemoval::Deleted
        );
        assert!(removal.save_changes().expect("save"));
        let unit = store.begin().expect("begin");
        assert_eq!(unit.count_cities(&CityFilter::default()).expect("count"), 3);
    }

    #[rstest]
    fn create_validates_the_draft(mut store: MemoryStore) {
        let mut catalogue = CityCatalogue::new(store.begin().expect("begin"));
        let err = catalogue
            .create(CityDraft::new("x".repeat(51), None))
            .expect_err("name too long");
        assert!(matches!(err, RepositoryError::<MemoryStoreError>::Validation(_)));
    }
}
