//! In-process entity store.
//!
//! Units of work hold the store lock for their whole life and operate on a
//! private copy of the tables, so a unit that is dropped leaves no trace and
//! a committed unit replaces the tables in one step.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use log::debug;
use thiserror::Error;

use super::{EntityStore, UnitOfWork};
use crate::{
    City, CityDraft, CityFilter, CityId, PageWindow, PointOfInterest, PointOfInterestDraft,
    PointOfInterestId,
};

/// Constraint violations reported by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryStoreError {
    /// A write referenced a city that does not exist.
    #[error("city {id} does not exist")]
    UnknownCity {
        /// Missing city.
        id: CityId,
    },
    /// A write referenced a point of interest that does not exist.
    #[error("point of interest {id} does not exist")]
    UnknownPointOfInterest {
        /// Missing point of interest.
        id: PointOfInterestId,
    },
    /// A city still owning points of interest cannot be removed.
    #[error("city {id} still owns {count} points of interest")]
    CityInUse {
        /// City that was to be removed.
        id: CityId,
        /// Number of children still referencing it.
        count: usize,
    },
    /// Another unit of work over the same tables is still open.
    #[error("another unit of work is still open")]
    Busy,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    cities: BTreeMap<CityId, City>,
    points_of_interest: BTreeMap<PointOfInterestId, PointOfInterest>,
    last_city_id: i64,
    last_point_of_interest_id: i64,
}

/// Thread-safe in-memory [`EntityStore`].
///
/// Clones share the same tables. Only one unit of work may be open across a
/// store and its clones; [`begin`](EntityStore::begin) fails with
/// [`MemoryStoreError::Busy`] instead of waiting for it to finish.
/// Identifiers come from monotonic counters and are never reused, even after
/// deletion.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, MemoryStoreError> {
        match self.tables.try_lock() {
            Ok(guard) => Ok(guard),
            // A panicking unit never publishes its copy, so the tables stay
            // consistent even when the lock is poisoned.
            Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => Err(MemoryStoreError::Busy),
        }
    }
}

impl EntityStore for MemoryStore {
    type Error = MemoryStoreError;
    type Unit<'a> = MemoryUnitOfWork<'a>;

    fn begin(&mut self) -> Result<Self::Unit<'_>, Self::Error> {
        let guard = self.lock()?;
        let working = guard.clone();
        Ok(MemoryUnitOfWork {
            guard,
            working,
            affected: 0,
        })
    }
}

/// Unit of work over a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryUnitOfWork<'a> {
    guard: MutexGuard<'a, Tables>,
    working: Tables,
    affected: u64,
}

impl MemoryUnitOfWork<'_> {
    fn matching<'t>(&'t self, filter: &'t CityFilter) -> impl Iterator<Item = &'t City> + 't {
        self.working
            .cities
            .values()
            .filter(move |city| filter.matches(city))
    }

    fn children_of(&self, city_id: CityId) -> impl Iterator<Item = &PointOfInterest> + '_ {
        self.working
            .points_of_interest
            .values()
            .filter(move |poi| poi.city_id == city_id)
    }
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

impl UnitOfWork for MemoryUnitOfWork<'_> {
    type Error = MemoryStoreError;

    fn count_cities(&self, filter: &CityFilter) -> Result<u64, Self::Error> {
        let count = self.matching(filter).count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    fn scan_cities(
        &self,
        filter: &CityFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<City>, Self::Error> {
        let mut cities: Vec<City> = self.matching(filter).cloned().collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(match window {
            Some(PageWindow { offset, limit }) => cities
                .into_iter()
                .skip(to_usize(offset))
                .take(to_usize(u64::from(limit)))
                .collect(),
            None => cities,
        })
    }

    fn find_city(&self, id: CityId) -> Result<Option<City>, Self::Error> {
        Ok(self.working.cities.get(&id).cloned())
    }

    fn city_exists(&self, id: CityId) -> Result<bool, Self::Error> {
        Ok(self.working.cities.contains_key(&id))
    }

    fn points_of_interest_for_city(
        &self,
        city_id: CityId,
    ) -> Result<Vec<PointOfInterest>, Self::Error> {
        Ok(self.children_of(city_id).cloned().collect())
    }

    fn find_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
    ) -> Result<Option<PointOfInterest>, Self::Error> {
        Ok(self
            .working
            .points_of_interest
            .get(&id)
            .filter(|poi| poi.city_id == city_id)
            .cloned())
    }

    fn insert_point_of_interest(
        &mut self,
        city_id: CityId,
        draft: &PointOfInterestDraft,
    ) -> Result<PointOfInterestId, Self::Error> {
        if !self.working.cities.contains_key(&city_id) {
            return Err(MemoryStoreError::UnknownCity { id: city_id });
        }
        self.working.last_point_of_interest_id += 1;
        let id = PointOfInterestId::new(self.working.last_point_of_interest_id);
        self.working.points_of_interest.insert(
            id,
            PointOfInterest {
                id,
                city_id,
                name: draft.name.clone(),
                description: draft.description.clone(),
            },
        );
        self.affected += 1;
        Ok(id)
    }

    fn update_point_of_interest(&mut self, poi: &PointOfInterest) -> Result<(), Self::Error> {
        if !self.working.cities.contains_key(&poi.city_id) {
            return Err(MemoryStoreError::UnknownCity { id: poi.city_id });
        }
        let slot = self
            .working
            .points_of_interest
            .get_mut(&poi.id)
            .ok_or(MemoryStoreError::UnknownPointOfInterest { id: poi.id })?;
        slot.clone_from(poi);
        self.affected += 1;
        Ok(())
    }

    fn delete_point_of_interest(&mut self, id: PointOfInterestId) -> Result<(), Self::Error> {
        self.working
            .points_of_interest
            .remove(&id)
            .ok_or(MemoryStoreError::UnknownPointOfInterest { id })?;
        self.affected += 1;
        Ok(())
    }

    fn insert_city(&mut self, draft: &CityDraft) -> Result<CityId, Self::Error> {
        self.working.last_city_id += 1;
        let id = CityId::new(self.working.last_city_id);
        self.working.cities.insert(
            id,
            City::new(id, draft.name.clone(), draft.description.clone()),
        );
        self.affected += 1;
        Ok(id)
    }

    fn delete_city(&mut self, id: CityId) -> Result<(), Self::Error> {
        let count = self.children_of(id).count();
        if count > 0 {
            return Err(MemoryStoreError::CityInUse { id, count });
        }
        self.working
            .cities
            .remove(&id)
            .ok_or(MemoryStoreError::UnknownCity { id })?;
        self.affected += 1;
        Ok(())
    }

    fn commit(self) -> Result<u64, Self::Error> {
        let Self {
            mut guard,
            working,
            affected,
        } = self;
        *guard = working;
        debug!("memory store committed {affected} change(s)");
        Ok(affected)
    }
}
