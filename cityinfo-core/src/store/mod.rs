//! Entity store traits.
//!
//! An [`EntityStore`] hands out one [`UnitOfWork`] at a time. Every read and
//! staged write of a request goes through that unit, and nothing becomes
//! visible to other units until [`UnitOfWork::commit`] succeeds. Dropping a
//! unit without committing discards its writes.
//!
//! Implementations must hold their isolation guarantee for the whole life of
//! the unit: an existence check followed by a child write inside one unit
//! cannot interleave with another writer deleting the parent.

use crate::{
    City, CityDraft, CityFilter, CityId, PageWindow, PointOfInterest, PointOfInterestDraft,
    PointOfInterestId,
};

mod memory;

pub use memory::{MemoryStore, MemoryStoreError, MemoryUnitOfWork};

/// Source of units of work over cities and points of interest.
///
/// # Examples
///
/// ```rust
/// use cityinfo_core::{CityDraft, CityFilter, EntityStore, MemoryStore, UnitOfWork};
///
/// # fn main() -> Result<(), cityinfo_core::MemoryStoreError> {
/// let mut store = MemoryStore::default();
/// let mut unit = store.begin()?;
/// let id = unit.insert_city(&CityDraft::new("Ghent", None))?;
/// assert_eq!(unit.commit()?, 1);
///
/// let unit = store.begin()?;
/// assert!(unit.city_exists(id)?);
/// assert_eq!(unit.count_cities(&CityFilter::default())?, 1);
/// # Ok(())
/// # }
/// ```
pub trait EntityStore {
    /// Infrastructure failure raised by the backing engine.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Unit of work borrowed from this store.
    type Unit<'a>: UnitOfWork<Error = Self::Error>
    where
        Self: 'a;

    /// Start a unit of work.
    ///
    /// # Errors
    /// Returns the engine error when the unit cannot be opened.
    fn begin(&mut self) -> Result<Self::Unit<'_>, Self::Error>;
}

/// An atomic sequence of reads and writes.
///
/// Reads observe the unit's own staged writes. City scans order rows by
/// `name` and then by `id`; point-of-interest scans order rows by `id`.
/// Name and search filters compare ASCII case-insensitively.
pub trait UnitOfWork {
    /// Infrastructure failure raised by the backing engine.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Count the cities matching `filter`.
    ///
    /// # Errors
    /// Returns the engine error on read failure.
    fn count_cities(&self, filter: &CityFilter) -> Result<u64, Self::Error>;

    /// Return cities matching `filter`, ordered, optionally windowed.
    ///
    /// Child collections are not loaded.
    ///
    /// # Errors
    /// Returns the engine error on read failure.
    fn scan_cities(
        &self,
        filter: &CityFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<City>, Self::Error>;

    /// Look up a single city without its children.
    ///
    /// # Errors
    /// Returns the engine error on read failure.
    fn find_city(&self, id: CityId) -> Result<Option<City>, Self::Error>;

    /// Whether a city with `id` exists.
    ///
    /// # Errors
    /// Returns the engine error on read failure.
    fn city_exists(&self, id: CityId) -> Result<bool, Self::Error>;

    /// All points of interest owned by `city_id`.
    ///
    /// # Errors
    /// Returns the engine error on read failure.
    fn points_of_interest_for_city(
        &self,
        city_id: CityId,
    ) -> Result<Vec<PointOfInterest>, Self::Error>;

    /// Look up a point of interest owned by `city_id`.
    ///
    /// # Errors
    /// Returns the engine error on read failure.
    fn find_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
    ) -> Result<Option<PointOfInterest>, Self::Error>;

    /// Stage a new point of interest and return its store-assigned id.
    ///
    /// # Errors
    /// Returns the engine error when the write is rejected, including when
    /// `city_id` does not exist.
    fn insert_point_of_interest(
        &mut self,
        city_id: CityId,
        draft: &PointOfInterestDraft,
    ) -> Result<PointOfInterestId, Self::Error>;

    /// Stage a full overwrite of an existing point of interest.
    ///
    /// # Errors
    /// Returns the engine error when the write is rejected.
    fn update_point_of_interest(&mut self, poi: &PointOfInterest) -> Result<(), Self::Error>;

    /// Stage removal of a point of interest.
    ///
    /// # Errors
    /// Returns the engine error when the write is rejected.
    fn delete_point_of_interest(&mut self, id: PointOfInterestId) -> Result<(), Self::Error>;

    /// Stage a new city and return its store-assigned id.
    ///
    /// # Errors
    /// Returns the engine error when the write is rejected.
    fn insert_city(&mut self, draft: &CityDraft) -> Result<CityId, Self::Error>;

    /// Stage removal of a city that owns no points of interest.
    ///
    /// # Errors
    /// Returns the engine error when the write is rejected, including when
    /// the city still owns points of interest.
    fn delete_city(&mut self, id: CityId) -> Result<(), Self::Error>;

    /// Publish every staged write atomically.
    ///
    /// Returns the number of rows the staged writes affected.
    ///
    /// # Errors
    /// Returns the engine error when the commit fails; no write is then
    /// visible.
    fn commit(self) -> Result<u64, Self::Error>;
}
