//! Read-side queries over cities.

use log::debug;

use crate::{City, CityFilter, CityId, Page, PageRequest, PaginationMetadata, UnitOfWork};

/// Filtered, ordered and paginated reads of the city collection.
///
/// The service borrows a unit of work, so several services (or a
/// repository) can share one unit within a request. Absent cities are
/// reported as `None` or an empty page; only store failures are errors.
///
/// # Examples
///
/// ```rust
/// use cityinfo_core::{
///     CityFilter, CityQueryService, EntityStore, MemoryStore, PageRequest, PageSize, seed,
/// };
///
/// # fn main() -> Result<(), cityinfo_core::MemoryStoreError> {
/// let mut store = MemoryStore::default();
/// seed::seed_catalogue(&mut store)?;
/// let unit = store.begin()?;
/// let cities = CityQueryService::new(&unit);
///
/// let filter = CityFilter::new(None, Some("tower"));
/// let page = cities.list_filtered(&filter, PageRequest::new(1, PageSize::clamped(10)))?;
/// assert_eq!(page.items.len(), 1);
/// assert_eq!(page.items[0].name, "Paris");
/// assert_eq!(page.metadata.total_item_count, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CityQueryService<'u, U: ?Sized> {
    unit: &'u U,
}

impl<'u, U> CityQueryService<'u, U>
where
    U: UnitOfWork + ?Sized,
{
    /// Build a service over `unit`.
    pub const fn new(unit: &'u U) -> Self {
        Self { unit }
    }

    /// Every city, sorted by name.
    ///
    /// # Errors
    /// Returns the store error on read failure.
    pub fn list_all(&self) -> Result<Vec<City>, U::Error> {
        self.unit.scan_cities(&CityFilter::default(), None)
    }

    /// One page of the cities matching `filter`.
    ///
    /// The total is counted before paging. A page number below 1 or past the
    /// last page yields an empty page with accurate metadata.
    ///
    /// # Errors
    /// Returns the store error on read failure.
    pub fn list_filtered(
        &self,
        filter: &CityFilter,
        request: PageRequest,
    ) -> Result<Page<City>, U::Error> {
        let total = self.unit.count_cities(filter)?;
        let items = match request.window() {
            Some(window) if window.offset < total => {
                self.unit.scan_cities(filter, Some(window))?
            }
            _ => Vec::new(),
        };
        debug!(
            "city query {filter:?} page {} matched {total} row(s), returning {}",
            request.page_number,
            items.len()
        );
        Ok(Page {
            items,
            metadata: PaginationMetadata::compute(
                total,
                request.page_number,
                request.page_size,
            ),
        })
    }

    /// One city, optionally with its points of interest loaded.
    ///
    /// When `include_children` is `false` the child collection is left
    /// unloaded (`None`), which is not the same as empty.
    ///
    /// # Errors
    /// Returns the store error on read failure.
    pub fn get(&self, id: CityId, include_children: bool) -> Result<Option<City>, U::Error> {
        let Some(city) = self.unit.find_city(id)? else {
            return Ok(None);
        };
        if !include_children {
            return Ok(Some(city));
        }
        let children = self.unit.points_of_interest_for_city(id)?;
        Ok(Some(city.with_points_of_interest(children)))
    }

    /// Whether a city exists, without loading it.
    ///
    /// # Errors
    /// Returns the store error on read failure.
    pub fn exists(&self, id: CityId) -> Result<bool, U::Error> {
        self.unit.city_exists(id)
    }
}
