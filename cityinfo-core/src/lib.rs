//! Data-access and mutation semantics for the city information service.
//!
//! Responsibilities:
//! - Model cities and their points of interest, with field validation.
//! - Turn filter and paging parameters into deterministic result pages.
//! - Gate every child operation on the existence of its parent city.
//! - Apply patch documents to points of interest and commit atomically.
//!
//! Boundaries:
//! - Storage engines live behind [`EntityStore`] and [`UnitOfWork`]; only the
//!   in-process [`MemoryStore`] ships here.
//! - Delivery of notifications lives behind [`NotificationSink`].
//!
//! Invariants:
//! - Not-found is a value ([`Option`], [`Lookup`]), never an error.
//! - Identifiers are assigned by the store.
//! - Nothing is visible outside a unit of work until it commits.

#![forbid(unsafe_code)]

mod catalogue;
mod filter;
mod ids;
mod model;
mod notify;
mod pagination;
mod patch;
mod query;
mod repository;
pub mod seed;
mod store;
mod validation;
mod view;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use catalogue::{CityCatalogue, CityRemoval};
pub use filter::CityFilter;
pub use ids::{CityId, PointOfInterestId};
pub use model::{City, CityDraft, PointOfInterest, PointOfInterestDraft};
pub use notify::{Notification, NotificationError, NotificationSink};
pub use pagination::{
    DEFAULT_PAGE_SIZE, FIRST_PAGE, MAX_PAGE_SIZE, Page, PageRequest, PageSize, PageWindow,
    PaginationMetadata,
};
pub use patch::{
    EditablePointOfInterest, PartialUpdateError, PatchDocument, PatchError, PatchErrorKind,
    PatchOperation, apply_partial_update,
};
pub use query::CityQueryService;
pub use repository::{DELETED_SUBJECT, Lookup, PointsOfInterestRepository, RepositoryError};
pub use store::{EntityStore, MemoryStore, MemoryStoreError, MemoryUnitOfWork, UnitOfWork};
pub use validation::{
    DESCRIPTION_MAX_CHARS, Field, NAME_MAX_CHARS, ValidationErrors, Violation,
};
pub use view::{CityRepresentation, CityView, CityWithPointsOfInterest, PointOfInterestView};
