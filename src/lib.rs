//! Facade crate for the city information catalogue.
//!
//! This crate re-exports the core domain types and exposes the SQLite store
//! and token authentication behind feature flags.

#![forbid(unsafe_code)]

pub use cityinfo_core::{
    City, CityCatalogue, CityDraft, CityFilter, CityId, CityQueryService, CityRemoval,
    CityRepresentation, EntityStore, Lookup, MemoryStore, NotificationSink, Page, PageRequest,
    PageSize, PaginationMetadata, PartialUpdateError, PatchDocument, PatchOperation,
    PointOfInterest, PointOfInterestDraft, PointOfInterestId, PointsOfInterestRepository,
    RepositoryError, UnitOfWork, ValidationErrors, apply_partial_update, seed,
};

#[cfg(feature = "store-sqlite")]
pub use cityinfo_data::{LogMailer, SqliteStore, SqliteStoreError};

#[cfg(feature = "auth")]
pub use cityinfo_auth::{AuthError, ClaimPolicy, Claims, TokenIssuer, TokenSettings};
