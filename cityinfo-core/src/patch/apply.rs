//! Applying a patch document to a stored point of interest.

use log::{debug, info};
use thiserror::Error;

use super::{EditablePointOfInterest, PatchDocument, PatchError};
use crate::{
    CityId, Lookup, NotificationSink, PointOfInterest, PointOfInterestId,
    PointsOfInterestRepository, RepositoryError, UnitOfWork, ValidationErrors,
};

/// Failures of a partial update. Nothing is persisted in any of these cases.
#[derive(Debug, Error)]
pub enum PartialUpdateError<E> {
    /// An operation named an unknown path, carried a bad value, or failed a
    /// `test`.
    #[error(transparent)]
    Patch(#[from] PatchError),
    /// The patched fields break the point-of-interest constraints.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// The store committed without persisting anything.
    #[error("partial update was not persisted")]
    NotPersisted,
    /// The entity store failed.
    #[error("entity store failed")]
    Store(#[source] E),
}

impl<E> From<RepositoryError<E>> for PartialUpdateError<E> {
    fn from(err: RepositoryError<E>) -> Self {
        match err {
            RepositoryError::Store(source) => Self::Store(source),
            RepositoryError::Validation(errors) => Self::Validation(errors),
        }
    }
}

/// Patch a point of interest and commit the result.
///
/// The stored record is projected onto its mutable fields, every operation
/// is applied in order, the whole projection is validated, and only then is
/// it written back and committed. A structural failure and a validation
/// failure are reported separately; in both cases the repository is dropped
/// and nothing is written.
///
/// Absent parents and children are returned as [`Lookup`] values.
///
/// # Errors
/// Returns [`PartialUpdateError`] as described on each variant.
///
/// # Examples
///
/// ```rust
/// use cityinfo_core::{
///     CityId, EntityStore, Lookup, MemoryStore, PatchDocument, PatchOperation,
///     PointOfInterestId, PointsOfInterestRepository, apply_partial_update, seed,
/// };
/// # use cityinfo_core::{NotificationError, NotificationSink};
/// # struct Quiet;
/// # impl NotificationSink for Quiet {
/// #     fn notify(&self, _: &str, _: &str) -> Result<(), NotificationError> { Ok(()) }
/// # }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = MemoryStore::default();
/// seed::seed_catalogue(&mut store)?;
/// let repository = PointsOfInterestRepository::new(store.begin()?, Quiet);
/// let patch = PatchDocument::from(vec![PatchOperation::replace("/name", "Eiffel")]);
///
/// let updated = apply_partial_update(
///     repository,
///     CityId::new(3),
///     PointOfInterestId::new(5),
///     &patch,
/// )?;
/// assert!(matches!(updated, Lookup::Found(ref poi) if poi.name == "Eiffel"));
/// # Ok(())
/// # }
/// ```
pub fn apply_partial_update<U, N>(
    mut repository: PointsOfInterestRepository<U, N>,
    city_id: CityId,
    id: PointOfInterestId,
    document: &PatchDocument,
) -> Result<Lookup<PointOfInterest>, PartialUpdateError<U::Error>>
where
    U: UnitOfWork,
    N: NotificationSink,
{
    let current = match repository.get(city_id, id)? {
        Lookup::Found(poi) => poi,
        missing => return Ok(missing),
    };
    let mut editable = EditablePointOfInterest::from(&current);
    debug!(
        "applying {} patch operation(s) to point of interest {id}",
        document.operations().len()
    );
    document.apply(&mut editable)?;
    let draft = editable.into_draft()?;
    let updated = repository.update(city_id, id, draft)?;
    if !repository.save_changes()? {
        return Err(PartialUpdateError::NotPersisted);
    }
    info!("patched point of interest {id}");
    Ok(updated)
}
