//! Points-of-interest repository.
//!
//! Every operation checks that the owning city exists before it touches the
//! child collection. The check and the child operation run inside the same
//! [`UnitOfWork`], so no other writer can remove the city in between.

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    CityId, Notification, NotificationSink, PointOfInterest, PointOfInterestDraft,
    PointOfInterestId, UnitOfWork, ValidationErrors,
};

/// Subject used for deletion notifications.
pub const DELETED_SUBJECT: &str = "Point of interest deleted";

/// Outcome of a lookup scoped to a parent city.
///
/// Absence is a value, not an error. The parent and child cases stay
/// distinct so callers can report which one was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The owning city does not exist.
    CityNotFound,
    /// The city exists but does not own the requested point of interest.
    PointOfInterestNotFound,
    /// The requested value.
    Found(T),
}

impl<T> Lookup<T> {
    /// The found value, if any.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::CityNotFound | Self::PointOfInterestNotFound => None,
        }
    }

    /// Whether a value was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Transform the found value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::CityNotFound => Lookup::CityNotFound,
            Self::PointOfInterestNotFound => Lookup::PointOfInterestNotFound,
        }
    }
}

/// Failures surfaced by repositories.
#[derive(Debug, Error)]
pub enum RepositoryError<E> {
    /// The entity store failed.
    #[error("entity store failed")]
    Store(#[source] E),
    /// The payload broke one or more field constraints.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

/// Existence-gated access to the points of interest owned by a city.
///
/// The repository owns its unit of work. Writes are staged until
/// [`save_changes`](Self::save_changes) commits them; dropping the
/// repository discards them along with any queued notifications.
///
/// # Examples
///
/// ```rust
/// use cityinfo_core::{
///     CityId, EntityStore, Lookup, MemoryStore, PointOfInterestDraft, PointsOfInterestRepository,
///     seed,
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
///
/// let mut repository = PointsOfInterestRepository::new(store.begin()?, Quiet);
/// let draft = PointOfInterestDraft::new("Rubens House", None);
/// let Lookup::Found(created) = repository.create(CityId::new(2), draft)? else {
///     panic!("Antwerp is seeded");
/// };
/// assert!(repository.save_changes()?);
///
/// let repository = PointsOfInterestRepository::new(store.begin()?, Quiet);
/// let fetched = repository.get(CityId::new(2), created.id)?.found();
/// assert_eq!(fetched, Some(created));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PointsOfInterestRepository<U, N> {
    unit: U,
    sink: N,
    pending: Vec<Notification>,
}

impl<U, N> PointsOfInterestRepository<U, N>
where
    U: UnitOfWork,
    N: NotificationSink,
{
    /// Wrap a unit of work and the sink used for deletion notices.
    pub const fn new(unit: U, sink: N) -> Self {
        Self {
            unit,
            sink,
            pending: Vec::new(),
        }
    }

    /// Unit of work backing this repository, for reads in the same request.
    pub const fn unit(&self) -> &U {
        &self.unit
    }

    fn city_exists(&self, city_id: CityId) -> Result<bool, RepositoryError<U::Error>> {
        self.unit
            .city_exists(city_id)
            .map_err(RepositoryError::Store)
    }

    /// All points of interest owned by `city_id`.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Store`] on store failure.
    pub fn list_for_city(
        &self,
        city_id: CityId,
    ) -> Result<Lookup<Vec<PointOfInterest>>, RepositoryError<U::Error>> {
        if !self.city_exists(city_id)? {
            debug!("city {city_id} not found while listing points of interest");
            return Ok(Lookup::CityNotFound);
        }
        self.unit
            .points_of_interest_for_city(city_id)
            .map(Lookup::Found)
            .map_err(RepositoryError::Store)
    }

    /// One point of interest owned by `city_id`.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Store`] on store failure.
    pub fn get(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
    ) -> Result<Lookup<PointOfInterest>, RepositoryError<U::Error>> {
        if !self.city_exists(city_id)? {
            return Ok(Lookup::CityNotFound);
        }
        let found = self
            .unit
            .find_point_of_interest(city_id, id)
            .map_err(RepositoryError::Store)?;
        Ok(found.map_or(Lookup::PointOfInterestNotFound, Lookup::Found))
    }

    /// Stage a new point of interest under `city_id`.
    ///
    /// The identifier is assigned by the store. The draft is validated after
    /// the existence gate, so an unknown city wins over an invalid payload.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Validation`] for an invalid draft and
    /// [`RepositoryError::Store`] on store failure.
    pub fn create(
        &mut self,
        city_id: CityId,
        draft: PointOfInterestDraft,
    ) -> Result<Lookup<PointOfInterest>, RepositoryError<U::Error>> {
        if !self.city_exists(city_id)? {
            return Ok(Lookup::CityNotFound);
        }
        draft.validate()?;
        let id = self
            .unit
            .insert_point_of_interest(city_id, &draft)
            .map_err(RepositoryError::Store)?;
        info!("staged point of interest {id} for city {city_id}");
        Ok(Lookup::Found(PointOfInterest {
            id,
            city_id,
            name: draft.name,
            description: draft.description,
        }))
    }

    /// Stage a full replacement of every mutable field.
    ///
    /// Fields absent from `draft` are cleared, not preserved.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Validation`] for an invalid draft and
    /// [`RepositoryError::Store`] on store failure.
    pub fn update(
        &mut self,
        city_id: CityId,
        id: PointOfInterestId,
        draft: PointOfInterestDraft,
    ) -> Result<Lookup<PointOfInterest>, RepositoryError<U::Error>> {
        let mut poi = match self.get(city_id, id)? {
            Lookup::Found(poi) => poi,
            missing => return Ok(missing),
        };
        draft.validate()?;
        poi.overwrite(draft);
        self.unit
            .update_point_of_interest(&poi)
            .map_err(RepositoryError::Store)?;
        info!("staged update of point of interest {id}");
        Ok(Lookup::Found(poi))
    }

    /// Stage removal of a point of interest and queue its notification.
    ///
    /// The notification is sent only after [`save_changes`](Self::save_changes)
    /// commits.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Store`] on store failure.
    pub fn delete(
        &mut self,
        city_id: CityId,
        id: PointOfInterestId,
    ) -> Result<Lookup<PointOfInterest>, RepositoryError<U::Error>> {
        let poi = match self.get(city_id, id)? {
            Lookup::Found(poi) => poi,
            missing => return Ok(missing),
        };
        self.unit
            .delete_point_of_interest(id)
            .map_err(RepositoryError::Store)?;
        self.pending.push(Notification::new(
            DELETED_SUBJECT,
            format!(
                "Point of interest {} with id {} was deleted.",
                poi.name, poi.id
            ),
        ));
        info!("staged removal of point of interest {id}");
        Ok(Lookup::Found(poi))
    }

    /// Commit every staged write.
    ///
    /// Returns `false` when the store reports that nothing was persisted.
    /// Queued notifications are dispatched only after a commit that
    /// persisted something; sink failures are logged and discarded.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Store`] when the commit fails.
    pub fn save_changes(self) -> Result<bool, RepositoryError<U::Error>> {
        let Self {
            unit,
            sink,
            pending,
        } = self;
        let affected = unit.commit().map_err(RepositoryError::Store)?;
        if affected == 0 {
            debug!("commit persisted nothing");
            return Ok(false);
        }
        for notification in pending {
            if let Err(err) = sink.notify(&notification.subject, &notification.body) {
                warn!("dropping notification '{}': {err}", notification.subject);
            }
        }
        Ok(true)
    }
}
