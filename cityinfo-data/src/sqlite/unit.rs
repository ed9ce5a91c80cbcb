//! Unit of work over a single SQLite transaction.

use cityinfo_core::{
    City, CityDraft, CityFilter, CityId, PageWindow, PointOfInterest, PointOfInterestDraft,
    PointOfInterestId, UnitOfWork,
};
use log::debug;
use rusqlite::{OptionalExtension, Row, Transaction, params};

use super::SqliteStoreError;

// `?1` is the exact name, `?2` the search text; either may be NULL.
const CITY_FILTER: &str = "(?1 IS NULL OR name = ?1 COLLATE NOCASE)
    AND (?2 IS NULL
        OR instr(lower(name), lower(?2)) > 0
        OR (description IS NOT NULL AND instr(lower(description), lower(?2)) > 0))";

/// [`UnitOfWork`] backed by an open SQLite transaction.
///
/// Dropping the unit rolls the transaction back.
#[derive(Debug)]
pub struct SqliteUnitOfWork<'conn> {
    transaction: Transaction<'conn>,
    affected: u64,
}

impl<'conn> SqliteUnitOfWork<'conn> {
    pub(super) const fn new(transaction: Transaction<'conn>) -> Self {
        Self {
            transaction,
            affected: 0,
        }
    }

    fn record(&mut self, changed: usize) {
        self.affected = self
            .affected
            .saturating_add(u64::try_from(changed).unwrap_or(u64::MAX));
    }

    fn write(
        &mut self,
        operation: &'static str,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<usize, SqliteStoreError> {
        let changed = self
            .transaction
            .execute(sql, params)
            .map_err(|source| SqliteStoreError::Statement { operation, source })?;
        self.record(changed);
        Ok(changed)
    }
}

fn city_from_row(row: &Row<'_>) -> rusqlite::Result<City> {
    Ok(City::new(
        CityId::new(row.get(0)?),
        row.get::<_, String>(1)?,
        row.get(2)?,
    ))
}

fn poi_from_row(row: &Row<'_>) -> rusqlite::Result<PointOfInterest> {
    Ok(PointOfInterest {
        id: PointOfInterestId::new(row.get(0)?),
        city_id: CityId::new(row.get(1)?),
        name: row.get(2)?,
        description: row.get(3)?,
    })
}

fn read_error(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> SqliteStoreError {
    move |source| SqliteStoreError::Statement { operation, source }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl UnitOfWork for SqliteUnitOfWork<'_> {
    type Error = SqliteStoreError;

    fn count_cities(&self, filter: &CityFilter) -> Result<u64, Self::Error> {
        let sql = format!("SELECT COUNT(*) FROM cities WHERE {CITY_FILTER}");
        let count: i64 = self
            .transaction
            .query_row(&sql, params![filter.name(), filter.search_query()], |row| {
                row.get(0)
            })
            .map_err(read_error("count cities"))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    fn scan_cities(
        &self,
        filter: &CityFilter,
        window: Option<PageWindow>,
    ) -> Result<Vec<City>, Self::Error> {
        // LIMIT -1 removes the limit.
        let (limit, offset) = window.map_or((-1, 0), |w| {
            (i64::from(w.limit), saturating_i64(w.offset))
        });
        let sql = format!(
            "SELECT id, name, description FROM cities WHERE {CITY_FILTER}
             ORDER BY name COLLATE BINARY, id LIMIT ?3 OFFSET ?4"
        );
        debug!("scanning cities {filter:?} limit {limit} offset {offset}");
        let mut statement = self
            .transaction
            .prepare_cached(&sql)
            .map_err(read_error("prepare city scan"))?;
        let rows = statement
            .query_map(
                params![filter.name(), filter.search_query(), limit, offset],
                city_from_row,
            )
            .map_err(read_error("scan cities"))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(read_error("read city row"))
    }

    fn find_city(&self, id: CityId) -> Result<Option<City>, Self::Error> {
        self.transaction
            .query_row(
                "SELECT id, name, description FROM cities WHERE id = ?1",
                [id.get()],
                city_from_row,
            )
            .optional()
            .map_err(read_error("find city"))
    }

    fn city_exists(&self, id: CityId) -> Result<bool, Self::Error> {
        self.transaction
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM cities WHERE id = ?1)",
                [id.get()],
                |row| row.get(0),
            )
            .map_err(read_error("check city existence"))
    }

    fn points_of_interest_for_city(
        &self,
        city_id: CityId,
    ) -> Result<Vec<PointOfInterest>, Self::Error> {
        let mut statement = self
            .transaction
            .prepare_cached(
                "SELECT id, city_id, name, description FROM points_of_interest
                 WHERE city_id = ?1 ORDER BY id",
            )
            .map_err(read_error("prepare point of interest scan"))?;
        let rows = statement
            .query_map([city_id.get()], poi_from_row)
            .map_err(read_error("scan points of interest"))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(read_error("read point of interest row"))
    }

    fn find_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
    ) -> Result<Option<PointOfInterest>, Self::Error> {
        self.transaction
            .query_row(
                "SELECT id, city_id, name, description FROM points_of_interest
                 WHERE city_id = ?1 AND id = ?2",
                [city_id.get(), id.get()],
                poi_from_row,
            )
            .optional()
            .map_err(read_error("find point of interest"))
    }

    fn insert_point_of_interest(
        &mut self,
        city_id: CityId,
        draft: &PointOfInterestDraft,
    ) -> Result<PointOfInterestId, Self::Error> {
        self.write(
            "insert point of interest",
            "INSERT INTO points_of_interest (city_id, name, description) VALUES (?1, ?2, ?3)",
            params![city_id.get(), draft.name, draft.description],
        )?;
        Ok(PointOfInterestId::new(self.transaction.last_insert_rowid()))
    }

    fn update_point_of_interest(&mut self, poi: &PointOfInterest) -> Result<(), Self::Error> {
        let changed = self.write(
            "update point of interest",
            "UPDATE points_of_interest SET city_id = ?2, name = ?3, description = ?4
             WHERE id = ?1",
            params![poi.id.get(), poi.city_id.get(), poi.name, poi.description],
        )?;
        if changed == 0 {
            return Err(SqliteStoreError::MissingRow {
                table: "points_of_interest",
                id: poi.id.get(),
            });
        }
        Ok(())
    }

    fn delete_point_of_interest(&mut self, id: PointOfInterestId) -> Result<(), Self::Error> {
        let changed = self.write(
            "delete point of interest",
            "DELETE FROM points_of_interest WHERE id = ?1",
            [id.get()],
        )?;
        if changed == 0 {
            return Err(SqliteStoreError::MissingRow {
                table: "points_of_interest",
                id: id.get(),
            });
        }
        Ok(())
    }

    fn insert_city(&mut self, draft: &CityDraft) -> Result<CityId, Self::Error> {
        self.write(
            "insert city",
            "INSERT INTO cities (name, description) VALUES (?1, ?2)",
            params![draft.name, draft.description],
        )?;
        Ok(CityId::new(self.transaction.last_insert_rowid()))
    }

    fn delete_city(&mut self, id: CityId) -> Result<(), Self::Error> {
        let changed = self.write("delete city", "DELETE FROM cities WHERE id = ?1", [id.get()])?;
        if changed == 0 {
            return Err(SqliteStoreError::MissingRow {
                table: "cities",
                id: id.get(),
            });
        }
        Ok(())
    }

    fn commit(self) -> Result<u64, Self::Error> {
        let affected = self.affected;
        self.transaction
            .commit()
            .map_err(|source| SqliteStoreError::Commit { source })?;
        debug!("committed {affected} change(s)");
        Ok(affected)
    }
}
