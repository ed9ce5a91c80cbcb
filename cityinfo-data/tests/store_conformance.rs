//! Checks that the SQLite and in-memory stores answer queries identically.

use cityinfo_core::test_support::FailingSink;
use cityinfo_core::{
    CityDraft, CityFilter, CityId, CityQueryService, EntityStore, Lookup, MemoryStore,
    PageRequest, PageSize, PointOfInterestDraft, PointOfInterestId, PointsOfInterestRepository,
    UnitOfWork, seed,
};
use cityinfo_data::SqliteStore;
use rstest::rstest;

fn load<S: EntityStore>(store: &mut S) {
    seed::seed_catalogue(store).expect("seed catalogue");
    let mut unit = store.begin().expect("begin");
    for (name, description) in [
        ("antwerp", Some("lowercase twin")),
        ("Zurich", None),
        ("Antwerp", Some("second Antwerp")),
    ] {
        let id = unit
            .insert_city(&CityDraft::new(name, description.map(str::to_owned)))
            .expect("insert city");
        unit.insert_point_of_interest(id, &PointOfInterestDraft::new("Harbour", None))
            .expect("insert child");
    }
    unit.commit().expect("commit");
}

fn snapshot<S: EntityStore>(store: &mut S) -> Vec<Vec<(i64, String)>> {
    let unit = store.begin().expect("begin");
    let cities = CityQueryService::new(&unit);
    let filters = [
        CityFilter::default(),
        CityFilter::new(Some("ANTWERP"), None),
        CityFilter::new(None, Some("the")),
        CityFilter::new(Some("antwerp"), Some("twin")),
        CityFilter::new(None, Some("nothing matches this")),
    ];
    let mut pages = Vec::new();
    for filter in &filters {
        for page_number in 0..=3 {
            let page = cities
                .list_filtered(filter, PageRequest::new(page_number, PageSize::clamped(2)))
                .expect("list");
            pages.push(
                page.items
                    .into_iter()
                    .map(|city| (city.id.get(), city.name))
                    .collect(),
            );
        }
    }
    pages
}

#[rstest]
fn sqlite_and_memory_agree() {
    let mut memory = MemoryStore::default();
    load(&mut memory);
    let mut sqlite = SqliteStore::open_in_memory().expect("open SQLite store");
    load(&mut sqlite);

    assert_eq!(snapshot(&mut memory), snapshot(&mut sqlite));
}

#[rstest]
fn equal_names_order_by_id() {
    let mut sqlite = SqliteStore::open_in_memory().expect("open SQLite store");
    load(&mut sqlite);
    let unit = sqlite.begin().expect("begin");
    let antwerps: Vec<_> = CityQueryService::new(&unit)
        .list_all()
        .expect("list")
        .into_iter()
        .filter(|city| city.name == "Antwerp")
        .map(|city| city.id.get())
        .collect();
    assert_eq!(antwerps, [2, 6]);
}

#[rstest]
fn repeated_full_updates_are_persisted_identically() {
    let mut sqlite = SqliteStore::open_in_memory().expect("open SQLite store");
    seed::seed_catalogue(&mut sqlite).expect("seed catalogue");
    let mut stored = Vec::new();
    for _ in 0..2 {
        let mut repository =
            PointsOfInterestRepository::new(sqlite.begin().expect("begin"), FailingSink);
        let outcome = repository
            .update(
                CityId::new(1),
                PointOfInterestId::new(1),
                PointOfInterestDraft::new("Same", None),
            )
            .expect("update");
        assert!(outcome.is_found());
        assert!(repository.save_changes().expect("save"));

        let repository =
            PointsOfInterestRepository::new(sqlite.begin().expect("begin"), FailingSink);
        stored.push(
            repository
                .get(CityId::new(1), PointOfInterestId::new(1))
                .expect("get"),
        );
    }
    assert_eq!(stored[0], stored[1]);
    assert!(matches!(&stored[1], Lookup::Found(poi) if poi.name == "Same"));
}
