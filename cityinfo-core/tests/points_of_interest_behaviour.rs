//! Behavioural tests for `PointsOfInterestRepository` using rstest-bdd.

use std::cell::RefCell;

use cityinfo_core::{
    CityFilter, CityId, EntityStore, Lookup, MemoryStore, NotificationError, NotificationSink,
    PointOfInterest, PointOfInterestDraft, PointOfInterestId, PointsOfInterestRepository,
    UnitOfWork, seed,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug, Default)]
struct Outbox {
    sent: RefCell<Vec<(String, String)>>,
}

impl NotificationSink for Outbox {
    fn notify(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        self.sent
            .borrow_mut()
            .push((subject.to_owned(), body.to_owned()));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct PoiWorld {
    store: RefCell<MemoryStore>,
    outbox: Outbox,
    outcomes: RefCell<Vec<Lookup<PointOfInterest>>>,
    submitted: RefCell<Option<(CityId, PointOfInterestDraft)>>,
}

#[fixture]
fn world() -> PoiWorld {
    PoiWorld::default()
}

fn unquote(text: &str) -> String {
    text.trim_matches('"').to_owned()
}

#[given("the seeded city catalogue")]
fn given_seeded(world: &PoiWorld) {
    seed::seed_catalogue(&mut *world.store.borrow_mut()).expect("seed catalogue");
}

#[when("I delete point of interest {poi} of city {city} and save")]
fn when_delete(world: &PoiWorld, poi: i64, city: i64) {
    let mut store = world.store.borrow_mut();
    let mut repository =
        PointsOfInterestRepository::new(store.begin().expect("begin"), &world.outbox);
    let outcome = repository
        .delete(CityId::new(city), PointOfInterestId::new(poi))
        .expect("delete");
    assert!(outcome.is_found());
    assert!(repository.save_changes().expect("save"));
}

#[when("I create, update and delete point of interest {poi} under city {city}")]
fn when_gated(world: &PoiWorld, poi: i64, city: i64) {
    let mut store = world.store.borrow_mut();
    let mut repository =
        PointsOfInterestRepository::new(store.begin().expect("begin"), &world.outbox);
    let city_id = CityId::new(city);
    let id = PointOfInterestId::new(poi);
    let draft = PointOfInterestDraft::new("Ghost", None);
    let outcomes = vec![
        repository.create(city_id, draft.clone()).expect("create"),
        repository.get(city_id, id).expect("get"),
        repository.update(city_id, id, draft).expect("update"),
        repository.delete(city_id, id).expect("delete"),
    ];
    assert!(!repository.save_changes().expect("save"));
    world.outcomes.replace(outcomes);
}

#[when("I create {name} described as {description} in city {city} and save")]
fn when_create(world: &PoiWorld, name: String, description: String, city: i64) {
    let mut store = world.store.borrow_mut();
    let mut repository =
        PointsOfInterestRepository::new(store.begin().expect("begin"), &world.outbox);
    let city_id = CityId::new(city);
    let draft = PointOfInterestDraft::new(unquote(&name), Some(unquote(&description)));
    let created = repository
        .create(city_id, draft.clone())
        .expect("create");
    assert!(repository.save_changes().expect("save"));
    world.outcomes.replace(vec![created]);
    world.submitted.replace(Some((city_id, draft)));
}

#[then("exactly one notification was sent")]
fn then_one_notification(world: &PoiWorld) {
    assert_eq!(world.outbox.sent.borrow().len(), 1);
}

#[then("the notification mentions {name} and {id}")]
fn then_mentions(world: &PoiWorld, name: String, id: String) {
    let sent = world.outbox.sent.borrow();
    let (_, body) = sent.first().expect("a notification was sent");
    assert!(body.contains(&unquote(&name)));
    assert!(body.contains(&unquote(&id)));
}

#[then("every operation reports the city as missing")]
fn then_city_missing(world: &PoiWorld) {
    let outcomes = world.outcomes.borrow();
    assert_eq!(outcomes.len(), 4);
    assert!(outcomes.iter().all(|o| *o == Lookup::CityNotFound));
}

#[then("the store still holds {count} points of interest")]
fn then_count(world: &PoiWorld, count: usize) {
    let mut store = world.store.borrow_mut();
    let unit = store.begin().expect("begin");
    let total: usize = unit
        .scan_cities(&CityFilter::default(), None)
        .expect("scan")
        .iter()
        .map(|city| {
            unit.points_of_interest_for_city(city.id)
                .expect("children")
                .len()
        })
        .sum();
    assert_eq!(total, count);
}

#[then("reading it back returns the submitted fields")]
fn then_round_trip(world: &PoiWorld) {
    let created = world
        .outcomes
        .borrow()
        .first()
        .cloned()
        .and_then(Lookup::found)
        .expect("creation succeeded");
    let (city_id, draft) = world.submitted.borrow().clone().expect("submitted draft");
    let mut store = world.store.borrow_mut();
    let repository = PointsOfInterestRepository::new(store.begin().expect("begin"), &world.outbox);
    let fetched = repository
        .get(city_id, created.id)
        .expect("get")
        .found()
        .expect("created point of interest exists");
    assert_eq!(fetched.city_id, city_id);
    assert_eq!(fetched.name, draft.name);
    assert_eq!(fetched.description, draft.description);
}

#[scenario(path = "tests/features/points_of_interest.feature", index = 0)]
fn delete_notifies(world: PoiWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/points_of_interest.feature", index = 1)]
fn unknown_city_gates(world: PoiWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/points_of_interest.feature", index = 2)]
fn create_round_trip(world: PoiWorld) {
    let _ = world;
}
