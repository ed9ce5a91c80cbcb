//! Behavioural tests for `CityQueryService` using rstest-bdd.

use std::cell::RefCell;

use cityinfo_core::{
    City, CityDraft, CityFilter, CityId, CityQueryService, EntityStore, MemoryStore, Page,
    PageRequest, PageSize, UnitOfWork, seed,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug, Default)]
struct CityWorld {
    store: RefCell<MemoryStore>,
    page: RefCell<Option<Page<City>>>,
    city: RefCell<Option<City>>,
}

#[fixture]
fn world() -> CityWorld {
    CityWorld::default()
}

fn unquote(text: &str) -> &str {
    text.trim_matches('"')
}

fn list(world: &CityWorld, filter: &CityFilter, page: i64, size: u32) {
    let mut store = world.store.borrow_mut();
    let unit = store.begin().expect("begin unit of work");
    let result = CityQueryService::new(&unit)
        .list_filtered(filter, PageRequest::new(page, PageSize::clamped(size)))
        .expect("list cities");
    world.page.replace(Some(result));
}

fn fetch(world: &CityWorld, id: i64, include_children: bool) {
    let mut store = world.store.borrow_mut();
    let unit = store.begin().expect("begin unit of work");
    let city = CityQueryService::new(&unit)
        .get(CityId::new(id), include_children)
        .expect("read city");
    world.city.replace(city);
}

fn assert_metadata(world: &CityWorld, items: u64, pages: u64) {
    let page = world.page.borrow();
    let metadata = page.as_ref().expect("a page was listed").metadata;
    assert_eq!(metadata.total_item_count, items);
    assert_eq!(metadata.total_page_count, pages);
}

#[given("a store containing Paris with a big tower and Antwerp with a cathedral")]
fn given_two_cities(world: &CityWorld) {
    let mut store = world.store.borrow_mut();
    let mut unit = store.begin().expect("begin unit of work");
    unit.insert_city(&CityDraft::new("Paris", Some("big tower".into())))
        .expect("insert Paris");
    unit.insert_city(&CityDraft::new("Antwerp", Some("cathedral".into())))
        .expect("insert Antwerp");
    unit.commit().expect("commit");
}

#[given("the seeded city catalogue")]
fn given_seeded(world: &CityWorld) {
    seed::seed_catalogue(&mut *world.store.borrow_mut()).expect("seed catalogue");
}

#[when("I list cities matching the search {query} on page {page} of size {size}")]
fn when_search(world: &CityWorld, query: String, page: i64, size: u32) {
    list(world, &CityFilter::new(None, Some(unquote(&query))), page, size);
}

#[when("I list cities on page {page} of size {size}")]
fn when_list(world: &CityWorld, page: i64, size: u32) {
    list(world, &CityFilter::default(), page, size);
}

#[when("I fetch city {id} without its points of interest")]
fn when_fetch_bare(world: &CityWorld, id: i64) {
    fetch(world, id, false);
}

#[when("I fetch city {id} with its points of interest")]
fn when_fetch_loaded(world: &CityWorld, id: i64) {
    fetch(world, id, true);
}

#[then("the page contains only {name}")]
fn then_only(world: &CityWorld, name: String) {
    let page = world.page.borrow();
    let names: Vec<_> = page
        .as_ref()
        .expect("a page was listed")
        .items
        .iter()
        .map(|city| city.name.as_str())
        .collect();
    assert_eq!(names, [unquote(&name)]);
}

#[then("the page is empty")]
fn then_empty(world: &CityWorld) {
    let page = world.page.borrow();
    assert!(page.as_ref().expect("a page was listed").items.is_empty());
}

#[then("the metadata reports {items} item over {pages} page")]
fn then_single(world: &CityWorld, items: u64, pages: u64) {
    assert_metadata(world, items, pages);
}

#[then("the metadata reports {items} items over {pages} pages")]
fn then_plural(world: &CityWorld, items: u64, pages: u64) {
    assert_metadata(world, items, pages);
}

#[then("the points of interest were not loaded")]
fn then_not_loaded(world: &CityWorld) {
    let city = world.city.borrow();
    let city = city.as_ref().expect("city exists");
    assert!(city.points_of_interest.is_none());
}

#[then("the city has {count} loaded points of interest")]
fn then_loaded(world: &CityWorld, count: usize) {
    let city = world.city.borrow();
    let loaded = city
        .as_ref()
        .and_then(|c| c.points_of_interest.as_ref())
        .expect("children were loaded");
    assert_eq!(loaded.len(), count);
}

#[scenario(path = "tests/features/city_queries.feature", index = 0)]
fn search_by_description(world: CityWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/city_queries.feature", index = 1)]
fn page_past_the_end(world: CityWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/city_queries.feature", index = 2)]
fn children_on_request(world: CityWorld) {
    let _ = world;
}
