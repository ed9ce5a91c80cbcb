//! Focused unit tests covering command configuration and document loading.

use super::helpers::{Workspace, initialise, write_utf8};
use super::*;
use crate::cities::{
    CitiesArgs, CitiesConfig, CityArgs, CityConfig, cities_config_from_layers_for_test,
};
use crate::points::{
    CreatePoiArgs, DeletePoiArgs, DeletePoiConfig, PatchPoiArgs, PatchPoiConfig, PoisArgs,
    UpdatePoiArgs, UpdatePoiConfig, load_patch_document,
};
use camino::Utf8PathBuf;
use cityinfo_core::{CityFilter, PageRequest, PageSize};
use rstest::rstest;

#[rstest]
fn converting_city_without_id_errors() {
    let err = CityConfig::try_from(CityArgs::default()).expect_err("missing id should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_CITY_ID);
            assert_eq!(env, ENV_CITY_CITY_ID);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case(None, Some(1), Some("patch.json"), ARG_CITY_ID, ENV_PATCH_CITY_ID)]
#[case(Some(1), None, Some("patch.json"), ARG_POI_ID, ENV_PATCH_POI_ID)]
#[case(Some(1), Some(1), None, ARG_PATCH_DOCUMENT, ENV_PATCH_DOCUMENT)]
fn converting_patch_without_required_fields_errors(
    #[case] city_id: Option<i64>,
    #[case] poi_id: Option<i64>,
    #[case] document: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = PatchPoiArgs {
        city_id,
        poi_id,
        document: document.map(Utf8PathBuf::from),
        ..PatchPoiArgs::default()
    };
    let err = PatchPoiConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn delete_requires_mail_addresses() {
    let args = DeletePoiArgs {
        city_id: Some(2),
        poi_id: Some(3),
        mail_from: Some("noreply@cityinfo.test".to_owned()),
        ..DeletePoiArgs::default()
    };
    let err = DeletePoiConfig::try_from(args).expect_err("missing recipient");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_MAIL_TO);
            assert_eq!(env, ENV_MAIL_TO);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn cities_config_applies_defaults_and_clamps() {
    let config = CitiesConfig::from(CitiesArgs {
        page_size: Some(50),
        search: Some("  ".to_owned()),
        ..CitiesArgs::default()
    });
    assert_eq!(config.database, Utf8PathBuf::from("cityinfo.db"));
    assert_eq!(config.filter, CityFilter::default());
    assert_eq!(config.page, PageRequest::new(1, PageSize::clamped(20)));
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "page_size": "many" }));

    let err = cities_config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({ "search": "tower", "page_size": 5, "database": "from-file.db" }),
        None,
    );
    composer.push_environment(json!({ "page_size": 2, "database": "from-env.db" }));
    composer.push_cli(json!({ "database": "from-cli.db" }));

    let config =
        cities_config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.database, Utf8PathBuf::from("from-cli.db"));
    assert_eq!(config.filter.search_query(), Some("tower"));
    assert_eq!(config.page.page_size.get(), 2);
}

#[rstest]
fn load_patch_document_reports_missing_and_invalid_files() {
    let workspace = Workspace::new();
    let missing = workspace.path("missing.json");
    match load_patch_document(&missing).expect_err("missing document") {
        CliError::OpenPatchDocument { path, .. } => assert_eq!(path, missing),
        other => panic!("expected OpenPatchDocument, found {other:?}"),
    }

    let invalid = workspace.path("invalid.json");
    write_utf8(&invalid, br#"[{"op": "explode", "path": "/name"}]"#);
    match load_patch_document(&invalid).expect_err("unknown operation") {
        CliError::ParsePatchDocument { path, .. } => assert_eq!(path, invalid),
        other => panic!("expected ParsePatchDocument, found {other:?}"),
    }
}

#[rstest]
fn init_seeds_only_once() {
    let workspace = Workspace::new();
    let database = workspace.database();
    initialise(&database);

    let mut stdout = Vec::new();
    init::run_init_with(
        init::InitArgs {
            database: Some(database),
        },
        &mut stdout,
    )
    .expect("second init");
    let report: serde_json::Value = serde_json::from_slice(&stdout).expect("json output");
    assert_eq!(report["seeded"], false);
}

#[rstest]
fn city_reports_missing_ids() {
    let workspace = Workspace::new();
    let database = workspace.database();
    initialise(&database);

    let mut stdout = Vec::new();
    let err = cities::run_city_with(
        CityArgs {
            database: Some(database),
            city_id: Some(42),
            include_points_of_interest: false,
        },
        &mut stdout,
    )
    .expect_err("unknown city");
    assert!(matches!(err, CliError::NotFound { entity: "city", id: 42 }));
    assert!(stdout.is_empty());
}

#[rstest]
fn converting_update_without_poi_id_errors() {
    let args = UpdatePoiArgs {
        city_id: Some(3),
        name: Some("Louvre".to_owned()),
        ..UpdatePoiArgs::default()
    };
    match UpdatePoiConfig::try_from(args).expect_err("missing poi id") {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_POI_ID);
            assert_eq!(env, ENV_UPDATE_POI_ID);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn create_without_name_reports_validation_errors() {
    let workspace = Workspace::new();
    let database = workspace.database();
    initialise(&database);

    let mut stdout = Vec::new();
    let err = points::run_create_poi_with(
        CreatePoiArgs {
            database: Some(database),
            city_id: Some(2),
            ..CreatePoiArgs::default()
        },
        &mut stdout,
    )
    .expect_err("name is required");
    match err {
        CliError::Validation(errors) => {
            assert!(errors.contains(cityinfo_core::Field::Name));
        }
        other => panic!("expected Validation, found {other:?}"),
    }
}

#[rstest]
fn pois_lists_children_of_existing_cities() {
    let workspace = Workspace::new();
    let database = workspace.database();
    initialise(&database);

    let mut stdout = Vec::new();
    points::run_pois_with(
        PoisArgs {
            database: Some(database),
            city_id: Some(3),
        },
        &mut stdout,
    )
    .expect("list points of interest");
    let listed: serde_json::Value = serde_json::from_slice(&stdout).expect("json output");
    let names: Vec<_> = listed
        .as_array()
        .expect("array output")
        .iter()
        .filter_map(|poi| poi["name"].as_str())
        .collect();
    assert_eq!(names, ["Eiffel Tower", "The Louvre"]);
}
