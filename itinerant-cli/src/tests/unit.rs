//! Focused unit tests covering plan configuration and execution.

use super::helpers::{Workspace, day_count, write_utf8};
use crate::plan::{PlanArgs, PlanConfig, config_from_layers_for_test, load_json, run_plan_with};
use crate::{
    ARG_PLAN_CANDIDATES, ARG_PLAN_PLANNER_CONFIG, ARG_PLAN_REQUEST, CliError, ENV_PLAN_CANDIDATES,
    ENV_PLAN_REQUEST,
};
use camino::Utf8PathBuf;
use itinerant_core::{PlanError, PlanRequest};
use rstest::rstest;

#[rstest]
#[case(None, Some("pool.json"), ARG_PLAN_REQUEST, ENV_PLAN_REQUEST)]
#[case(Some("request.json"), None, ARG_PLAN_CANDIDATES, ENV_PLAN_CANDIDATES)]
fn converting_without_required_fields_errors(
    #[case] request: Option<&str>,
    #[case] candidates: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = PlanArgs {
        request_path: request.map(Utf8PathBuf::from),
        candidates: candidates.map(Utf8PathBuf::from),
        ..PlanArgs::default()
    };
    let err = PlanConfig::try_from(args).expect_err("missing field should error");
    assert!(
        matches!(err, CliError::MissingArgument { field: f, env } if f == field && env == env_var),
        "unexpected error {err:?}"
    );
}

#[rstest]
#[case::request(ARG_PLAN_REQUEST)]
#[case::candidates(ARG_PLAN_CANDIDATES)]
#[case::planner_config(ARG_PLAN_PLANNER_CONFIG)]
fn validate_sources_reports_missing_files(#[case] missing: &'static str) {
    let workspace = Workspace::new();
    let mut config = PlanConfig {
        request_path: workspace.write_request(1),
        candidates: workspace.write_candidates(4),
        output: None,
        planner_config: None,
        seed: None,
    };
    let absent = workspace.path("absent.json");
    match missing {
        ARG_PLAN_REQUEST => config.request_path = absent,
        ARG_PLAN_CANDIDATES => config.candidates = absent,
        _ => config.planner_config = Some(absent),
    }
    let err = config.validate_sources().expect_err("expected failure");
    assert!(
        matches!(err, CliError::MissingSourceFile { field, .. } if field == missing),
        "unexpected error {err:?}"
    );
}

#[rstest]
fn validate_sources_rejects_directories() {
    let workspace = Workspace::new();
    let request_path = workspace.path("request.json");
    std::fs::create_dir(&request_path).expect("request directory");
    let config = PlanConfig {
        request_path: request_path.clone(),
        candidates: workspace.write_candidates(4),
        output: None,
        planner_config: None,
        seed: None,
    };
    let err = config.validate_sources().expect_err("directory should fail");
    assert!(
        matches!(&err, CliError::SourcePathNotFile { field, path } if *field == ARG_PLAN_REQUEST && *path == request_path),
        "unexpected error {err:?}"
    );
}

#[rstest]
fn load_json_reports_the_offending_input() {
    let workspace = Workspace::new();
    let path = workspace.path("request.json");
    write_utf8(&path, b"{ not valid json");
    let err = load_json::<PlanRequest>(&path, ARG_PLAN_REQUEST).expect_err("invalid json");
    assert!(
        matches!(&err, CliError::ParseInput { field, path: p, .. } if *field == ARG_PLAN_REQUEST && *p == path),
        "unexpected error {err:?}"
    );
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "request_path": 42 }));

    let err = config_from_layers_for_test(composer.layers()).expect_err("invalid layer");
    assert!(matches!(err, CliError::Configuration(_)), "unexpected error {err:?}");
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let workspace = Workspace::new();
    let env_request = workspace.path("from-env.json");
    let file_pool = workspace.path("from-file-pool.json");
    let cli_pool = workspace.path("from-cli-pool.json");

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({ "candidates": file_pool.as_str(), "seed": 5 }),
        None,
    );
    composer.push_environment(json!({ "request_path": env_request.as_str() }));
    composer.push_cli(json!({ "candidates": cli_pool.as_str() }));

    let config = config_from_layers_for_test(composer.layers()).expect("merged config");
    assert_eq!(config.request_path, env_request);
    assert_eq!(config.candidates, cli_pool);
    assert_eq!(config.seed, Some(5));
    assert_eq!(config.output, None);
}

#[rstest]
fn plan_prints_the_itinerary() {
    let workspace = Workspace::new();
    let args = PlanArgs {
        request_path: Some(workspace.write_request(2)),
        candidates: Some(workspace.write_candidates(10)),
        ..PlanArgs::default()
    };
    let mut stdout = Vec::new();
    run_plan_with(args, &mut stdout).expect("plan succeeds");
    let printed = String::from_utf8(stdout).expect("utf-8 output");
    assert_eq!(day_count(&printed), 2);
}

#[rstest]
fn plan_writes_the_itinerary_to_the_output_path() {
    let workspace = Workspace::new();
    let output = workspace.path("out/itinerary.json");
    let args = PlanArgs {
        request_path: Some(workspace.write_request(3)),
        candidates: Some(workspace.write_candidates(12)),
        output: Some(output.clone()),
        ..PlanArgs::default()
    };
    let mut stdout = Vec::new();
    run_plan_with(args, &mut stdout).expect("plan succeeds");
    assert!(stdout.is_empty());
    let written = std::fs::read_to_string(output.as_std_path()).expect("output written");
    assert_eq!(day_count(&written), 3);
}

#[rstest]
fn planner_config_file_overrides_tunables() {
    let workspace = Workspace::new();
    let tunables = workspace.path("planner.json");
    write_utf8(
        &tunables,
        br#"{ "target_places_per_day": 2, "max_places_per_day": 3 }"#,
    );
    let args = PlanArgs {
        request_path: Some(workspace.write_request(1)),
        candidates: Some(workspace.write_candidates(10)),
        planner_config: Some(tunables),
        ..PlanArgs::default()
    };
    let mut stdout = Vec::new();
    run_plan_with(args, &mut stdout).expect("plan succeeds");
    let value: serde_json::Value = serde_json::from_slice(&stdout).expect("itinerary JSON");
    let total = value.get("total_places").and_then(serde_json::Value::as_u64);
    assert_eq!(total, Some(2));
}

#[rstest]
fn empty_pool_without_anchors_is_a_planning_error() {
    let workspace = Workspace::new();
    let args = PlanArgs {
        request_path: Some(workspace.write_request(1)),
        candidates: Some(workspace.write_candidates(0)),
        ..PlanArgs::default()
    };
    let err = run_plan_with(args, &mut Vec::new()).expect_err("empty pool");
    assert!(
        matches!(err, CliError::Plan(PlanError::NoPlacesAvailable { .. })),
        "unexpected error {err:?}"
    );
}
