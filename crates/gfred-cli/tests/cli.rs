//! End-to-end tests for the `gfred` commands on file-backed missions.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use gfred_cli::cli::{Cli, Command, MissionArgs, OutputFormatArg, ValidateArgs};
use gfred_cli::commands::{JsonReport, build_engine, compute_layout, run_validate, validate_mission};
use gfred_cli::config::GfredConfig;
use gfred_validate::Phase;
use tempfile::TempDir;

const BROKEN_MISSION: &str = r#"{
  "name": "Broken",
  "objects": [
    {"id": "alpha-1", "name": "Alpha 1", "kind": "ship", "ship_class": "GTF Ulysses"},
    {"id": "alpha-2", "name": "Alpha 2", "kind": "ship", "ship_class": "GTF Ulysses"},
    {"id": "alpha-3", "name": "Alpha 3", "kind": "ship", "ship_class": "GTF Hercules"}
  ],
  "events": [
    {"name": "Arrival", "condition": "(+ 1"}
  ]
}"#;

struct Fixture {
    dir: TempDir,
    mission: PathBuf,
    assets: PathBuf,
}

impl Fixture {
    fn new(mission: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let mission_path = dir.path().join("mission.json");
        fs::write(&mission_path, mission).unwrap();
        let assets = dir.path().join("assets.json");
        fs::write(&assets, r#"["GTF Ulysses", "GTB Medusa"]"#).unwrap();
        Self {
            dir,
            mission: mission_path,
            assets,
        }
    }

    fn args(&self) -> MissionArgs {
        MissionArgs {
            mission: self.mission.clone(),
            assets: Some(self.assets.clone()),
            asset_dir: None,
            asset_ext: Vec::new(),
            budget_ms: None,
            strict_operators: false,
            no_expressions: false,
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("gfred").chain(args.iter().copied()))
}

#[test]
fn test_validate_reports_missing_class_and_bad_expression() {
    let fixture = Fixture::new(BROKEN_MISSION);
    let (engine, report) =
        validate_mission(&fixture.args(), &GfredConfig::default(), false).unwrap();

    assert!(!report.is_valid());
    assert_eq!(report.completed_phases, Phase::all());
    insta::assert_snapshot!(report.all_errors().join("\n"), @r"
    event:Arrival: Event 'Arrival' condition: missing closing parenthesis at offset 4
    object:alpha-3: Ship class 'GTF Hercules' not found
    ");

    assert_eq!(engine.get_dependents("GTF Ulysses"), vec!["object:alpha-1", "object:alpha-2"]);
}

#[test]
fn test_json_report_written_to_file() {
    let fixture = Fixture::new(BROKEN_MISSION);
    let output = fixture.path("report.json");
    let args = ValidateArgs {
        mission: fixture.args(),
        format: OutputFormatArg::Json,
        output: Some(output.clone()),
        no_fail: false,
    };

    let report = run_validate(&args, &GfredConfig::default()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();

    assert_eq!(json["valid"], false);
    assert_eq!(json["errors"], report.total_errors());
    assert_eq!(json["report"]["mission"], "Broken");
    assert!(json["generated_at"].as_str().is_some());
    assert!(json["generator"].as_str().unwrap().starts_with("gfred "));

    let broken: Vec<&str> = json["dependencies"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|dep| dep["is_valid"] == false)
        .map(|dep| dep["dependency_path"].as_str().unwrap())
        .collect();
    assert_eq!(broken.len(), 2);
    assert!(broken.contains(&"GTF Hercules"));
}

#[test]
fn test_json_report_lists_dependencies_by_path() {
    let fixture = Fixture::new(BROKEN_MISSION);
    let (engine, report) =
        validate_mission(&fixture.args(), &GfredConfig::default(), false).unwrap();
    let json = serde_json::to_value(JsonReport::new(&report, engine.dependency_graph())).unwrap();

    let paths: Vec<&str> = json["dependencies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|dep| dep["dependency_path"].as_str().unwrap())
        .collect();
    let mut sorted = paths.clone();
    sorted.sort_unstable();
    assert_eq!(paths, sorted);
}

#[test]
fn test_without_asset_flags_assets_are_unchecked() {
    let fixture = Fixture::new(BROKEN_MISSION);
    let args = MissionArgs {
        assets: None,
        ..fixture.args()
    };
    let (_, report) = validate_mission(&args, &GfredConfig::default(), false).unwrap();

    assert!(report.entity("object:alpha-3").unwrap().is_valid());
    assert!(
        report
            .mission_result
            .warnings
            .iter()
            .any(|w| w.starts_with("Asset validation unavailable"))
    );
}

#[test]
fn test_asset_directory_with_extension() {
    let fixture = Fixture::new(BROKEN_MISSION);
    let ships = fixture.path("ships");
    fs::create_dir(&ships).unwrap();
    fs::write(ships.join("GTF Ulysses.pof"), b"").unwrap();
    fs::write(ships.join("GTF Hercules.pof"), b"").unwrap();
    let args = MissionArgs {
        assets: None,
        asset_dir: Some(ships),
        asset_ext: vec!["pof".to_string()],
        ..fixture.args()
    };

    let (_, report) = validate_mission(&args, &GfredConfig::default(), false).unwrap();
    assert!(report.entity("object:alpha-3").unwrap().is_valid());
}

#[test]
fn test_budget_override_beats_config_file() {
    let fixture = Fixture::new(BROKEN_MISSION);
    let args = MissionArgs {
        budget_ms: Some(25),
        ..fixture.args()
    };
    let engine = build_engine(&args, &GfredConfig::default()).unwrap();
    assert_eq!(engine.config().max_validation_time_ms, 25);
}

#[test]
fn test_missing_mission_file() {
    let fixture = Fixture::new(BROKEN_MISSION);
    let args = MissionArgs {
        mission: fixture.path("absent.json"),
        ..fixture.args()
    };
    let err = validate_mission(&args, &GfredConfig::default(), false).unwrap_err();
    assert!(format!("{err:#}").contains("cannot load mission"));
}

#[test]
fn test_unreadable_asset_catalog() {
    let fixture = Fixture::new(BROKEN_MISSION);
    fs::write(&fixture.assets, "{not json").unwrap();
    let err = build_engine(&fixture.args(), &GfredConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to load asset catalog"));
}

#[test]
fn test_layout_places_every_graph_node() {
    let fixture = Fixture::new(BROKEN_MISSION);
    let (engine, _) = validate_mission(&fixture.args(), &GfredConfig::default(), false).unwrap();
    let snapshot = engine.dependency_graph().snapshot();

    let output = compute_layout(engine.dependency_graph(), GfredConfig::default().layout).unwrap();

    assert_eq!(output.positions.len(), snapshot.nodes.len());
    assert_eq!(output.edges, snapshot.edges);
    assert!(output.positions.values().all(|p| p.is_finite()));
    assert!(output.bounds.is_some());
}

#[test]
fn test_config_file_loading() {
    let fixture = Fixture::new(BROKEN_MISSION);
    let path = fixture.path("gfred.toml");
    fs::write(&path, "[validation]\nmax_validation_time_ms = 750\n").unwrap();

    let config = GfredConfig::load(Some(&path)).unwrap();
    assert_eq!(config.validation.max_validation_time_ms, 750);

    let missing = GfredConfig::load(Some(Path::new("/nonexistent/gfred.toml"))).unwrap_err();
    assert!(format!("{missing:#}").contains("failed to read configuration"));
}

#[test]
fn test_parse_validate_command() {
    let cli = parse(&[
        "--config",
        "gfred.toml",
        "validate",
        "mission.json",
        "--assets",
        "assets.json",
        "--format",
        "json",
        "--strict-operators",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("gfred.toml")));
    let Command::Validate(args) = cli.command else {
        panic!("expected validate command");
    };
    assert!(args.format == OutputFormatArg::Json);
    assert!(args.mission.strict_operators);
    assert_eq!(args.mission.assets, Some(PathBuf::from("assets.json")));
}

#[test]
fn test_asset_extension_requires_directory() {
    assert!(parse(&["validate", "mission.json", "--asset-ext", "pof"]).is_err());
}

#[test]
fn test_strict_and_no_expressions_conflict() {
    assert!(parse(&["validate", "mission.json", "--strict-operators", "--no-expressions"]).is_err());
}
