//! Command implementations.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use gfred_layout::{ForceDirectedLayout, LayoutBounds, LayoutConfig, Position};
use gfred_model::{Mission, load_mission};
use gfred_validate::{
    AssetCatalog, AssetChecker, DependencyGraph, DependencyInfo, DirectoryAssetChecker,
    MissionValidationReport, SexpSyntaxValidator, ValidationEngine, ValidationProgress,
    ValidationScheduler,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::cli::{
    DependentsArgs, DepsArgs, LayoutArgs, MissionArgs, OutputFormatArg, ValidateArgs, WatchArgs,
};
use crate::config::GfredConfig;
use crate::summary;

/// Machine-readable validation report.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub generator: &'static str,
    pub valid: bool,
    pub errors: usize,
    pub warnings: usize,
    pub report: &'a MissionValidationReport,
    /// Every dependency target of the pass, ordered by path.
    pub dependencies: Vec<&'a DependencyInfo>,
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a MissionValidationReport, graph: &'a DependencyGraph) -> Self {
        Self {
            generated_at: Utc::now(),
            generator: concat!("gfred ", env!("CARGO_PKG_VERSION")),
            valid: report.is_valid(),
            errors: report.total_errors(),
            warnings: report.total_warnings(),
            report,
            dependencies: graph.nodes().collect(),
        }
    }
}

/// Positions computed for a dependency graph.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutOutput {
    pub positions: BTreeMap<String, Position>,
    pub edges: Vec<(String, String)>,
    pub bounds: Option<LayoutBounds>,
}

pub fn run_validate(args: &ValidateArgs, config: &GfredConfig) -> Result<MissionValidationReport> {
    let show_progress = args.format == OutputFormatArg::Table && args.output.is_none();
    let (engine, report) = validate_mission(&args.mission, config, show_progress)?;

    let text = match args.format {
        OutputFormatArg::Table => summary::render_report(&report),
        OutputFormatArg::Json => to_json(&JsonReport::new(&report, engine.dependency_graph()))?,
    };
    emit(&text, args.output.as_deref())?;
    Ok(report)
}

pub fn run_deps(args: &DepsArgs, config: &GfredConfig) -> Result<()> {
    let (engine, _) = validate_mission(&args.mission, config, false)?;
    let dependencies = engine.get_dependencies(&args.owner);
    if dependencies.is_empty() {
        info!(owner = %args.owner, "no dependencies recorded");
    }
    let text = match args.format {
        OutputFormatArg::Table => summary::render_dependencies(&args.owner, &dependencies),
        OutputFormatArg::Json => to_json(&dependencies)?,
    };
    emit(&text, None)
}

pub fn run_dependents(args: &DependentsArgs, config: &GfredConfig) -> Result<()> {
    let (engine, _) = validate_mission(&args.mission, config, false)?;
    let dependents = engine.get_dependents(&args.path);
    let node = engine.dependency_graph().node(&args.path);
    let text = match args.format {
        OutputFormatArg::Table => summary::render_dependents(&args.path, node, &dependents),
        OutputFormatArg::Json => to_json(&serde_json::json!({
            "path": args.path,
            "target": node,
            "dependents": dependents,
        }))?,
    };
    emit(&text, None)
}

pub fn run_layout(args: &LayoutArgs, config: &GfredConfig) -> Result<()> {
    let (engine, _) = validate_mission(&args.mission, config, false)?;
    let mut layout_config = config.layout.clone();
    if let Some(iterations) = args.iterations {
        layout_config.iterations = iterations;
    }
    let output = compute_layout(engine.dependency_graph(), layout_config)?;
    let text = match args.format {
        OutputFormatArg::Table => summary::render_layout(&output.positions, output.bounds),
        OutputFormatArg::Json => to_json(&output)?,
    };
    emit(&text, None)
}

/// Poll the mission file and re-validate through a debounced scheduler.
pub fn run_watch(args: &WatchArgs, config: &GfredConfig) -> Result<()> {
    if !config.scheduler.enabled {
        bail!("change-triggered validation is disabled ([scheduler] enabled = false)");
    }
    let path = args.mission.mission.as_path();
    let mut engine = build_engine(&args.mission, config)?;
    let mut scheduler = ValidationScheduler::new(config.scheduler);
    let poll = Duration::from_millis(args.poll_ms.max(1));
    let mut last_modified: Option<SystemTime> = None;
    let mut passes = 0_u32;

    info!(path = %path.display(), "watching mission");
    loop {
        let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok();
        if modified.is_some() && modified != last_modified {
            last_modified = modified;
            scheduler.request();
        }

        if scheduler.should_run() {
            scheduler.begin()?;
            match load(path) {
                Ok(mission) => {
                    let report = engine.validate(&mission);
                    println!("{}", summary::one_line(&report));
                }
                Err(error) => warn!("{error:#}"),
            }
            passes += 1;
            if scheduler.finish() {
                info!("mission changed during validation, another pass is queued");
            }
            if args.max_passes.is_some_and(|max| passes >= max) {
                return Ok(());
            }
        }
        thread::sleep(poll);
    }
}

pub fn run_config(config: &GfredConfig) -> Result<()> {
    emit(&config.to_toml()?, None)
}

/// Wire an engine from the command-line collaborator flags.
pub fn build_engine(args: &MissionArgs, config: &GfredConfig) -> Result<ValidationEngine> {
    let mut validation = config.validation;
    if let Some(budget_ms) = args.budget_ms {
        validation.max_validation_time_ms = budget_ms;
    }
    let mut engine = ValidationEngine::new(validation);

    if let Some(checker) = asset_checker(args)? {
        engine = engine.with_asset_checker(checker);
    }
    if !args.no_expressions {
        let validator = if args.strict_operators {
            SexpSyntaxValidator::standard()
        } else {
            SexpSyntaxValidator::new()
        };
        engine = engine.with_expression_validator(validator);
    }
    Ok(engine)
}

/// An asset exists when either the catalog or the asset directory knows it.
fn asset_checker(args: &MissionArgs) -> Result<Option<impl AssetChecker + 'static>> {
    let catalog = args
        .assets
        .as_deref()
        .map(AssetCatalog::load)
        .transpose()
        .context("failed to load asset catalog")?;
    let directory = args.asset_dir.as_ref().map(|root| {
        args.asset_ext
            .iter()
            .fold(DirectoryAssetChecker::new(root), |checker, ext| {
                checker.with_extension(ext.as_str())
            })
    });
    if catalog.is_none() && directory.is_none() {
        return Ok(None);
    }
    if let Some(catalog) = &catalog {
        info!(assets = catalog.len(), "loaded asset catalog");
    }

    Ok(Some(move |path: &str| {
        catalog.as_ref().is_some_and(|c| c.exists(path))
            || directory.as_ref().is_some_and(|d| d.exists(path))
    }))
}

/// Load the mission, run one pass and hand back the engine for graph queries.
pub fn validate_mission(
    args: &MissionArgs,
    config: &GfredConfig,
    show_progress: bool,
) -> Result<(ValidationEngine, MissionValidationReport)> {
    let mission = load(&args.mission)?;
    let mut engine = build_engine(args, config)?;
    let span = info_span!("validate", mission = %mission.name);
    let _guard = span.enter();

    let bar = progress_bar(show_progress);
    let report = engine.validate_with_progress(&mission, |progress: ValidationProgress| {
        bar.set_position((progress.fraction * 100.0).round() as u64);
        bar.set_message(progress.phase.label());
    });
    bar.finish_and_clear();

    if report.truncated() {
        warn!(
            skipped = report.skipped_phases.len(),
            "validation budget exhausted; results are partial"
        );
    }
    Ok((engine, report))
}

/// Lay out the dependency graph of the latest pass.
pub fn compute_layout(graph: &DependencyGraph, config: LayoutConfig) -> Result<LayoutOutput> {
    let solver = ForceDirectedLayout::new(config).context("invalid layout configuration")?;
    let snapshot = graph.snapshot();
    let positions = solver.calculate(&snapshot.nodes, &snapshot.edges);
    let bounds = LayoutBounds::from_positions(positions.values().copied());
    Ok(LayoutOutput {
        positions,
        edges: snapshot.edges,
        bounds,
    })
}

fn load(path: &Path) -> Result<Mission> {
    load_mission(path).map_err(|error| {
        let context = match error.suggestion() {
            Some(hint) => format!("cannot load mission {} ({hint})", path.display()),
            None => format!("cannot load mission {}", path.display()),
        };
        anyhow::Error::new(error).context(context)
    })
}

fn progress_bar(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value).context("failed to encode JSON")?;
    text.push('\n');
    Ok(text)
}

fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote report");
        }
        None => print!("{text}"),
    }
    Ok(())
}
