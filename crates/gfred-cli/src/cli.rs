//! CLI argument definitions for the GFRED mission validator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "gfred",
    version,
    about = "GFRED mission validator - check missions and inspect their dependency graph",
    long_about = "Validate mission exports from the GFRED editor.\n\n\
                  Checks entity rules, ship-class assets, SEXP syntax and mission size,\n\
                  and exposes the dependency graph built along the way."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file (TOML) with validation, layout and scheduler settings.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a mission and print its problems.
    Validate(ValidateArgs),

    /// List the dependencies of one mission entity.
    Deps(DepsArgs),

    /// List the entities that depend on a path.
    Dependents(DependentsArgs),

    /// Compute a layout of the dependency graph.
    Layout(LayoutArgs),

    /// Re-validate whenever the mission file changes.
    Watch(WatchArgs),

    /// Print the effective configuration as TOML.
    Config,
}

/// Mission input and collaborator wiring shared by every mission command.
#[derive(Args, Clone)]
pub struct MissionArgs {
    /// Mission export (JSON).
    #[arg(value_name = "MISSION")]
    pub mission: PathBuf,

    /// Asset catalog: a JSON array of known ship classes.
    #[arg(long = "assets", value_name = "FILE")]
    pub assets: Option<PathBuf>,

    /// Directory whose files count as existing assets.
    #[arg(long = "asset-dir", value_name = "DIR")]
    pub asset_dir: Option<PathBuf>,

    /// Extension tried for assets under --asset-dir (repeatable).
    #[arg(long = "asset-ext", value_name = "EXT", requires = "asset_dir")]
    pub asset_ext: Vec<String>,

    /// Override the validation time budget.
    #[arg(long = "budget-ms", value_name = "MS")]
    pub budget_ms: Option<u64>,

    /// Reject SEXP operators outside the stock operator table.
    #[arg(long = "strict-operators")]
    pub strict_operators: bool,

    /// Skip SEXP checking entirely.
    #[arg(long = "no-expressions", conflicts_with = "strict_operators")]
    pub no_expressions: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub mission: MissionArgs,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Write the report to a file instead of stdout.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit successfully even when the mission has errors.
    #[arg(long = "no-fail")]
    pub no_fail: bool,
}

#[derive(Args)]
pub struct DepsArgs {
    #[command(flatten)]
    pub mission: MissionArgs,

    /// Entity key, e.g. `object:alpha-1` or `event:Arrival`.
    #[arg(value_name = "OWNER")]
    pub owner: String,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct DependentsArgs {
    #[command(flatten)]
    pub mission: MissionArgs,

    /// Dependency path, e.g. a ship class or `sexp:<hash>`.
    #[arg(value_name = "PATH")]
    pub path: String,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub mission: MissionArgs,

    /// Override the number of force iterations.
    #[arg(long = "iterations", value_name = "N")]
    pub iterations: Option<usize>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub mission: MissionArgs,

    /// How often the mission file is checked for changes.
    #[arg(long = "poll-ms", value_name = "MS", default_value_t = 200)]
    pub poll_ms: u64,

    /// Stop after this many passes.
    #[arg(long = "max-passes", value_name = "N")]
    pub max_passes: Option<u32>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
