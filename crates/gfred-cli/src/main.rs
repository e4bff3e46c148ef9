//! GFRED mission validator CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use gfred_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use gfred_cli::commands::{
    run_config, run_dependents, run_deps, run_layout, run_validate, run_watch,
};
use gfred_cli::config::GfredConfig;
use gfred_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let config = match GfredConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };

    let outcome = match &cli.command {
        Command::Validate(args) => run_validate(args, &config)
            .map(|report| if report.is_valid() || args.no_fail { 0 } else { 1 }),
        Command::Deps(args) => run_deps(args, &config).map(|()| 0),
        Command::Dependents(args) => run_dependents(args, &config).map(|()| 0),
        Command::Layout(args) => run_layout(args, &config).map(|()| 0),
        Command::Watch(args) => run_watch(args, &config).map(|()| 0),
        Command::Config => run_config(&config).map(|()| 0),
    };
    let exit_code = match outcome {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };

    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
