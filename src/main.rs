//! LMS Page Generator - template-driven course page builder
//!
//! Renders course pages for the production LMS or a local preview, and turns
//! rendered pages back into reusable templates.

use clap::{Parser, Subcommand};
use lms_pagegen::cli::common::load_config;
use lms_pagegen::cli::{
    CliResult, ConvertArgs, ExitCode, GenerateArgs, PaletteArgs, PlaceholdersArgs, RunArgs,
};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// LMS Page Generator - render and recover LMS course page templates
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ./lms-pagegen.toml, then the user config)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a pipe-delimited admin command
    Run(RunArgs),
    /// Render course pages
    Generate(GenerateArgs),
    /// Recover a template from a rendered page
    Convert(ConvertArgs),
    /// Show the flattened keys of a palette
    Palette(PaletteArgs),
    /// List the placeholders of a template file
    Placeholders(PlaceholdersArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn dispatch(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        // Template listings need no configuration
        Command::Placeholders(args) => return args.execute(),
        // Admin commands are validated before any file is read
        Command::Run(args) => return args.execute(cli.config.as_deref()),
        _ => {}
    }

    let config = load_config(cli.config.as_deref())?;
    debug!(
        templates = %config.paths.templates_dir.display(),
        palettes = %config.paths.palettes.display(),
        courses = %config.paths.courses.display(),
        "configuration loaded"
    );

    match &cli.command {
        Command::Generate(args) => args.execute(&config),
        Command::Convert(args) => args.execute(&config),
        Command::Palette(args) => args.execute(&config),
        Command::Run(_) | Command::Placeholders(_) => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(&cli) {
        Ok(()) => std::process::exit(ExitCode::Success.code()),
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(error.code.code());
        }
    }
}
