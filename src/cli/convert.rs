//! Convert command: recover a template from a rendered page.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::constants::COMPONENT_DELIMITER;
use crate::engine::{recover, ResourceKind, Substitution};
use crate::models::ConvertRun;
use crate::parser::data::read_resource;
use crate::parser::load_palettes;
use crate::services::atomic_write;
use crate::services::templates::template_file_name;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Recover a reusable template from a rendered page
#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Rendered HTML page containing a provenance block
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Name of the template to write
    #[arg(short, long, value_name = "NAME")]
    pub name: String,

    /// Overwrite an existing template with the same name
    #[arg(long)]
    pub force: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Convert result for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResponse {
    /// Template name
    pub name: String,
    /// Style code read from the provenance block
    pub style_code: String,
    /// Course title read from the provenance block
    pub course_title: Option<String>,
    /// Written template path
    pub output: String,
    /// Palette entries that were turned back into placeholders
    pub substitutions: Vec<Substitution>,
}

impl ConvertArgs {
    /// Execute the convert command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let run = ConvertRun {
            input: self.input.clone(),
            output_name: self.name.clone(),
        };
        run_convert(config, &run, self.force, self.json)
    }
}

/// Recovers the template for `run` and writes it to the converted directory.
pub fn run_convert(config: &Config, run: &ConvertRun, force: bool, json: bool) -> CliResult<()> {
    let name = run.output_name.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(CliError::validation(format!(
            "Invalid template name '{}': use a plain file name without path separators",
            run.output_name
        )));
    }

    let output = config.paths.converted_dir.join(template_file_name(name));
    if output.exists() && !force {
        return Err(CliError::validation(format!(
            "Template '{}' already exists: {} (use --force to overwrite)",
            name,
            output.display()
        )));
    }

    let html = read_resource(&run.input, ResourceKind::RenderedPage)?;
    let palettes = load_palettes(&config.paths.palettes)?;
    let recovered = recover(&html, &palettes, &config.flatten_options())?;

    atomic_write(&output, &recovered.template).map_err(|e| CliError::io(format!("{e:#}")))?;

    if json {
        let response = ConvertResponse {
            name: name.to_string(),
            style_code: recovered.style_code,
            course_title: recovered.course_title,
            output: output.display().to_string(),
            substitutions: recovered.substitutions,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&response)
                .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
        );
        return Ok(());
    }

    println!(
        "✓ Template recovered: {} (style code {})",
        name, recovered.style_code
    );
    println!("  Output: {}", output.display());
    for substitution in &recovered.substitutions {
        println!(
            "  {} -> {{{}}} ({}x)",
            substitution.value, substitution.key, substitution.count
        );
    }
    println!(
        "  Prepend a component list and '{}' before using it as a page template.",
        COMPONENT_DELIMITER
    );

    Ok(())
}
