//! Placeholders command: list the keys a template file needs.

use crate::cli::common::{CliError, CliResult};
use crate::constants::COMPONENT_DELIMITER;
use crate::engine::substitute::placeholders;
use crate::engine::{PageTemplate, ResourceKind};
use crate::parser::data::read_resource;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// List the placeholder keys used by a template file
#[derive(Debug, Clone, Args)]
pub struct PlaceholdersArgs {
    /// Page or component template file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Placeholder listing for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct PlaceholdersResponse {
    /// Template file
    pub file: String,
    /// Components declared before the delimiter (page templates only)
    pub components: Vec<String>,
    /// Distinct placeholder keys in first-appearance order
    pub placeholders: Vec<String>,
}

impl PlaceholdersArgs {
    /// Execute the placeholders command
    pub fn execute(&self) -> CliResult<()> {
        let text = read_resource(&self.file, ResourceKind::PageTemplate)?;

        let (components, body) = if text.contains(COMPONENT_DELIMITER) {
            let name = self
                .file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let page = PageTemplate::parse(&name, &text)?;
            (page.components, page.body)
        } else {
            (Vec::new(), text)
        };
        let keys = placeholders(&body);

        if self.json {
            let response = PlaceholdersResponse {
                file: self.file.display().to_string(),
                components,
                placeholders: keys,
            };
            let output = serde_json::to_string_pretty(&response)
                .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
            println!("{output}");
            return Ok(());
        }

        if !components.is_empty() {
            println!("Components: {}", components.join(", "));
        }
        println!("Placeholders ({}):", keys.len());
        for key in &keys {
            println!("  {{{key}}}");
        }
        Ok(())
    }
}
