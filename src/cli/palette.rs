//! Palette command: show the flattened placeholder keys of a style code.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::engine::flatten::value_to_text;
use crate::engine::FlattenMode;
use crate::parser::load_palettes;
use clap::Args;

/// Show the placeholder keys a palette provides
#[derive(Debug, Clone, Args)]
pub struct PaletteArgs {
    /// Style code to look up
    #[arg(value_name = "CODE")]
    pub code: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Fail on flattened key collisions
    #[arg(long)]
    pub strict: bool,
}

impl PaletteArgs {
    /// Execute the palette command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let palettes = load_palettes(&config.paths.palettes)?;

        let mut options = config.flatten_options();
        if self.strict {
            options.mode = FlattenMode::Strict;
        }
        let flat = palettes.flattened(&self.code, &options)?;

        if self.json {
            let output = serde_json::to_string_pretty(&flat)
                .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
            println!("{output}");
            return Ok(());
        }

        println!("Palette {} ({} key(s))", self.code, flat.len());
        for (key, value) in &flat {
            println!("  {{{key}}} = {}", value_to_text(value));
        }
        Ok(())
    }
}
