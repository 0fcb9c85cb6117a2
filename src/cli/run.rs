//! Run command: execute a pipe-delimited admin command.

use crate::cli::common::{load_config, CliResult};
use crate::cli::convert::run_convert;
use crate::cli::generate::run_generate;
use crate::models::RunConfig;
use crate::parser::parse_command;
use crate::services::FailurePolicy;
use clap::Args;
use std::path::Path;
use tracing::debug;

/// Execute an admin command such as `generate|local|07|home`
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Admin command: `generate|<env>|<course|all>|<page|all>` or `convert|<input>|<name>`
    #[arg(value_name = "COMMAND")]
    pub command: String,

    /// Write successful pages even if some pairs fail (generate only)
    #[arg(long)]
    pub keep_going: bool,

    /// Render without writing any files (generate only)
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite an existing template (convert only)
    #[arg(long)]
    pub force: bool,
}

impl RunArgs {
    /// Execute the run command.
    ///
    /// The command is validated before the configuration or any data file is
    /// read.
    pub fn execute(&self, config_path: Option<&Path>) -> CliResult<()> {
        let run = parse_command(&self.command)?;
        debug!(mode = run.mode(), "parsed admin command");
        let config = load_config(config_path)?;

        match run {
            RunConfig::Generate(generate) => {
                let policy = if self.keep_going {
                    FailurePolicy::CollectAll
                } else {
                    FailurePolicy::FailFast
                };
                run_generate(&config, &generate, policy, self.dry_run)
            }
            RunConfig::Convert(convert) => run_convert(&config, &convert, self.force, false),
        }
    }
}
