//! CLI command handlers for the page generator.
//!
//! Every subcommand is a thin layer over the engine and services: it loads
//! the configured data, runs one operation, and maps failures to exit codes.

pub mod common;
pub mod convert;
pub mod generate;
pub mod palette;
pub mod placeholders;
pub mod run;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use convert::ConvertArgs;
pub use generate::GenerateArgs;
pub use palette::PaletteArgs;
pub use placeholders::PlaceholdersArgs;
pub use run::RunArgs;
