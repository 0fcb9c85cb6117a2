//! Admin command grammar.
//!
//! ```text
//! generate|<qlearn|local>|<course_id|all>|<page_name|all>
//! convert|<input_path>|<output_template_name>
//! ```
//!
//! Keywords are case-insensitive. Parsing never touches the filesystem, so a
//! malformed command is rejected before any file is read.

use crate::engine::Environment;
use crate::models::{ConvertRun, GenerateRun, RunConfig, Scope};
use std::path::PathBuf;
use thiserror::Error;

/// Field separator of admin commands.
pub const COMMAND_SEPARATOR: char = '|';

/// Reasons an admin command is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The command string is blank.
    #[error("empty command; expected 'generate|...' or 'convert|...'")]
    Empty,

    /// The first field is not a known mode.
    #[error("unknown command '{0}'; expected 'generate' or 'convert'")]
    UnknownMode(String),

    /// Wrong number of fields for the mode.
    #[error("'{mode}' expects {expected} fields ({usage}), got {found}")]
    FieldCount {
        /// Mode keyword
        mode: &'static str,
        /// Expected field count
        expected: usize,
        /// Actual field count
        found: usize,
        /// Usage line
        usage: &'static str,
    },

    /// The environment keyword is not recognised.
    #[error("unknown environment '{0}'; expected 'qlearn' or 'local'")]
    UnknownEnvironment(String),

    /// A required field is blank.
    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),
}

const GENERATE_USAGE: &str = "generate|<qlearn|local>|<course_id|all>|<page_name|all>";
const CONVERT_USAGE: &str = "convert|<input_path>|<output_template_name>";

/// Parses an admin command into a validated [`RunConfig`].
pub fn parse_command(input: &str) -> Result<RunConfig, CommandError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CommandError::Empty);
    }

    let fields: Vec<&str> = input.split(COMMAND_SEPARATOR).map(str::trim).collect();
    let mode = fields[0].to_ascii_lowercase();

    match mode.as_str() {
        "generate" => {
            expect_fields("generate", &fields, 4, GENERATE_USAGE)?;
            let environment = fields[1]
                .parse::<Environment>()
                .map_err(|_| CommandError::UnknownEnvironment(fields[1].to_string()))?;
            let courses = non_empty("course", fields[2])?;
            let pages = non_empty("page", fields[3])?;
            Ok(RunConfig::Generate(GenerateRun {
                environment,
                courses: Scope::parse(courses),
                pages: Scope::parse(pages),
            }))
        }
        "convert" => {
            expect_fields("convert", &fields, 3, CONVERT_USAGE)?;
            let input = non_empty("input_path", fields[1])?;
            let output_name = non_empty("output_template_name", fields[2])?;
            Ok(RunConfig::Convert(ConvertRun {
                input: PathBuf::from(input),
                output_name: output_name.to_string(),
            }))
        }
        _ => Err(CommandError::UnknownMode(fields[0].to_string())),
    }
}

fn expect_fields(
    mode: &'static str,
    fields: &[&str],
    expected: usize,
    usage: &'static str,
) -> Result<(), CommandError> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(CommandError::FieldCount {
            mode,
            expected,
            found: fields.len(),
            usage,
        })
    }
}

fn non_empty<'a>(name: &'static str, value: &'a str) -> Result<&'a str, CommandError> {
    if value.is_empty() {
        Err(CommandError::EmptyField(name))
    } else {
        Ok(value)
    }
}
