//! Run configuration for one batch invocation.
//!
//! A `RunConfig` is built once at the boundary (admin command string or CLI
//! flags), validated there, and handed to the driver. It is never persisted.

use crate::constants::ALL_KEYWORD;
use crate::engine::Environment;
use std::fmt;
use std::path::PathBuf;

/// Selects one item or every item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every course / every page
    All,
    /// A single course id / page name
    One(String),
}

impl Scope {
    /// Parses `all` (any case) or a single name.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case(ALL_KEYWORD) {
            Self::All
        } else {
            Self::One(value.to_string())
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_KEYWORD),
            Self::One(name) => f.write_str(name),
        }
    }
}

/// Parameters of a generate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRun {
    /// Target environment
    pub environment: Environment,
    /// Courses to render
    pub courses: Scope,
    /// Pages to render for each course
    pub pages: Scope,
}

/// Parameters of a convert run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRun {
    /// Rendered page to recover a template from
    pub input: PathBuf,
    /// Name of the template to write
    pub output_name: String,
}

/// What one invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunConfig {
    /// Render pages from templates
    Generate(GenerateRun),
    /// Recover a template from a rendered page
    Convert(ConvertRun),
}

impl RunConfig {
    /// Keyword of the run mode.
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Generate(_) => "generate",
            Self::Convert(_) => "convert",
        }
    }
}
