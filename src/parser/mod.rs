//! Parsing of admin commands and data documents.
//!
//! This module turns the pipe-delimited admin grammar into a run
//! configuration and loads the palette and course collections from disk.

pub mod command;
pub mod data;

// Re-export commonly used functions
pub use command::{parse_command, CommandError};
pub use data::{load_courses, load_palettes};
