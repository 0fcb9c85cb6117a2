//! Data models for palettes, course records, and run configuration.
//!
//! Palettes and course records are loaded once per run and treated as
//! read-only; a run configuration is built fresh for every invocation.

pub mod course;
pub mod palette;
pub mod run;

// Re-export all model types
pub use course::{CourseCollection, CourseRecord};
pub use palette::{Palette, PaletteCollection};
pub use run::{ConvertRun, GenerateRun, RunConfig, Scope};
