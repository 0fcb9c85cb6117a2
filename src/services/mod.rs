//! Service layer for business logic.
//!
//! This module contains services that connect the engine to the filesystem
//! and coordinate batch runs.

pub mod batch;
pub mod output;
pub mod templates;

// Re-export commonly used types and functions
pub use batch::{BatchDriver, BatchReport, FailurePolicy, RenderFailure, RenderedPage};
pub use output::{atomic_write, page_output_path};
pub use templates::FsTemplates;
