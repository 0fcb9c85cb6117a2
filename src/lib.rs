//! LMS Page Generator Library
//!
//! This library renders LMS course pages from page templates, reusable
//! components, per-course data and style palettes, and recovers reusable
//! templates from pages that were rendered earlier.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod models;
pub mod parser;
pub mod services;
