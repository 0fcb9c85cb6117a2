//! Error taxonomy for the template engine.
//!
//! Every failure the forward or reverse pipeline can raise is a variant of
//! [`EngineError`]. None of them are recovered inside the engine; they travel
//! up to the batch driver with enough context to locate the offending input.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// The kind of file a [`EngineError::MissingResource`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A page template (`pages/<name>-template.txt`)
    PageTemplate,
    /// A component template (`components/<name>-template.txt`)
    ComponentTemplate,
    /// The palette collection document
    Palettes,
    /// The course record collection document
    Courses,
    /// A rendered page handed to the reverse pipeline
    RenderedPage,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PageTemplate => "page template",
            Self::ComponentTemplate => "component template",
            Self::Palettes => "palette collection",
            Self::Courses => "course collection",
            Self::RenderedPage => "rendered page",
        };
        f.write_str(name)
    }
}

/// Errors raised by the forward and reverse pipelines.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A page template does not contain exactly one component-list delimiter.
    #[error(
        "malformed page template '{template}': expected exactly one '{delimiter}' delimiter, found {delimiter_count}"
    )]
    MalformedTemplate {
        /// Template name
        template: String,
        /// The delimiter that was searched for
        delimiter: char,
        /// How many delimiters were found
        delimiter_count: usize,
    },

    /// A placeholder could not be resolved by any supplied mapping.
    #[error("unresolved placeholder '{{{key}}}'")]
    MissingKey {
        /// The unresolved key
        key: String,
    },

    /// The rendered page has no "Style code" provenance line.
    #[error("no 'Style code' provenance line found in rendered page")]
    MissingProvenance,

    /// The style code is not present in the palette collection.
    #[error("style code '{code}' not found in palette collection")]
    UnknownStyleCode {
        /// The style code that was looked up
        code: String,
    },

    /// The style code would be altered by the provenance comment and could
    /// not be read back.
    #[error("style code '{code}' cannot be recorded in a provenance comment (no '--', line breaks or surrounding spaces)")]
    UnrecordableStyleCode {
        /// The offending style code
        code: String,
    },

    /// A template or data file is absent.
    #[error("{kind} not found: {}", path.display())]
    MissingResource {
        /// What kind of resource was expected
        kind: ResourceKind,
        /// Where it was expected
        path: PathBuf,
    },

    /// Two distinct nested paths flattened to the same key (strict mode only).
    #[error("flattened key '{key}' is produced by more than one nested path")]
    KeyCollision {
        /// The colliding joined key
        key: String,
    },

    /// A course record lacks a field the engine relies on.
    #[error("course '{course_id}' is missing required field '{field}'")]
    MissingField {
        /// Course id of the record
        course_id: String,
        /// Name of the missing field
        field: String,
    },

    /// The requested course id is not in the course collection.
    #[error("course '{course_id}' not found in course collection")]
    UnknownCourse {
        /// The requested course id
        course_id: String,
    },

    /// A data document exists but could not be interpreted.
    #[error("invalid data in {}: {reason}", path.display())]
    InvalidData {
        /// The offending file
        path: PathBuf,
        /// Parser message
        reason: String,
    },
}

impl EngineError {
    /// Shorthand for [`EngineError::MissingKey`].
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Shorthand for [`EngineError::MissingResource`].
    pub fn missing_resource(kind: ResourceKind, path: impl Into<PathBuf>) -> Self {
        Self::MissingResource {
            kind,
            path: path.into(),
        }
    }
}
