//! Loading the palette and course collections from disk.

use crate::engine::{EngineError, EngineResult, ResourceKind};
use crate::models::{CourseCollection, PaletteCollection};
use std::fs;
use std::path::Path;

/// Loads the palette collection from a JSON document.
pub fn load_palettes(path: &Path) -> EngineResult<PaletteCollection> {
    let text = read_resource(path, ResourceKind::Palettes)?;
    PaletteCollection::from_json_str(&text).map_err(|reason| invalid(path, reason))
}

/// Loads the course collection: `.csv` files are read as a table with a header
/// row, anything else as a JSON object keyed by course id.
pub fn load_courses(path: &Path) -> EngineResult<CourseCollection> {
    let text = read_resource(path, ResourceKind::Courses)?;
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let parsed = if is_csv {
        CourseCollection::from_csv_reader(text.as_bytes())
    } else {
        CourseCollection::from_json_str(&text)
    };
    parsed.map_err(|reason| invalid(path, reason))
}

/// Reads a text resource, mapping absence to [`EngineError::MissingResource`].
pub fn read_resource(path: &Path, kind: ResourceKind) -> EngineResult<String> {
    if !path.is_file() {
        return Err(EngineError::missing_resource(kind, path));
    }
    fs::read_to_string(path).map_err(|e| invalid(path, e.to_string()))
}

fn invalid(path: &Path, reason: String) -> EngineError {
    EngineError::InvalidData {
        path: path.to_path_buf(),
        reason,
    }
}
