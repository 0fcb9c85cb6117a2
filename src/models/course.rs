//! Course records and the collection they are loaded into.

use super::palette::json_kind;
use crate::constants::{COURSE_ID_COLUMN, COURSE_TITLE_FIELD, STYLE_CODE_FIELD};
use crate::engine::flatten::{flatten_with, value_to_text, FlatMap, FlattenOptions};
use crate::engine::{EngineError, EngineResult};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::io::Read;

/// One course: its id plus the fields templates can reference.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseRecord {
    /// Course id (the collection key)
    pub id: String,
    /// Field values; nested objects are flattened before rendering
    pub fields: Map<String, Value>,
}

impl CourseRecord {
    /// Creates a record.
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Flattens the record's fields.
    pub fn flattened(&self, options: &FlattenOptions) -> EngineResult<FlatMap> {
        flatten_with(&self.fields, options)
    }

    /// The style code selecting this course's palette.
    pub fn style_code(&self) -> EngineResult<String> {
        self.required_text(STYLE_CODE_FIELD)
    }

    /// The course title written into the provenance block.
    pub fn course_title(&self) -> EngineResult<String> {
        self.required_text(COURSE_TITLE_FIELD)
    }

    fn required_text(&self, field: &str) -> EngineResult<String> {
        self.fields
            .get(field)
            .filter(|value| !value.is_null())
            .map(value_to_text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| EngineError::MissingField {
                course_id: self.id.clone(),
                field: field.to_string(),
            })
    }
}

/// All course records of a run, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseCollection {
    courses: IndexMap<String, CourseRecord>,
}

impl CourseCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from a JSON object of course id → record object.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(root) = value else {
            return Err("expected a JSON object keyed by course id".to_string());
        };

        let mut collection = Self::new();
        for (id, record) in root {
            match record {
                Value::Object(fields) => collection.insert(CourseRecord::new(id, fields)),
                other => {
                    return Err(format!(
                        "course '{id}' must be an object, found {}",
                        json_kind(&other)
                    ));
                }
            }
        }
        Ok(collection)
    }

    /// Parses a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
        Self::from_value(value)
    }

    /// Reads CSV with a header row; the `course_id` column keys the records
    /// and every other column becomes a string field.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, String> {
        let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = csv.headers().map_err(|e| e.to_string())?.clone();
        let id_column = headers
            .iter()
            .position(|h| h == COURSE_ID_COLUMN)
            .ok_or_else(|| format!("CSV header has no '{COURSE_ID_COLUMN}' column"))?;

        let mut collection = Self::new();
        for (row, record) in csv.records().enumerate() {
            let record = record.map_err(|e| e.to_string())?;
            let id = record.get(id_column).unwrap_or_default().to_string();
            if id.is_empty() {
                // Header is line 1.
                return Err(format!("row {} has an empty '{COURSE_ID_COLUMN}'", row + 2));
            }

            let fields = headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|(index, _)| *index != id_column)
                .map(|(_, (header, value))| (header.to_string(), Value::String(value.to_string())))
                .collect();
            collection.insert(CourseRecord::new(id, fields));
        }
        Ok(collection)
    }

    /// Adds or replaces a record.
    pub fn insert(&mut self, record: CourseRecord) {
        self.courses.insert(record.id.clone(), record);
    }

    /// Looks up a course by id.
    pub fn get(&self, id: &str) -> Option<&CourseRecord> {
        self.courses.get(id)
    }

    /// Course ids in document order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.courses.keys().map(String::as_str)
    }

    /// Number of courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Returns true when the collection holds no courses.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
