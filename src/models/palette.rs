//! Palette collection keyed by style code.
//!
//! Palettes are nested JSON objects (`{"page": {"background": "#1a1a1a"}}`);
//! declaration order is preserved so that flattening and reverse
//! substitution tie-breaks are deterministic.

use crate::engine::flatten::{flatten_with, FlatMap, FlattenOptions};
use crate::engine::{EngineError, EngineResult};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A single nested palette.
pub type Palette = Map<String, Value>;

/// All palettes available to a run, keyed by style code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaletteCollection {
    palettes: IndexMap<String, Palette>,
}

impl PaletteCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from a JSON object of style code → palette object.
    ///
    /// # Errors
    ///
    /// Returns a message when the document is not an object of objects.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(root) = value else {
            return Err("expected a JSON object keyed by style code".to_string());
        };

        let mut palettes = IndexMap::new();
        for (code, palette) in root {
            match palette {
                Value::Object(palette) => {
                    palettes.insert(code, palette);
                }
                other => {
                    return Err(format!(
                        "palette '{code}' must be an object, found {}",
                        json_kind(&other)
                    ));
                }
            }
        }
        Ok(Self { palettes })
    }

    /// Parses a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
        Self::from_value(value)
    }

    /// Adds or replaces a palette.
    pub fn insert(&mut self, code: impl Into<String>, palette: Palette) {
        self.palettes.insert(code.into(), palette);
    }

    /// Returns the nested palette for `code`.
    pub fn get(&self, code: &str) -> Option<&Palette> {
        self.palettes.get(code)
    }

    /// Style codes in document order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.palettes.keys().map(String::as_str)
    }

    /// Number of palettes.
    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    /// Returns true when the collection holds no palettes.
    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// Looks up and flattens the palette for `code`.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownStyleCode`] when `code` is absent, or
    /// [`EngineError::KeyCollision`] in strict mode.
    pub fn flattened(&self, code: &str, options: &FlattenOptions) -> EngineResult<FlatMap> {
        let palette = self
            .get(code)
            .ok_or_else(|| EngineError::UnknownStyleCode {
                code: code.to_string(),
            })?;
        flatten_with(palette, options)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
