//! Key flattening for nested palettes and course records.
//!
//! `{"page": {"background": "#fff"}}` becomes `{"page_background": "#fff"}`.
//! Keys keep the position of their first declaration; when two nested paths
//! join to the same key the later value wins unless [`FlattenMode::Strict`]
//! is requested.

use super::error::{EngineError, EngineResult};
use crate::constants::DEFAULT_KEY_SEPARATOR;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A single-level mapping from joined keys to scalar values.
pub type FlatMap = IndexMap<String, Value>;

/// How key collisions are handled while flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlattenMode {
    /// Later paths silently overwrite earlier ones with the same joined key.
    #[default]
    LastWriteWins,
    /// Collisions fail with [`EngineError::KeyCollision`].
    Strict,
}

/// Options for [`flatten_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Prefix prepended to every emitted key (joined with `separator`)
    pub prefix: Option<String>,
    /// Separator between path segments
    pub separator: String,
    /// Collision handling
    pub mode: FlattenMode,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            separator: DEFAULT_KEY_SEPARATOR.to_string(),
            mode: FlattenMode::default(),
        }
    }
}

impl FlattenOptions {
    /// Options with the given separator and collision mode, no prefix.
    pub fn new(separator: impl Into<String>, mode: FlattenMode) -> Self {
        Self {
            prefix: None,
            separator: separator.into(),
            mode,
        }
    }
}

/// Flattens a nested mapping with the default `_` separator, last write wins.
pub fn flatten(map: &Map<String, Value>) -> FlatMap {
    let mut out = FlatMap::new();
    // Last-write-wins never reports a collision.
    let _ = flatten_into(map, None, DEFAULT_KEY_SEPARATOR, FlattenMode::LastWriteWins, &mut out);
    out
}

/// Flattens a nested mapping with explicit options.
pub fn flatten_with(map: &Map<String, Value>, options: &FlattenOptions) -> EngineResult<FlatMap> {
    let mut out = FlatMap::new();
    flatten_into(
        map,
        options.prefix.as_deref(),
        &options.separator,
        options.mode,
        &mut out,
    )?;
    Ok(out)
}

fn flatten_into(
    map: &Map<String, Value>,
    prefix: Option<&str>,
    separator: &str,
    mode: FlattenMode,
    out: &mut FlatMap,
) -> EngineResult<()> {
    for (key, value) in map {
        let joined = match prefix {
            Some(prefix) => format!("{prefix}{separator}{key}"),
            None => key.clone(),
        };

        if let Value::Object(nested) = value {
            flatten_into(nested, Some(&joined), separator, mode, out)?;
            continue;
        }

        if mode == FlattenMode::Strict && out.contains_key(&joined) {
            return Err(EngineError::KeyCollision { key: joined });
        }
        // IndexMap keeps the original slot on overwrite.
        out.insert(joined, value.clone());
    }
    Ok(())
}

/// Renders a flattened value the way it appears in substituted output.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
