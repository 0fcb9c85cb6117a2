//! Template recovery: the reverse of rendering.
//!
//! Given a rendered page, the style code in its provenance block selects a
//! palette; every literal palette value found in the page is turned back into
//! its `{key}` placeholder. Values are replaced longest first so `#000` can
//! never eat the front of `#000000`, and text already turned into a
//! placeholder is never matched again.

use super::error::EngineResult;
use super::flatten::{FlatMap, FlattenOptions};
use super::provenance::{self, Provenance};
use super::substitute::{escape_literal, is_placeholder_key};
use crate::models::PaletteCollection;
use regex::RegexBuilder;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Outcome of [`recover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredTemplate {
    /// Style code read from the provenance block
    pub style_code: String,
    /// Course title read from the provenance block, if present
    pub course_title: Option<String>,
    /// Template body; still needs a component list before it can be composed
    pub template: String,
    /// Substitutions made, in the order they were applied
    pub substitutions: Vec<Substitution>,
}

/// One palette entry that was found in the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    /// Placeholder key
    pub key: String,
    /// Literal value that was replaced
    pub value: String,
    /// Number of occurrences replaced
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Recovers a reusable template from a rendered page.
///
/// # Errors
///
/// [`EngineError::MissingProvenance`](super::EngineError::MissingProvenance)
/// when the page has no style code, and
/// [`EngineError::UnknownStyleCode`](super::EngineError::UnknownStyleCode)
/// when the palette collection does not know it.
pub fn recover(
    html: &str,
    palettes: &PaletteCollection,
    options: &FlattenOptions,
) -> EngineResult<RecoveredTemplate> {
    let Provenance {
        style_code,
        course_title,
    } = provenance::extract(html)?;
    let palette = palettes.flattened(&style_code, options)?;

    let content = provenance::strip_local_shell(html).unwrap_or(html);
    let content = provenance::strip(content);
    let (template, substitutions) = reverse_substitute(&content, &palette);

    Ok(RecoveredTemplate {
        style_code,
        course_title,
        template,
        substitutions,
    })
}

/// Replaces literal palette values in `text` with their placeholders.
///
/// Only string values whose key fits the placeholder grammar take part. When several keys share a value (compared
/// case-insensitively) the first-declared key wins. Pre-existing `{key}`
/// shaped text is escaped so it stays literal when the result is rendered.
pub fn reverse_substitute(text: &str, palette: &FlatMap) -> (String, Vec<Substitution>) {
    let mut segments = vec![Segment::Literal(text.to_string())];
    let mut substitutions = Vec::new();

    for (key, value) in candidates(palette) {
        let count = replace_in_segments(&mut segments, &key, &value);
        debug!(key = %key, value = %value, count, "reverse substitution");
        if count > 0 {
            substitutions.push(Substitution { key, value, count });
        }
    }

    (assemble(&segments), substitutions)
}

/// String entries ordered longest value first; equal lengths keep declaration
/// order and duplicate values keep only their first key.
fn candidates(palette: &FlatMap) -> Vec<(String, String)> {
    let mut seen: Vec<String> = Vec::new();
    let mut entries: Vec<(String, String)> = Vec::new();

    for (key, value) in palette {
        let Value::String(value) = value else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        if !is_placeholder_key(key) {
            warn!(key = %key, value = %value, "palette key cannot be written as a placeholder, value left literal");
            continue;
        }
        let folded = value.to_lowercase();
        if seen.contains(&folded) {
            debug!(key = %key, value = %value, "duplicate palette value, first key wins");
            continue;
        }
        seen.push(folded);
        entries.push((key.clone(), value.clone()));
    }

    // Stable sort keeps declaration order among equal lengths.
    entries.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    entries
}

fn replace_in_segments(segments: &mut Vec<Segment>, key: &str, value: &str) -> usize {
    let Ok(pattern) = RegexBuilder::new(&regex::escape(value))
        .case_insensitive(true)
        .build()
    else {
        return 0;
    };

    let mut count = 0;
    let mut result = Vec::with_capacity(segments.len());

    for segment in segments.drain(..) {
        let Segment::Literal(text) = segment else {
            result.push(segment);
            continue;
        };

        let mut last = 0;
        for found in pattern.find_iter(&text) {
            if found.start() > last {
                result.push(Segment::Literal(text[last..found.start()].to_string()));
            }
            result.push(Segment::Placeholder(key.to_string()));
            last = found.end();
            count += 1;
        }
        if last < text.len() {
            result.push(Segment::Literal(text[last..].to_string()));
        }
    }

    *segments = result;
    count
}

fn assemble(segments: &[Segment]) -> String {
    let mut output = String::new();

    for (index, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Placeholder(key) => {
                output.push('{');
                output.push_str(key);
                output.push('}');
            }
            Segment::Literal(text) => {
                let mut escaped = escape_literal(text);
                // An odd run of '{' would pair with the placeholder that follows.
                let next_is_placeholder =
                    matches!(segments.get(index + 1), Some(Segment::Placeholder(_)));
                let trailing = escaped.chars().rev().take_while(|&c| c == '{').count();
                if next_is_placeholder && trailing % 2 == 1 {
                    escaped.push('{');
                }
                output.push_str(&escaped);
            }
        }
    }

    output
}
