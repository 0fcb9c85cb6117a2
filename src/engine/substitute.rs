//! Placeholder substitution.
//!
//! A placeholder is `{key}` with `key` made of ASCII letters, digits, `_`, `.`
//! or `-`. `{{` and `}}` produce literal braces. Any other brace is plain text,
//! so inline CSS such as `a { color: red }` passes through untouched.

use super::error::{EngineError, EngineResult};
use super::flatten::{value_to_text, FlatMap};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z0-9_.\-]+)\}").expect("placeholder pattern is valid")
});

/// Returns true when `key` can be written as a `{key}` placeholder.
pub fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_key_char)
}

/// Characters allowed inside a placeholder key.
pub fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Renders `template`, resolving each placeholder against `mappings`.
///
/// Later mappings take precedence over earlier ones when both define a key.
/// Substituted values are inserted verbatim and never re-scanned.
///
/// # Errors
///
/// Returns [`EngineError::MissingKey`] for the first placeholder no mapping
/// defines.
pub fn render(template: &str, mappings: &[&FlatMap]) -> EngineResult<String> {
    let mut output = String::with_capacity(template.len());
    let mut last = 0;

    for caps in TOKEN_RE.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        output.push_str(&template[last..whole.start()]);
        last = whole.end();

        match caps.get(1) {
            Some(key) => {
                let key = key.as_str();
                let value = mappings
                    .iter()
                    .rev()
                    .find_map(|mapping| mapping.get(key))
                    .ok_or_else(|| EngineError::missing_key(key))?;
                output.push_str(&value_to_text(value));
            }
            None if whole.as_str() == "{{" => output.push('{'),
            None => output.push('}'),
        }
    }

    output.push_str(&template[last..]);
    Ok(output)
}

/// Lists the distinct placeholder keys referenced by `template`, in order of
/// first appearance. Escaped braces are not placeholders.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in TOKEN_RE.captures_iter(template) {
        if let Some(key) = caps.get(1) {
            if !keys.iter().any(|k| k == key.as_str()) {
                keys.push(key.as_str().to_string());
            }
        }
    }
    keys
}

/// Escapes text so that rendering it yields the text unchanged: `{key}` shaped
/// tokens become `{{key}}` and existing `{{`/`}}` pairs are doubled.
pub fn escape_literal(text: &str) -> String {
    TOKEN_RE
        .replace_all(text, |caps: &Captures<'_>| match caps.get(1) {
            Some(key) => format!("{{{{{}}}}}", key.as_str()),
            None => caps[0].repeat(2),
        })
        .into_owned()
}
