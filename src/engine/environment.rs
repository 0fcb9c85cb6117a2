//! Environment variant rewriting.
//!
//! Templates are authored for the production LMS. When rendering for local
//! preview, reserved production markers are swapped for their local
//! equivalents before any placeholder is resolved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target environment of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// The production LMS
    #[default]
    Qlearn,
    /// Local preview / test
    Local,
}

impl Environment {
    /// Returns true for the local preview target.
    pub const fn is_local(self) -> bool {
        matches!(self, Self::Local)
    }

    /// Keyword used in commands and flags.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qlearn => "qlearn",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qlearn" => Ok(Self::Qlearn),
            "local" => Ok(Self::Local),
            other => Err(format!(
                "unknown environment '{other}', expected 'qlearn' or 'local'"
            )),
        }
    }
}

/// A verbatim substring replacement applied in the local environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    /// Production marker to look for
    pub from: String,
    /// Local replacement
    pub to: String,
}

impl RewriteRule {
    /// Creates a rule.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Returns true when a non-empty proper prefix of `marker` is also a suffix
/// of it, so occurrences can overlap and removing one can leave another.
pub fn marker_self_overlaps(marker: &str) -> bool {
    (1..marker.len())
        .filter(|&n| marker.is_char_boundary(n))
        .any(|n| marker.ends_with(&marker[..n]))
}

/// Returns true when writing `replacement` into arbitrary text could produce
/// a new occurrence of `marker`, either inside the replacement or across its
/// edges.
pub fn replacement_can_form(replacement: &str, marker: &str) -> bool {
    if replacement.is_empty() {
        // Text on both sides of a removed marker joins up.
        return marker.chars().count() > 1;
    }
    replacement.contains(marker)
        || marker.contains(replacement)
        || (1..replacement.len())
            .filter(|&n| replacement.is_char_boundary(n))
            .any(|n| marker.starts_with(&replacement[n..]) || marker.ends_with(&replacement[..n]))
}

/// Applies `rules` to `template` when `environment` is local.
///
/// Rules run in order. The production environment returns the template as is.
pub fn rewrite(template: &str, environment: Environment, rules: &[RewriteRule]) -> String {
    if !environment.is_local() {
        return template.to_string();
    }

    rules
        .iter()
        .filter(|rule| !rule.from.is_empty())
        .fold(template.to_string(), |text, rule| {
            text.replace(&rule.from, &rule.to)
        })
}
