//! Configuration management for the application.
//!
//! This module handles loading and validating configuration in TOML format:
//! where templates, palettes and course data live, how keys are flattened,
//! and which markers are rewritten for local preview.

use crate::constants::{CONFIG_DIR_NAME, DEFAULT_KEY_SEPARATOR, LOCAL_CONFIG_FILE};
use crate::engine::environment::{marker_self_overlaps, replacement_can_form};
use crate::engine::substitute::is_key_char;
use crate::engine::{FlattenMode, FlattenOptions, RewriteRule};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory holding `pages/` and `components/`
    pub templates_dir: PathBuf,
    /// Palette collection (JSON, keyed by style code)
    pub palettes: PathBuf,
    /// Course collection (JSON keyed by course id, or CSV with a header row)
    pub courses: PathBuf,
    /// Root of rendered output (`<course>/<course>_<page>.html`)
    pub output_dir: PathBuf,
    /// Where recovered templates are written
    pub converted_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("LMS Templates"),
            palettes: PathBuf::from("css/palettes.json"),
            courses: PathBuf::from("data/sitedata.json"),
            output_dir: PathBuf::from("LMS Templates"),
            converted_dir: PathBuf::from("LMS Templates/converted"),
        }
    }
}

/// Flattening settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Separator between nested key segments
    pub separator: String,
    /// Fail on flattened key collisions instead of last-write-wins
    pub strict_flatten: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_KEY_SEPARATOR.to_string(),
            strict_flatten: false,
        }
    }
}

/// Local preview rewrite rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Applied in order when rendering for the local environment
    pub rewrites: Vec<RewriteRule>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            rewrites: vec![RewriteRule::new(".qlearn", ".local")],
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// 1. `--config <file>`
/// 2. `lms-pagegen.toml` in the working directory
/// 3. Linux: `~/.config/LmsPagegen/config.toml`,
///    macOS: `~/Library/Application Support/LmsPagegen/config.toml`,
///    Windows: `%APPDATA%\LmsPagegen\config.toml`
///
/// Relative paths inside a config file resolve against the file's directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// File system paths
    pub paths: PathConfig,
    /// Flattening settings
    pub render: RenderConfig,
    /// Environment rewrite rules
    pub environment: EnvironmentConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the user config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration following the lookup order documented on [`Config`].
    ///
    /// An explicit path must exist; the implicit locations fall through to
    /// defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Self::load_from(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::load_from(&local);
        }

        if let Ok(user) = Self::config_file_path() {
            if user.is_file() {
                return Self::load_from(&user);
            }
        }

        let config = Self::new();
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a config file, rebasing relative paths onto the
    /// file's directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.rebase(base);
        }

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - separator is not empty and only uses placeholder key characters
    ///   (ASCII letters, digits, `_`, `.`, `-`), so every flattened key can be
    ///   written as `{key}`
    /// - every rewrite rule has a non-empty `from` and a non-empty `to`
    /// - no rule's `to` contains `{` or `}`
    /// - no `from` can overlap itself
    /// - no rule's `to` can form any rule's `from`, on its own or together
    ///   with the surrounding text
    ///
    /// The last three make local rewriting idempotent.
    pub fn validate(&self) -> Result<()> {
        let separator = &self.render.separator;
        if separator.is_empty() {
            anyhow::bail!("render.separator must not be empty");
        }
        if !separator.chars().all(is_key_char) {
            anyhow::bail!(
                "render.separator '{separator}' may only contain ASCII letters, digits, '_', '.' or '-'"
            );
        }

        let rules = &self.environment.rewrites;
        for (index, rule) in rules.iter().enumerate() {
            if rule.from.is_empty() {
                anyhow::bail!("environment.rewrites[{index}].from must not be empty");
            }
            if rule.to.is_empty() {
                anyhow::bail!("environment.rewrites[{index}].to must not be empty");
            }
            if rule.to.contains(['{', '}']) {
                anyhow::bail!(
                    "environment.rewrites[{index}]: replacement '{}' must not contain braces",
                    rule.to
                );
            }
            if marker_self_overlaps(&rule.from) {
                anyhow::bail!(
                    "environment.rewrites[{index}]: marker '{}' overlaps itself",
                    rule.from
                );
            }
        }

        for (index, rule) in rules.iter().enumerate() {
            for (other_index, other) in rules.iter().enumerate() {
                if replacement_can_form(&rule.to, &other.from) {
                    anyhow::bail!(
                        "environment.rewrites[{index}]: replacement '{}' can recreate marker '{}' of environment.rewrites[{other_index}]",
                        rule.to,
                        other.from
                    );
                }
            }
        }

        Ok(())
    }

    /// Flattening options derived from the render settings.
    pub fn flatten_options(&self) -> FlattenOptions {
        let mode = if self.render.strict_flatten {
            FlattenMode::Strict
        } else {
            FlattenMode::LastWriteWins
        };
        FlattenOptions::new(self.render.separator.clone(), mode)
    }

    fn rebase(&mut self, base: &Path) {
        let paths = &mut self.paths;
        for path in [
            &mut paths.templates_dir,
            &mut paths.palettes,
            &mut paths.courses,
            &mut paths.output_dir,
            &mut paths.converted_dir,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
