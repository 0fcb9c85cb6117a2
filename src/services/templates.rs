//! Template files on disk.
//!
//! ```text
//! <templates_dir>/pages/<page>-template.txt
//! <templates_dir>/components/<component>-template.txt
//! ```

use crate::constants::TEMPLATE_FILE_SUFFIX;
use crate::engine::{EngineError, EngineResult, ResourceKind, TemplateSource};
use crate::parser::data::read_resource;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads page and component templates from a templates directory.
#[derive(Debug, Clone)]
pub struct FsTemplates {
    root: PathBuf,
}

impl FsTemplates {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Templates directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the page template called `name`.
    pub fn page_path(&self, name: &str) -> PathBuf {
        self.root.join("pages").join(template_file_name(name))
    }

    /// Path of the component template called `name`.
    pub fn component_path(&self, name: &str) -> PathBuf {
        self.root.join("components").join(template_file_name(name))
    }
}

impl TemplateSource for FsTemplates {
    fn page_template(&self, name: &str) -> EngineResult<String> {
        read_resource(&self.page_path(name), ResourceKind::PageTemplate)
    }

    fn component_template(&self, name: &str) -> EngineResult<String> {
        read_resource(&self.component_path(name), ResourceKind::ComponentTemplate)
    }

    fn page_names(&self) -> EngineResult<Vec<String>> {
        let pages_dir = self.root.join("pages");
        let entries = fs::read_dir(&pages_dir).map_err(|_| {
            EngineError::missing_resource(ResourceKind::PageTemplate, pages_dir.clone())
        })?;

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|file| file.strip_suffix(TEMPLATE_FILE_SUFFIX))
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }
}

/// `<name>-template.txt`
pub fn template_file_name(name: &str) -> String {
    format!("{name}{TEMPLATE_FILE_SUFFIX}")
}
