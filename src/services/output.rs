//! Writing rendered pages and recovered templates.
//!
//! All writes go through a temp file + rename so a failed run never leaves a
//! half-written page behind.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `<output_dir>/<course_id>/<course_id>_<page>.html`
pub fn page_output_path(output_dir: &Path, course_id: &str, page: &str) -> PathBuf {
    output_dir
        .join(course_id)
        .join(format!("{course_id}_{page}.html"))
}

/// Writes `content` to `path` atomically, creating parent directories.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid output path: {}", path.display()))?;
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_page_output_path() {
        let path = page_output_path(Path::new("out"), "07", "home");
        assert_eq!(path, Path::new("out").join("07").join("07_home.html"));
    }

    #[test]
    fn test_atomic_write_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("07").join("07_home.html");
        atomic_write(&path, "<p>hi</p>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>hi</p>");
        assert!(!temp.path().join("07").join(".07_home.html.tmp").exists());
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("page.html");
        atomic_write(&path, "old").unwrap();
        atomic_write(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
