//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the lms-pagegen binary
pub fn pagegen_bin() -> &'static str {
    env!("CARGO_BIN_EXE_lms-pagegen")
}

/// Home page: one component, a palette value, course data and a rewrite marker.
pub const HOME_PAGE: &str = "navbar\n§\n<body style=\"background:{page_background}\">\n{navbar-component}\n<p class=\"note.qlearn\">{course_title}</p>\n</body>\n";

/// About page: no components.
pub const ABOUT_PAGE: &str = "§\n<h1 style=\"color:{text_color}\">About {course_title}</h1>\n";

/// Navbar component.
pub const NAVBAR_COMPONENT: &str = "<nav style=\"color:{text_color}\">{course_title}</nav>";

/// Palettes keyed by style code; nested keys flatten to `page_background` etc.
pub const PALETTES_JSON: &str = r##"{
  "07": { "page": { "background": "#1a1a1a" }, "text": { "color": "#ffffff" } },
  "09": { "page": { "background": "#fafafa" }, "text": { "color": "#222222" } }
}"##;

/// Two valid courses.
pub const COURSES_JSON: &str = r#"{
  "07": { "style_code": "07", "course_title": "Year 7 Science" },
  "09": { "style_code": "09", "course_title": "Year 9 History" }
}"#;

/// Courses where the last one names a style code with no palette.
pub const COURSES_WITH_BROKEN_JSON: &str = r#"{
  "07": { "style_code": "07", "course_title": "Year 7 Science" },
  "09": { "style_code": "09", "course_title": "Year 9 History" },
  "11": { "style_code": "99", "course_title": "Year 11 Art" }
}"#;

/// A throwaway project directory with templates, data and a config file.
pub struct TestProject {
    /// Keeps the directory alive for the duration of the test
    pub temp_dir: TempDir,
}

impl TestProject {
    /// Creates a project with the home and about pages, the navbar component,
    /// two palettes and two courses.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let project = Self { temp_dir };

        project.write(
            "lms-pagegen.toml",
            r#"
[paths]
templates_dir = "templates"
palettes = "palettes.json"
courses = "sitedata.json"
output_dir = "out"
converted_dir = "converted"
"#,
        );
        project.write_page("home", HOME_PAGE);
        project.write_page("about", ABOUT_PAGE);
        project.write_component("navbar", NAVBAR_COMPONENT);
        project.write("palettes.json", PALETTES_JSON);
        project.write("sitedata.json", COURSES_JSON);
        project
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a project file.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Config file path.
    pub fn config_path(&self) -> PathBuf {
        self.path("lms-pagegen.toml")
    }

    /// Writes a project file, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directory");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    /// Writes `templates/pages/<name>-template.txt`.
    pub fn write_page(&self, name: &str, content: &str) {
        self.write(&format!("templates/pages/{name}-template.txt"), content);
    }

    /// Writes `templates/components/<name>-template.txt`.
    pub fn write_component(&self, name: &str, content: &str) {
        self.write(&format!("templates/components/{name}-template.txt"), content);
    }

    /// Reads a project file.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }

    /// Runs the binary from the project root with `--config` pointing at the
    /// project's config file.
    pub fn run(&self, args: &[&str]) -> Output {
        let config = self.config_path();
        Command::new(pagegen_bin())
            .current_dir(self.root())
            .arg("--config")
            .arg(&config)
            .args(args)
            .output()
            .expect("Failed to execute command")
    }
}

/// Asserts the process exit code, printing stderr on mismatch.
pub fn assert_exit_code(output: &Output, expected: i32) {
    assert_eq!(
        output.status.code(),
        Some(expected),
        "Unexpected exit code. stdout: {} stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Captured stdout as a string.
pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Captured stderr as a string.
pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
