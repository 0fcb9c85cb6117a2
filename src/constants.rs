//! Application-wide constants.
//!
//! This module defines the application name plus the fixed tokens shared by
//! the forward and reverse template pipelines.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "LMS Page Generator";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "lms-pagegen";

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "LmsPagegen";

/// Project-local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "lms-pagegen.toml";

/// Separates the component list from the body in a page template.
pub const COMPONENT_DELIMITER: char = '§';

/// Appended to a component name to form the placeholder its output fills.
pub const COMPONENT_KEY_SUFFIX: &str = "-component";

/// Default separator used when joining nested keys.
pub const DEFAULT_KEY_SEPARATOR: &str = "_";

/// File name suffix of page and component templates.
pub const TEMPLATE_FILE_SUFFIX: &str = "-template.txt";

/// Course record field selecting the palette.
pub const STYLE_CODE_FIELD: &str = "style_code";

/// Course record field used in the provenance block.
pub const COURSE_TITLE_FIELD: &str = "course_title";

/// Column holding the course id in CSV course collections.
pub const COURSE_ID_COLUMN: &str = "course_id";

/// Keyword selecting every course or every page.
pub const ALL_KEYWORD: &str = "all";
