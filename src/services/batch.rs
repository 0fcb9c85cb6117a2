//! Batch driver for generate runs.
//!
//! Iterates the selected courses × pages and renders each pair to completion
//! before starting the next. Failures are collected per pair; the
//! [`FailurePolicy`] decides whether the first one ends the run.

use crate::engine::{
    EngineError, EngineResult, FlattenOptions, PageRenderer, RenderSettings, RewriteRule,
    TemplateSource,
};
use crate::models::{CourseCollection, CourseRecord, GenerateRun, PaletteCollection, Scope};
use std::fmt;
use tracing::{info, warn};

/// What to do when a (course, page) render fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure
    #[default]
    FailFast,
    /// Attempt every pair and report all failures
    CollectAll,
}

/// A successfully rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Course id
    pub course_id: String,
    /// Page name
    pub page: String,
    /// Style code used
    pub style_code: String,
    /// Rendered HTML
    pub html: String,
}

/// A failed (course, page) render.
#[derive(Debug)]
pub struct RenderFailure {
    /// Course id
    pub course_id: String,
    /// Page name
    pub page: String,
    /// Underlying engine error
    pub error: EngineError,
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "course '{}', page '{}': {}",
            self.course_id, self.page, self.error
        )
    }
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Pages rendered successfully, in render order
    pub pages: Vec<RenderedPage>,
    /// Failed pairs, in render order
    pub failures: Vec<RenderFailure>,
}

impl BatchReport {
    /// Returns true when no pair failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders pages for a generate run.
pub struct BatchDriver<'a> {
    palettes: &'a PaletteCollection,
    courses: &'a CourseCollection,
    source: &'a dyn TemplateSource,
    rewrites: &'a [RewriteRule],
    flatten: FlattenOptions,
    policy: FailurePolicy,
}

impl<'a> BatchDriver<'a> {
    /// Creates a driver over read-only collections.
    pub fn new(
        palettes: &'a PaletteCollection,
        courses: &'a CourseCollection,
        source: &'a dyn TemplateSource,
        rewrites: &'a [RewriteRule],
    ) -> Self {
        Self {
            palettes,
            courses,
            source,
            rewrites,
            flatten: FlattenOptions::default(),
            policy: FailurePolicy::default(),
        }
    }

    /// Sets the flattening options used for palettes and course records.
    pub fn with_flatten(mut self, flatten: FlattenOptions) -> Self {
        self.flatten = flatten;
        self
    }

    /// Sets the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolves the course scope to records, in collection order.
    pub fn resolve_courses(&self, scope: &Scope) -> EngineResult<Vec<&'a CourseRecord>> {
        let courses: &'a CourseCollection = self.courses;
        match scope {
            Scope::All => Ok(courses.ids().filter_map(|id| courses.get(id)).collect()),
            Scope::One(id) => courses
                .get(id)
                .map(|record| vec![record])
                .ok_or_else(|| EngineError::UnknownCourse {
                    course_id: id.clone(),
                }),
        }
    }

    /// Resolves the page scope to page names.
    pub fn resolve_pages(&self, scope: &Scope) -> EngineResult<Vec<String>> {
        match scope {
            Scope::All => self.source.page_names(),
            Scope::One(page) => Ok(vec![page.clone()]),
        }
    }

    /// Runs the batch.
    ///
    /// # Errors
    ///
    /// Scope resolution errors (unknown course, unreadable pages directory)
    /// are returned before anything renders. Per-pair failures land in the
    /// report instead.
    pub fn run(&self, run: &GenerateRun) -> EngineResult<BatchReport> {
        let courses = self.resolve_courses(&run.courses)?;
        let pages = self.resolve_pages(&run.pages)?;
        let renderer = PageRenderer::new(
            self.source,
            RenderSettings {
                environment: run.environment,
                rewrites: self.rewrites,
            },
        );

        let mut report = BatchReport::default();
        for course in courses {
            for page in &pages {
                match self.render_one(&renderer, course, page) {
                    Ok(rendered) => {
                        info!(course = %course.id, page = %page, environment = %run.environment, "rendered page");
                        report.pages.push(rendered);
                    }
                    Err(error) => {
                        let failure = RenderFailure {
                            course_id: course.id.clone(),
                            page: page.clone(),
                            error,
                        };
                        if self.policy == FailurePolicy::FailFast {
                            report.failures.push(failure);
                            return Ok(report);
                        }
                        warn!("{failure}");
                        report.failures.push(failure);
                    }
                }
            }
        }

        Ok(report)
    }

    fn render_one(
        &self,
        renderer: &PageRenderer<'_>,
        course: &CourseRecord,
        page: &str,
    ) -> EngineResult<RenderedPage> {
        let style_code = course.style_code()?;
        let course_title = course.course_title()?;
        let styles = self.palettes.flattened(&style_code, &self.flatten)?;
        let data = course.flattened(&self.flatten)?;
        let html = renderer.render(page, &style_code, &course_title, &styles, &data)?;

        Ok(RenderedPage {
            course_id: course.id.clone(),
            page: page.to_string(),
            style_code,
            html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Environment, MemoryTemplates};
    use serde_json::json;

    fn palettes() -> PaletteCollection {
        PaletteCollection::from_value(json!({
            "07": {"page": {"background": "#1a1a1a"}},
            "08": {"page": {"background": "#f0f0f0"}}
        }))
        .unwrap()
    }

    fn courses() -> CourseCollection {
        CourseCollection::from_value(json!({
            "07": {"course_title": "Science", "style_code": "07"},
            "08": {"course_title": "Maths", "style_code": "08"},
            "09": {"course_title": "History", "style_code": "99"}
        }))
        .unwrap()
    }

    fn source() -> MemoryTemplates {
        MemoryTemplates::new()
            .with_page("home", "§<body style=\"background:{page_background}\">{course_title}</body>")
            .with_page("class", "§<h1>{course_title}</h1>")
    }

    fn run(courses: Scope, pages: Scope) -> GenerateRun {
        GenerateRun {
            environment: Environment::Qlearn,
            courses,
            pages,
        }
    }

    #[test]
    fn test_single_course_single_page() {
        let (palettes, courses, source) = (palettes(), courses(), source());
        let driver = BatchDriver::new(&palettes, &courses, &source, &[]);
        let report = driver
            .run(&run(Scope::One("08".into()), Scope::One("home".into())))
            .unwrap();
        assert!(report.is_success());
        assert_eq!(report.pages.len(), 1);
        assert!(report.pages[0].html.contains("background:#f0f0f0"));
        assert_eq!(report.pages[0].style_code, "08");
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let (palettes, courses, source) = (palettes(), courses(), source());
        let driver = BatchDriver::new(&palettes, &courses, &source, &[]);
        let report = driver.run(&run(Scope::All, Scope::All)).unwrap();
        // 07 and 08 render both pages; 09 fails on its first page.
        assert_eq!(report.pages.len(), 4);
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.course_id, "09");
        assert_eq!(failure.page, "class");
        assert!(matches!(failure.error, EngineError::UnknownStyleCode { .. }));
        assert!(failure.to_string().starts_with("course '09', page 'class':"));
    }

    #[test]
    fn test_collect_all_attempts_every_pair() {
        let (palettes, courses, source) = (palettes(), courses(), source());
        let driver = BatchDriver::new(&palettes, &courses, &source, &[])
            .with_policy(FailurePolicy::CollectAll);
        let report = driver.run(&run(Scope::All, Scope::All)).unwrap();
        assert_eq!(report.pages.len(), 4);
        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn test_unknown_course_scope() {
        let (palettes, courses, source) = (palettes(), courses(), source());
        let driver = BatchDriver::new(&palettes, &courses, &source, &[]);
        let err = driver
            .run(&run(Scope::One("42".into()), Scope::All))
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownCourse { course_id } if course_id == "42"));
    }

    #[test]
    fn test_pages_render_in_sorted_order() {
        let (palettes, courses, source) = (palettes(), courses(), source());
        let driver = BatchDriver::new(&palettes, &courses, &source, &[]);
        let report = driver
            .run(&run(Scope::One("07".into()), Scope::All))
            .unwrap();
        let pages: Vec<&str> = report.pages.iter().map(|p| p.page.as_str()).collect();
        assert_eq!(pages, vec!["class", "home"]);
    }
}
