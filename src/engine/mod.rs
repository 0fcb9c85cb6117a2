//! Bidirectional template engine.
//!
//! The forward pipeline composes a page from a page template, its
//! components, a flattened course record and a flattened palette, then tags
//! the result with a provenance block. The reverse pipeline reads that block
//! back, finds the palette, and turns literal palette values into
//! placeholders again.

pub mod compose;
pub mod environment;
pub mod error;
pub mod flatten;
pub mod provenance;
pub mod recovery;
pub mod substitute;

pub use compose::{MemoryTemplates, PageTemplate, RenderSettings, TemplateSource};
pub use environment::{Environment, RewriteRule};
pub use error::{EngineError, EngineResult, ResourceKind};
pub use flatten::{flatten, flatten_with, FlatMap, FlattenMode, FlattenOptions};
pub use recovery::{recover, RecoveredTemplate, Substitution};

/// Renders complete pages (provenance block + composed body).
pub struct PageRenderer<'a> {
    source: &'a dyn TemplateSource,
    settings: RenderSettings<'a>,
}

impl<'a> PageRenderer<'a> {
    /// Creates a renderer reading templates from `source`.
    pub fn new(source: &'a dyn TemplateSource, settings: RenderSettings<'a>) -> Self {
        Self { source, settings }
    }

    /// Target environment of this renderer.
    pub fn environment(&self) -> Environment {
        self.settings.environment
    }

    /// Renders `page_name` for one course.
    ///
    /// In the local environment the result is wrapped in a minimal document
    /// shell. The course title is made comment-safe and may be altered in the
    /// provenance block; the style code must be recordable as is.
    pub fn render(
        &self,
        page_name: &str,
        style_code: &str,
        course_title: &str,
        styles: &FlatMap,
        data: &FlatMap,
    ) -> EngineResult<String> {
        provenance::check_style_code(style_code)?;
        let text = self.source.page_template(page_name)?;
        let page = PageTemplate::parse(page_name, &text)?;
        let body = compose::compose(&page, self.source, styles, data, self.settings)?;

        let content = format!("{}{body}", provenance::tag(style_code, course_title));
        if self.settings.environment.is_local() {
            Ok(provenance::wrap_local_shell(course_title, &content))
        } else {
            Ok(content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> MemoryTemplates {
        MemoryTemplates::new()
            .with_page(
                "home",
                "navbar\n§\n<body style=\"background:{page_background}\">{navbar-component}</body>",
            )
            .with_component("navbar", "<nav>{course_title}</nav>")
    }

    fn styles() -> FlatMap {
        [("page_background".to_string(), json!("#1a1a1a"))]
            .into_iter()
            .collect()
    }

    fn data() -> FlatMap {
        [("course_title".to_string(), json!("Science"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_render_page_production() {
        let source = source();
        let renderer = PageRenderer::new(
            &source,
            RenderSettings {
                environment: Environment::Qlearn,
                rewrites: &[],
            },
        );
        let html = renderer
            .render("home", "07", "Science", &styles(), &data())
            .unwrap();
        assert!(html.starts_with(provenance::PROVENANCE_RULE));
        assert!(html.ends_with(
            "<body style=\"background:#1a1a1a\"><nav>Science</nav></body>"
        ));
        assert_eq!(provenance::extract(&html).unwrap().style_code, "07");
    }

    #[test]
    fn test_render_page_local_is_wrapped() {
        let source = source();
        let renderer = PageRenderer::new(
            &source,
            RenderSettings {
                environment: Environment::Local,
                rewrites: &[],
            },
        );
        let html = renderer
            .render("home", "07", "Science", &styles(), &data())
            .unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(provenance::strip_local_shell(&html).is_some());
    }

    #[test]
    fn test_render_missing_page() {
        let source = source();
        let renderer = PageRenderer::new(
            &source,
            RenderSettings {
                environment: Environment::Qlearn,
                rewrites: &[],
            },
        );
        let err = renderer
            .render("unit", "07", "Science", &styles(), &data())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::MissingResource {
                kind: ResourceKind::PageTemplate,
                ..
            }
        ));
    }

    #[test]
    fn test_render_rejects_style_code_that_cannot_round_trip() {
        let source = source();
        let renderer = PageRenderer::new(
            &source,
            RenderSettings {
                environment: Environment::Qlearn,
                rewrites: &[],
            },
        );
        let err = renderer
            .render("home", "year--7", "Science", &styles(), &data())
            .unwrap_err();
        assert!(matches!(err, EngineError::UnrecordableStyleCode { ref code } if code == "year--7"));
    }
}
