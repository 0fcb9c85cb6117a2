//! Component composition.
//!
//! A page template declares the components it needs on its first section,
//! separated from the body by [`COMPONENT_DELIMITER`]:
//!
//! ```text
//! navbar cards
//! §
//! <body>{navbar-component}<main>{cards-component}</main></body>
//! ```
//!
//! Each component is rendered on its own and stored as `<name>-component`, so
//! the body refers to it like any other placeholder.

use super::environment::{rewrite, Environment, RewriteRule};
use super::error::{EngineError, EngineResult, ResourceKind};
use super::flatten::FlatMap;
use super::substitute;
use crate::constants::{COMPONENT_DELIMITER, COMPONENT_KEY_SUFFIX};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Supplies page and component template text by name.
pub trait TemplateSource {
    /// Returns the raw page template called `name`.
    fn page_template(&self, name: &str) -> EngineResult<String>;

    /// Returns the component template called `name`.
    fn component_template(&self, name: &str) -> EngineResult<String>;

    /// Lists every page template name, sorted.
    fn page_names(&self) -> EngineResult<Vec<String>>;
}

/// In-memory [`TemplateSource`].
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplates {
    pages: IndexMap<String, String>,
    components: IndexMap<String, String>,
}

impl MemoryTemplates {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page template.
    pub fn with_page(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.pages.insert(name.into(), text.into());
        self
    }

    /// Adds a component template.
    pub fn with_component(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.components.insert(name.into(), text.into());
        self
    }
}

impl TemplateSource for MemoryTemplates {
    fn page_template(&self, name: &str) -> EngineResult<String> {
        self.pages.get(name).cloned().ok_or_else(|| {
            EngineError::missing_resource(ResourceKind::PageTemplate, format!("pages/{name}"))
        })
    }

    fn component_template(&self, name: &str) -> EngineResult<String> {
        self.components.get(name).cloned().ok_or_else(|| {
            EngineError::missing_resource(
                ResourceKind::ComponentTemplate,
                format!("components/{name}"),
            )
        })
    }

    fn page_names(&self) -> EngineResult<Vec<String>> {
        let mut names: Vec<String> = self.pages.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

/// A page template split into its component list and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    /// Page name
    pub name: String,
    /// Required components, duplicates removed, declaration order kept
    pub components: Vec<String>,
    /// Body template
    pub body: String,
}

impl PageTemplate {
    /// Splits raw page template text on the component delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedTemplate`] unless the delimiter appears
    /// exactly once.
    pub fn parse(name: &str, text: &str) -> EngineResult<Self> {
        let delimiter_count = text.matches(COMPONENT_DELIMITER).count();
        let Some((list, body)) = text.split_once(COMPONENT_DELIMITER).filter(|_| delimiter_count == 1)
        else {
            return Err(EngineError::MalformedTemplate {
                template: name.to_string(),
                delimiter: COMPONENT_DELIMITER,
                delimiter_count,
            });
        };

        let mut components: Vec<String> = Vec::new();
        for component in list.split_whitespace() {
            if !components.iter().any(|c| c == component) {
                components.push(component.to_string());
            }
        }

        Ok(Self {
            name: name.to_string(),
            components,
            body: body.trim_start_matches(['\r', '\n']).to_string(),
        })
    }
}

/// Placeholder key filled by a component's rendered output.
pub fn component_key(component: &str) -> String {
    format!("{component}{COMPONENT_KEY_SUFFIX}")
}

/// Environment settings applied to every template before substitution.
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings<'a> {
    /// Target environment
    pub environment: Environment,
    /// Rewrite rules for the local environment
    pub rewrites: &'a [RewriteRule],
}

/// Renders every component `page` requires and returns the data mapping
/// extended with one `<name>-component` entry per component.
///
/// Components see the entries added by components declared before them.
///
/// # Errors
///
/// Fails on the first component whose template is missing or whose
/// placeholders cannot be resolved.
pub fn render_components(
    page: &PageTemplate,
    source: &dyn TemplateSource,
    styles: &FlatMap,
    data: &FlatMap,
    settings: RenderSettings<'_>,
) -> EngineResult<FlatMap> {
    let mut data = data.clone();

    for component in &page.components {
        let template = source.component_template(component)?;
        let template = rewrite(&template, settings.environment, settings.rewrites);
        let fragment = substitute::render(&template, &[&data, styles])?;
        debug!(page = %page.name, component = %component, bytes = fragment.len(), "rendered component");
        data.insert(component_key(component), Value::String(fragment));
    }

    Ok(data)
}

/// Renders the body of `page`: components first, then the body itself.
pub fn compose(
    page: &PageTemplate,
    source: &dyn TemplateSource,
    styles: &FlatMap,
    data: &FlatMap,
    settings: RenderSettings<'_>,
) -> EngineResult<String> {
    let data = render_components(page, source, styles, data, settings)?;
    let body = rewrite(&page.body, settings.environment, settings.rewrites);
    substitute::render(&body, &[&data, styles])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(pairs: &[(&str, &str)]) -> FlatMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), json!(v)))
            .collect()
    }

    const NO_REWRITES: RenderSettings<'static> = RenderSettings {
        environment: Environment::Qlearn,
        rewrites: &[],
    };

    #[test]
    fn test_parse_page_template() {
        let page = PageTemplate::parse("home", "navbar cards navbar\n§\n<body>{navbar-component}</body>")
            .unwrap();
        assert_eq!(page.components, vec!["navbar", "cards"]);
        assert_eq!(page.body, "<body>{navbar-component}</body>");
    }

    #[test]
    fn test_parse_empty_component_list() {
        let page = PageTemplate::parse("plain", "§<p>{course_title}</p>").unwrap();
        assert!(page.components.is_empty());
        assert_eq!(page.body, "<p>{course_title}</p>");
    }

    #[test]
    fn test_parse_missing_delimiter() {
        let err = PageTemplate::parse("home", "<body></body>").unwrap_err();
        assert!(matches!(
            err,
            EngineError::MalformedTemplate { delimiter_count: 0, .. }
        ));
    }

    #[test]
    fn test_parse_duplicate_delimiter() {
        let err = PageTemplate::parse("home", "navbar § <p>§</p>").unwrap_err();
        assert!(matches!(
            err,
            EngineError::MalformedTemplate { delimiter_count: 2, ref template, .. } if template == "home"
        ));
    }

    #[test]
    fn test_compose_injects_components() {
        let source = MemoryTemplates::new()
            .with_component("navbar", r#"<nav style="color:{nav_text}">{course_title}</nav>"#)
            .with_component("cards", "<div>{navbar-component}|{card_count}</div>");
        let page = PageTemplate::parse(
            "home",
            "navbar cards\n§\n<body>{navbar-component}{cards-component}</body>",
        )
        .unwrap();
        let styles = flat(&[("nav_text", "#ffffff")]);
        let data = flat(&[("course_title", "Science"), ("card_count", "3")]);

        let body = compose(&page, &source, &styles, &data, NO_REWRITES).unwrap();
        assert_eq!(
            body,
            r##"<body><nav style="color:#ffffff">Science</nav><div><nav style="color:#ffffff">Science</nav>|3</div></body>"##
        );
    }

    #[test]
    fn test_compose_does_not_mutate_caller_data() {
        let source = MemoryTemplates::new().with_component("navbar", "<nav/>");
        let page = PageTemplate::parse("home", "navbar§{navbar-component}").unwrap();
        let data = FlatMap::new();
        compose(&page, &source, &FlatMap::new(), &data, NO_REWRITES).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_compose_missing_component_template() {
        let source = MemoryTemplates::new();
        let page = PageTemplate::parse("home", "footer§{footer-component}").unwrap();
        let err = compose(&page, &source, &FlatMap::new(), &FlatMap::new(), NO_REWRITES)
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingResource { .. }));
    }

    #[test]
    fn test_compose_missing_key_inside_component() {
        let source = MemoryTemplates::new().with_component("navbar", "<nav>{nav_links}</nav>");
        let page = PageTemplate::parse("home", "navbar§{navbar-component}").unwrap();
        let err = compose(&page, &source, &FlatMap::new(), &FlatMap::new(), NO_REWRITES)
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingKey { ref key } if key == "nav_links"));
    }

    #[test]
    fn test_compose_local_rewrites_components_and_body() {
        let rules = vec![RewriteRule::new(".qlearn", ".local")];
        let settings = RenderSettings {
            environment: Environment::Local,
            rewrites: &rules,
        };
        let source = MemoryTemplates::new().with_component("navbar", r#"<a href="home.qlearn">"#);
        let page = PageTemplate::parse("home", r#"navbar§{navbar-component}<img src="x.qlearn">"#)
            .unwrap();
        let body = compose(&page, &source, &FlatMap::new(), &FlatMap::new(), settings).unwrap();
        assert_eq!(body, r#"<a href="home.local"><img src="x.local">"#);
    }
}
