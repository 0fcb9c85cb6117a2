//! Generate command: render course pages from templates.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::engine::Environment;
use crate::models::{GenerateRun, Scope};
use crate::parser::{load_courses, load_palettes};
use crate::services::{
    atomic_write, page_output_path, BatchDriver, BatchReport, FailurePolicy, FsTemplates,
};
use clap::Args;

/// Render course pages from templates, palettes and course data
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Target environment: qlearn or local
    #[arg(short, long, value_name = "ENV")]
    pub env: Environment,

    /// Course id, or "all"
    #[arg(short, long, value_name = "ID", default_value = "all")]
    pub course: String,

    /// Page name, or "all"
    #[arg(short, long, value_name = "NAME", default_value = "all")]
    pub page: String,

    /// Render every pair and write the successes even if some fail
    #[arg(long)]
    pub keep_going: bool,

    /// Render without writing any files
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        if self.course.trim().is_empty() || self.page.trim().is_empty() {
            return Err(CliError::validation("--course and --page must not be empty"));
        }

        let run = GenerateRun {
            environment: self.env,
            courses: Scope::parse(&self.course),
            pages: Scope::parse(&self.page),
        };
        let policy = if self.keep_going {
            FailurePolicy::CollectAll
        } else {
            FailurePolicy::FailFast
        };

        run_generate(config, &run, policy, self.dry_run)
    }
}

/// Runs a generate batch and writes its pages.
///
/// Under [`FailurePolicy::FailFast`] nothing is written unless every pair
/// rendered. Under [`FailurePolicy::CollectAll`] the successes are written
/// and the failures reported together.
pub fn run_generate(
    config: &Config,
    run: &GenerateRun,
    policy: FailurePolicy,
    dry_run: bool,
) -> CliResult<()> {
    let palettes = load_palettes(&config.paths.palettes)?;
    let courses = load_courses(&config.paths.courses)?;
    let templates = FsTemplates::new(&config.paths.templates_dir);

    let driver = BatchDriver::new(&palettes, &courses, &templates, &config.environment.rewrites)
        .with_flatten(config.flatten_options())
        .with_policy(policy);
    let report = driver.run(run)?;

    let write_pages = report.is_success() || policy == FailurePolicy::CollectAll;
    if write_pages {
        for page in &report.pages {
            let path = page_output_path(&config.paths.output_dir, &page.course_id, &page.page);
            if dry_run {
                println!("  would write {}", path.display());
                continue;
            }
            atomic_write(&path, &page.html).map_err(|e| CliError::io(format!("{e:#}")))?;
            println!("  {}", path.display());
        }
    }

    if report.is_success() {
        let verb = if dry_run { "Rendered" } else { "Generated" };
        println!(
            "✓ {verb} {} page(s) for {} ({} course(s): {}, page: {})",
            report.pages.len(),
            run.environment,
            count_courses(&report),
            run.courses,
            run.pages
        );
        return Ok(());
    }

    let details = report
        .failures
        .iter()
        .map(|failure| format!("  - {failure}"))
        .collect::<Vec<_>>()
        .join("\n");
    let summary = if policy == FailurePolicy::FailFast {
        "Generation aborted; no pages were written".to_string()
    } else {
        format!(
            "{} page(s) failed, {} written",
            report.failures.len(),
            if dry_run { 0 } else { report.pages.len() }
        )
    };
    Err(CliError::render(format!("{summary}:\n{details}")))
}

fn count_courses(report: &BatchReport) -> usize {
    let mut ids: Vec<&str> = report.pages.iter().map(|p| p.course_id.as_str()).collect();
    ids.dedup();
    ids.len()
}
