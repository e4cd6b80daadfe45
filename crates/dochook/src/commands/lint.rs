//! `dochook lint` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use dochook_a11y::{Diagnostics, LintReport, lint_markdown};
use dochook_config::{CliSettings, Config};
use dochook_meta::Scanner;
use rayon::prelude::*;

use crate::error::CliError;
use crate::output::Output;
use crate::pages::{self, Page};

/// Arguments for the lint command.
#[derive(Args)]
pub(crate) struct LintArgs {
    /// Markdown files or directories (default: docs directory).
    paths: Vec<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    docs_dir: Option<PathBuf>,
}

impl LintArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            docs_dir: self.docs_dir,
            ..CliSettings::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;

        let roots = if self.paths.is_empty() {
            vec![config.site_resolved.docs_dir]
        } else {
            self.paths
        };
        let pages = pages::collect(&roots, |root| Scanner::markdown(root))?;
        let run = lint_pages(&pages);
        let total = run.total;

        output.info(&format!("Checked {} page(s)", pages.len()));
        output.totals(&[
            ("with accessibility metadata", total.paired),
            ("without", total.unpaired),
        ]);
        if total.unpaired > 0 {
            output.warning(&format!(
                "{} diagram(s) need an accessibility marker",
                total.unpaired
            ));
        }
        if run.failed > 0 {
            output.warning(&format!("{} page(s) could not be read", run.failed));
        }
        Ok(())
    }
}

/// Merged result of linting a set of pages.
#[derive(Debug, Default)]
struct LintRun {
    total: LintReport,
    diagnostics: Diagnostics,
    /// Pages that couldn't be read.
    failed: usize,
}

fn lint_page(page: &Page) -> Result<(LintReport, Diagnostics), CliError> {
    let source = pages::read(&page.path)?;
    let mut diagnostics = Diagnostics::new();
    let report = lint_markdown(&source, &page.id, &mut diagnostics);
    Ok((report, diagnostics))
}

/// Lint pages in parallel and merge the results.
///
/// Unreadable pages are logged and counted without stopping the run.
fn lint_pages(pages: &[Page]) -> LintRun {
    let results: Vec<_> = pages.par_iter().map(lint_page).collect();

    let mut run = LintRun::default();
    for result in results {
        match result {
            Ok((report, diagnostics)) => {
                run.total += report;
                run.diagnostics.extend(diagnostics);
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping page");
                run.failed += 1;
            }
        }
    }
    run
}
