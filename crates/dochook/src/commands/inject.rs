//! `dochook inject` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use dochook_a11y::{Diagnostics, PostRenderPass, Resolver};
use dochook_config::{CliSettings, Config};
use dochook_meta::Scanner;
use rayon::prelude::*;

use crate::error::CliError;
use crate::output::Output;
use crate::pages::{self, Page};

/// Arguments for the inject command.
#[derive(Args)]
pub(crate) struct InjectArgs {
    /// HTML files or directories (default: site directory).
    paths: Vec<PathBuf>,

    /// Rendered site directory (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Elements inspected after each marker (overrides config).
    #[arg(long)]
    lookahead: Option<usize>,
}

/// Totals over all processed pages.
#[derive(Debug, Default, PartialEq, Eq)]
struct InjectSummary {
    pages: usize,
    changed: usize,
    injected: usize,
    warnings: usize,
    /// Pages that couldn't be read or written back.
    failed: usize,
}

impl InjectArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_dir: self.site_dir,
            lookahead: self.lookahead,
            ..CliSettings::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;

        let roots = if self.paths.is_empty() {
            vec![config.site_resolved.site_dir]
        } else {
            self.paths
        };
        let pages = pages::collect(&roots, |root| Scanner::html(root))?;
        let pass =
            PostRenderPass::new(Resolver::new().with_lookahead(config.accessibility.lookahead));

        let summary = inject_pages(&pass, &pages);

        output.success("Accessibility metadata injected");
        output.totals(&[
            ("pages scanned", summary.pages),
            ("pages rewritten", summary.changed),
            ("diagrams", summary.injected),
        ]);
        if summary.warnings > 0 {
            output.warning(&format!("{} warning(s)", summary.warnings));
        }
        if summary.failed > 0 {
            output.warning(&format!(
                "{} page(s) could not be processed",
                summary.failed
            ));
        }
        Ok(())
    }
}

/// Injected diagrams and warnings for one page.
fn inject_page(pass: &PostRenderPass, page: &Page) -> Result<(usize, usize), CliError> {
    let html = pages::read(&page.path)?;
    let mut diagnostics = Diagnostics::new();
    let report = pass.process(&html, &page.id, &mut diagnostics);
    if report.changed() {
        pages::write(&page.path, &report.html)?;
        tracing::debug!(page = %page.id, "rewrote page");
    }
    Ok((report.injected, diagnostics.warnings().count()))
}

/// Process pages in parallel and rewrite the ones that changed.
///
/// A page that can't be read or written is logged and counted; the others
/// are still processed.
fn inject_pages(pass: &PostRenderPass, pages: &[Page]) -> InjectSummary {
    let results: Vec<_> = pages
        .par_iter()
        .map(|page| inject_page(pass, page))
        .collect();

    let mut summary = InjectSummary {
        pages: pages.len(),
        ..InjectSummary::default()
    };
    for result in results {
        match result {
            Ok((injected, warnings)) => {
                summary.injected += injected;
                summary.warnings += warnings;
                if injected > 0 {
                    summary.changed += 1;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping page");
                summary.failed += 1;
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const MARKED: &str = r#"<html><body>
<!-- diagram-a11y: title="Login flow" desc="Steps" -->
<div><svg id="login"><g></g></svg></div>
</body></html>"#;

    fn site(files: &[(&str, &str)]) -> (TempDir, Vec<Page>) {
        let tmp = TempDir::new().unwrap();
        for (name, content) in files {
            std::fs::write(tmp.path().join(name), content).unwrap();
        }
        let pages = pages::collect(&[tmp.path().to_path_buf()], |root| Scanner::html(root))
            .unwrap();
        (tmp, pages)
    }

    #[test]
    fn test_inject_rewrites_changed_pages_only() {
        let plain = "<html><body><svg></svg></body></html>";
        let (tmp, pages) = site(&[("a.html", MARKED), ("b.html", plain)]);

        let summary = inject_pages(&PostRenderPass::default(), &pages);

        assert_eq!(
            summary,
            InjectSummary {
                pages: 2,
                changed: 1,
                injected: 1,
                warnings: 0,
                failed: 0
            }
        );
        let a = std::fs::read_to_string(tmp.path().join("a.html")).unwrap();
        assert!(a.contains(r#"<title id="svg-title-login">Login flow</title>"#));
        assert!(a.contains(r#"role="image""#));
        let b = std::fs::read_to_string(tmp.path().join("b.html")).unwrap();
        assert_eq!(b, plain);
    }

    #[test]
    fn test_inject_twice_is_stable() {
        let (tmp, pages) = site(&[("a.html", MARKED)]);
        let pass = PostRenderPass::default();

        inject_pages(&pass, &pages);
        let first = std::fs::read_to_string(tmp.path().join("a.html")).unwrap();
        inject_pages(&pass, &pages);
        let second = std::fs::read_to_string(tmp.path().join("a.html")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_inject_counts_warnings() {
        let orphan = r#"<!-- diagram-a11y: title="Lost" desc="" --><p>text</p>"#;
        let (_tmp, pages) = site(&[("orphan.html", orphan)]);

        let summary = inject_pages(&PostRenderPass::default(), &pages);

        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.changed, 0);
    }

    #[test]
    fn test_unreadable_page_does_not_stop_the_pass() {
        let (tmp, _) = site(&[("a.html", MARKED)]);
        std::fs::write(tmp.path().join("b.html"), [0xff, 0xfe, 0x00, 0x3c]).unwrap();
        let pages = pages::collect(&[tmp.path().to_path_buf()], |root| Scanner::html(root))
            .unwrap();

        let summary = inject_pages(&PostRenderPass::default(), &pages);

        assert_eq!(summary.pages, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.injected, 1);
        let a = std::fs::read_to_string(tmp.path().join("a.html")).unwrap();
        assert!(a.contains(r#"<title id="svg-title-login">Login flow</title>"#));
    }
}
