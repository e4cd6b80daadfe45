//! `dochook render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use dochook_config::{CliSettings, Config};
use dochook_diagrams::{
    ArtifactOutcome, DEFAULT_URL_PREFIX, DotCommand, GraphvizRenderer, RenderedDiagram, Theme,
    prepare_cache, render_markdown,
};

use crate::error::CliError;
use crate::output::Output;
use crate::pages;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Diagram source (.dot, .gv) or markdown page (.md).
    input: PathBuf,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Rendered site directory holding the diagram cache (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Graphviz executable (overrides config).
    #[arg(long, env = "DOCHOOK_DOT")]
    dot: Option<String>,

    /// Graphviz timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// URL under which the diagram cache is served.
    #[arg(long, default_value = DEFAULT_URL_PREFIX)]
    url_prefix: String,
}

/// What the input file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Diagram,
    Markdown,
}

impl InputKind {
    fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
        match ext.as_str() {
            "dot" | "gv" => Some(Self::Diagram),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }
}

impl RenderArgs {
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let kind = InputKind::detect(&self.input).ok_or_else(|| {
            CliError::Validation(format!(
                "unsupported input {}: expected .dot, .gv or .md",
                self.input.display()
            ))
        })?;

        let cli_settings = CliSettings {
            site_dir: self.site_dir,
            graphviz_command: self.dot,
            timeout_secs: self.timeout,
            ..CliSettings::default()
        };
        let config = Config::load(config_path, Some(&cli_settings))?;

        let source = pages::read(&self.input)?;
        let store = prepare_cache(&config.site_resolved.site_dir)?;
        let runner = DotCommand::new(config.graphviz.command.as_str())
            .with_timeout(config.graphviz.timeout());
        let renderer = GraphvizRenderer::new(Box::new(store))
            .with_runner(Box::new(runner))
            .url_prefix(self.url_prefix);

        let (rendered, diagrams) = render_input(kind, &source, &renderer);
        report(&output, &diagrams);

        match &self.output {
            Some(path) => pages::write(path, &rendered)?,
            None => std::io::stdout()
                .write_all(rendered.as_bytes())
                .map_err(|source| CliError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?,
        }
        Ok(())
    }
}

fn render_input(
    kind: InputKind,
    source: &str,
    renderer: &GraphvizRenderer,
) -> (String, Vec<RenderedDiagram>) {
    match kind {
        InputKind::Diagram => {
            let diagram = renderer.render(source);
            let mut html = diagram.html.clone();
            html.push('\n');
            (html, vec![diagram])
        }
        InputKind::Markdown => {
            let result = render_markdown(source, renderer);
            (result.markdown, result.diagrams)
        }
    }
}

/// Summarize artifact outcomes on stderr.
fn report(output: &Output, diagrams: &[RenderedDiagram]) {
    let mut rendered = 0;
    let mut reused = 0;
    for diagram in diagrams {
        for theme in Theme::ALL {
            match diagram.outcome(theme) {
                ArtifactOutcome::Rendered => rendered += 1,
                ArtifactOutcome::Reused => reused += 1,
                ArtifactOutcome::Failed(e) => {
                    output.warning(&format!("{} ({theme}): {e}", diagram.hash));
                }
            }
        }
    }
    output.info(&format!(
        "{} diagram(s): {rendered} artifact(s) rendered, {reused} reused",
        diagrams.len()
    ));
}
