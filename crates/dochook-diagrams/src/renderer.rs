//! Themed Graphviz renderer.
//!
//! [`GraphvizRenderer`] turns one diagram source into two cached SVG artifacts
//! (light and dark) and returns the markup embedding both. Artifacts are
//! addressed by [`DiagramKey`], so a source that was rendered before is never
//! sent to Graphviz again for the lifetime of the store.

use std::path::Path;

use dochook_cache::{ArtifactStore, DirStore, StoreError};

use crate::cache::{DiagramKey, artifact_name};
use crate::consts::DEFAULT_URL_PREFIX;
use crate::directives::{AccessibilityMetadata, extract_metadata, strip_directives};
use crate::embed::embed_html;
use crate::error::RenderError;
use crate::graphviz::{DotCommand, DotRunner};
use crate::theme::{Theme, apply_theme};

/// What happened to one theme variant.
#[derive(Debug)]
pub enum ArtifactOutcome {
    /// Artifact already existed and was left alone.
    Reused,
    /// Artifact was rendered and stored.
    Rendered,
    /// Rendering or storing failed; the page references a missing file.
    Failed(RenderError),
}

impl ArtifactOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Result of rendering one diagram.
#[derive(Debug)]
pub struct RenderedDiagram {
    /// Content hash naming both artifacts.
    pub hash: String,
    pub metadata: AccessibilityMetadata,
    /// Embedding markup for the page.
    pub html: String,
    pub light: ArtifactOutcome,
    pub dark: ArtifactOutcome,
}

impl RenderedDiagram {
    /// Outcome for one theme variant.
    #[must_use]
    pub fn outcome(&self, theme: Theme) -> &ArtifactOutcome {
        match theme {
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        }
    }
}

/// Renders Graphviz diagrams into an [`ArtifactStore`].
///
/// # Configuration
///
/// - [`with_runner`](Self::with_runner): replace the `dot` invocation
/// - [`url_prefix`](Self::url_prefix): URL under which the store is served
///   (default: `/.diagram_cache/`)
///
/// # Example
///
/// ```
/// use dochook_cache::MemoryStore;
/// use dochook_diagrams::GraphvizRenderer;
///
/// let renderer = GraphvizRenderer::new(Box::new(MemoryStore::new()));
/// assert_eq!(renderer.url_prefix_str(), "/.diagram_cache/");
/// ```
pub struct GraphvizRenderer {
    store: Box<dyn ArtifactStore>,
    runner: Box<dyn DotRunner>,
    url_prefix: String,
}

impl GraphvizRenderer {
    /// Create a renderer that runs `dot` from `PATH`.
    #[must_use]
    pub fn new(store: Box<dyn ArtifactStore>) -> Self {
        Self {
            store,
            runner: Box::new(DotCommand::default()),
            url_prefix: DEFAULT_URL_PREFIX.to_owned(),
        }
    }

    #[must_use]
    pub fn with_runner(mut self, runner: Box<dyn DotRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Set the URL prefix used in embed markup. A trailing `/` is added if missing.
    #[must_use]
    pub fn url_prefix(mut self, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.url_prefix = prefix;
        self
    }

    #[must_use]
    pub fn url_prefix_str(&self) -> &str {
        &self.url_prefix
    }

    /// Render both theme variants of `source` and build the embed markup.
    ///
    /// Failures are reported per variant and never abort: the markup always
    /// references both artifact URLs.
    pub fn render(&self, source: &str) -> RenderedDiagram {
        let hash = DiagramKey::new(source).compute_hash();
        let metadata = extract_metadata(source);
        let prepared = strip_directives(source);

        let light = self.render_theme(&prepared, &hash, Theme::Light);
        let dark = self.render_theme(&prepared, &hash, Theme::Dark);
        let html = embed_html(&hash, &metadata, &self.url_prefix);

        RenderedDiagram {
            hash,
            metadata,
            html,
            light,
            dark,
        }
    }

    /// Produce one themed artifact unless it already exists.
    ///
    /// `prepared` is the source with bare directives removed; `hash` is the
    /// key of the original source.
    pub fn render_theme(&self, prepared: &str, hash: &str, theme: Theme) -> ArtifactOutcome {
        let name = artifact_name(hash, theme);
        if self.store.contains(&name) {
            tracing::debug!(artifact = %name, "reusing cached artifact");
            return ArtifactOutcome::Reused;
        }

        match self.produce(prepared, &name, theme) {
            Ok(()) => {
                tracing::debug!(artifact = %name, "rendered artifact");
                ArtifactOutcome::Rendered
            }
            Err(e) => {
                tracing::warn!(artifact = %name, error = %e, "diagram rendering failed");
                ArtifactOutcome::Failed(e)
            }
        }
    }

    fn produce(&self, prepared: &str, name: &str, theme: Theme) -> Result<(), RenderError> {
        let themed = apply_theme(prepared, theme);
        let svg = String::from_utf8(self.runner.render(&themed)?)?;
        self.store.write(name, svg.as_bytes())?;
        Ok(())
    }
}

/// Pre-build hook: make sure the cache directory under `site_dir` exists.
pub fn prepare_cache(site_dir: &Path) -> Result<DirStore, StoreError> {
    let store = DirStore::for_site(site_dir);
    store.ensure_dir()?;
    tracing::info!(path = %store.root().display(), "diagram cache ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use dochook_cache::MemoryStore;

    use super::*;

    /// Runner that counts invocations and echoes a fake SVG.
    #[derive(Default)]
    struct FakeRunner {
        calls: Arc<AtomicUsize>,
        sources: Arc<Mutex<Vec<String>>>,
    }

    impl DotRunner for FakeRunner {
        fn render(&self, source: &str) -> Result<Vec<u8>, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sources.lock().unwrap().push(source.to_owned());
            Ok(format!("<svg><!-- {} --></svg>", source.len()).into_bytes())
        }
    }

    struct FailingRunner;

    impl DotRunner for FailingRunner {
        fn render(&self, _source: &str) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::Exit {
                program: "dot".to_owned(),
                status: "exit status: 1".to_owned(),
                stderr: "syntax error in line 1".to_owned(),
            })
        }
    }

    /// Store shared between renderers so tests can inspect it afterwards.
    #[derive(Clone, Default)]
    struct SharedStore(Arc<MemoryStore>);

    impl ArtifactStore for SharedStore {
        fn contains(&self, name: &str) -> bool {
            self.0.contains(name)
        }
        fn read(&self, name: &str) -> Option<Vec<u8>> {
            self.0.read(name)
        }
        fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
            self.0.write(name, data)
        }
    }

    fn renderer_with_counter(store: &SharedStore) -> (GraphvizRenderer, Arc<AtomicUsize>) {
        let runner = FakeRunner::default();
        let calls = Arc::clone(&runner.calls);
        let renderer =
            GraphvizRenderer::new(Box::new(store.clone())).with_runner(Box::new(runner));
        (renderer, calls)
    }

    const SOURCE: &str = "digraph {\n  // accTitle: Flow\n  a -> b\n}";

    #[test]
    fn test_render_produces_both_variants() {
        let store = SharedStore::default();
        let (renderer, calls) = renderer_with_counter(&store);

        let rendered = renderer.render(SOURCE);

        assert!(matches!(rendered.light, ArtifactOutcome::Rendered));
        assert!(matches!(rendered.dark, ArtifactOutcome::Rendered));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(store.contains(&format!("{}_light.svg", rendered.hash)));
        assert!(store.contains(&format!("{}_dark.svg", rendered.hash)));
        assert_eq!(rendered.metadata.title, "Flow");
        assert!(rendered.html.contains("data-acc-title=\"Flow\""));
    }

    #[test]
    fn test_identical_source_reuses_artifacts() {
        let store = SharedStore::default();
        let (first, first_calls) = renderer_with_counter(&store);
        let (second, second_calls) = renderer_with_counter(&store);

        let a = first.render(SOURCE);
        let b = second.render(SOURCE);

        assert_eq!(a.hash, b.hash);
        assert_eq!(first_calls.load(Ordering::SeqCst), 2);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
        assert!(matches!(b.light, ArtifactOutcome::Reused));
        assert!(matches!(b.dark, ArtifactOutcome::Reused));
    }

    #[test]
    fn test_one_byte_change_renders_again() {
        let store = SharedStore::default();
        let (renderer, calls) = renderer_with_counter(&store);

        let a = renderer.render("digraph { a -> b }");
        let b = renderer.render("digraph { a -> c }");

        assert_ne!(a.hash, b.hash);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(store.0.len(), 4);
    }

    #[test]
    fn test_runner_sees_themed_source_without_bare_directives() {
        let runner = FakeRunner::default();
        let sources = Arc::clone(&runner.sources);
        let renderer =
            GraphvizRenderer::new(Box::new(MemoryStore::new())).with_runner(Box::new(runner));

        renderer.render("digraph {\naccTitle: Flow\na -> b\n}");

        let sources = sources.lock().unwrap();
        assert_eq!(sources.len(), 2);
        assert!(sources[0].contains("bgcolor=\"#ffffff\""));
        assert!(sources[1].contains("bgcolor=\"#1e1e1e\""));
        assert!(sources.iter().all(|s| !s.contains("accTitle")));
    }

    #[test]
    fn test_failure_is_per_artifact() {
        let store = SharedStore::default();
        let renderer =
            GraphvizRenderer::new(Box::new(store.clone())).with_runner(Box::new(FailingRunner));

        let rendered = renderer.render(SOURCE);

        assert!(rendered.light.is_failed());
        assert!(rendered.outcome(Theme::Dark).is_failed());
        assert!(store.0.is_empty());
        // Markup still references both artifacts
        assert!(rendered.html.contains("_light.svg"));
        assert!(rendered.html.contains("_dark.svg"));
    }

    #[test]
    fn test_failed_artifact_is_retried_next_time() {
        let store = SharedStore::default();
        GraphvizRenderer::new(Box::new(store.clone()))
            .with_runner(Box::new(FailingRunner))
            .render(SOURCE);
        let (renderer, calls) = renderer_with_counter(&store);

        renderer.render(SOURCE);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_url_prefix_normalized() {
        let renderer = GraphvizRenderer::new(Box::new(MemoryStore::new()))
            .with_runner(Box::new(FakeRunner::default()))
            .url_prefix("/assets/diagrams");

        assert_eq!(renderer.url_prefix_str(), "/assets/diagrams/");
        let rendered = renderer.render("digraph {}");
        assert!(rendered.html.contains("data=\"/assets/diagrams/"));
    }

    #[test]
    fn test_prepare_cache_creates_directory() {
        let tmp = tempfile::TempDir::new().unwrap();

        let store = prepare_cache(tmp.path()).unwrap();

        assert!(tmp.path().join(".diagram_cache").is_dir());
        assert_eq!(store.root(), tmp.path().join(".diagram_cache"));
        // Idempotent
        prepare_cache(tmp.path()).unwrap();
    }
}
