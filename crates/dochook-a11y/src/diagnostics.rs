//! Structured diagnostics collected by the page passes.
//!
//! Every pass takes a `&mut Diagnostics`. Pushed events are kept for the
//! caller and also forwarded to `tracing` at the matching level.

use std::fmt;

/// Maximum number of title characters kept in a [`DiagnosticKind::MarkerWithoutDiagram`].
pub const TITLE_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

/// What a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A marker had no diagram within the lookahead window.
    MarkerWithoutDiagram {
        /// First 50 characters of the marker title.
        title: String,
    },
    /// A marker sits next to a diagram that manages its own accessible name.
    SelfDescribingDiagram,
    /// Metadata was injected into `count` diagrams on the page.
    Injected { count: usize },
    /// Diagram fences without a marker on the preceding line.
    UnpairedDiagrams { paired: usize, unpaired: usize },
    /// The page markup couldn't be parsed and was left unchanged.
    UnparsableMarkup { reason: String },
}

impl DiagnosticKind {
    /// Build a [`MarkerWithoutDiagram`](Self::MarkerWithoutDiagram) with a truncated title.
    #[must_use]
    pub fn marker_without_diagram(title: &str) -> Self {
        Self::MarkerWithoutDiagram {
            title: title.chars().take(TITLE_PREVIEW_CHARS).collect(),
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Injected { .. } => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

/// One event from a page pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Page identifier (usually the source path).
    pub page: String,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = &self.page;
        match &self.kind {
            DiagnosticKind::MarkerWithoutDiagram { title } => {
                write!(f, "no diagram found for accessibility marker in {page}: '{title}...'")
            }
            DiagnosticKind::SelfDescribingDiagram => write!(
                f,
                "skipping self-describing diagram in {page}; use accTitle/accDescr instead"
            ),
            DiagnosticKind::Injected { count } => write!(
                f,
                "injected accessibility metadata into {count} diagram(s) in {page}"
            ),
            DiagnosticKind::UnpairedDiagrams { paired, unpaired } => write!(
                f,
                "page {page} has {unpaired} diagram(s) without accessibility metadata \
                 (found {paired} with metadata)"
            ),
            DiagnosticKind::UnparsableMarkup { reason } => {
                write!(f, "could not parse {page}, left unchanged: {reason}")
            }
        }
    }
}

/// Collector of [`Diagnostic`]s.
#[derive(Debug, Default)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event and log it.
    pub fn push(&mut self, page: &str, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            severity: kind.severity(),
            page: page.to_owned(),
            kind,
        };
        match diagnostic.severity {
            Severity::Info => tracing::info!(page, "{diagnostic}"),
            Severity::Warning => tracing::warn!(page, "{diagnostic}"),
        }
        self.events.push(diagnostic);
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.events.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.events
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Move events from `other` into this collector without logging them again.
    pub fn extend(&mut self, other: Diagnostics) {
        self.events.extend(other.events);
    }

    pub fn into_events(self) -> Vec<Diagnostic> {
        self.events
    }
}
