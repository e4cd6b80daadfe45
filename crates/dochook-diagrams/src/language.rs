//! Diagram languages recognized in fenced code blocks.
//!
//! Three families matter to the build hooks: `GraphViz` is rendered locally,
//! `PlantUML` is rendered by a site plugin into inline SVG, and Mermaid renders
//! in the browser and manages its own accessible name.

/// Supported diagram languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramLanguage {
    PlantUml,
    C4PlantUml,
    Mermaid,
    GraphViz,
}

impl DiagramLanguage {
    /// Parse a language tag.
    ///
    /// Supports both direct language names (`dot`) and `kroki-` prefixed names
    /// (`kroki-graphviz`) used by the `MkDocs` Kroki plugin.
    ///
    /// Returns None if the tag is not a supported diagram type.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let lang = s.strip_prefix("kroki-").unwrap_or(s);

        match lang.to_ascii_lowercase().as_str() {
            "plantuml" | "puml" => Some(Self::PlantUml),
            "c4plantuml" => Some(Self::C4PlantUml),
            "mermaid" => Some(Self::Mermaid),
            "graphviz" | "dot" => Some(Self::GraphViz),
            _ => None,
        }
    }

    /// Parse the language from a code fence info string.
    ///
    /// Takes the first word and accepts the attribute-list forms
    /// `{.graphviz}` and `{graphviz}`.
    #[must_use]
    pub fn from_info(info: &str) -> Option<Self> {
        let word = info
            .trim()
            .trim_start_matches('{')
            .trim_start_matches('.')
            .split(|c: char| c.is_whitespace() || c == '}' || c == ',')
            .next()?;
        Self::parse(word)
    }

    /// Canonical tag for this language.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlantUml => "plantuml",
            Self::C4PlantUml => "c4plantuml",
            Self::Mermaid => "mermaid",
            Self::GraphViz => "graphviz",
        }
    }

    /// Whether diagrams of this language take a `diagram-a11y` marker.
    ///
    /// Mermaid carries its own `accTitle`/`accDescr` and is excluded.
    #[must_use]
    pub fn accepts_marker(self) -> bool {
        !self.is_self_describing()
    }

    /// Whether the renderer sets the accessible name of its output itself.
    #[must_use]
    pub fn is_self_describing(self) -> bool {
        matches!(self, Self::Mermaid)
    }

    /// Whether this crate renders the language itself.
    #[must_use]
    pub fn renders_locally(self) -> bool {
        matches!(self, Self::GraphViz)
    }
}
