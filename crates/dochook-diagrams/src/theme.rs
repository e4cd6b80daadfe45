//! Light and dark theme styling for Graphviz sources.
//!
//! Theming works by splicing default `graph`, `node` and `edge` attribute
//! statements right after the opening brace of the top-level graph, so any
//! attributes the author sets later in the body still win.

use std::fmt;

/// Theme variant of a rendered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
}

/// Colors applied to one theme variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub font: &'static str,
    pub node_fill: &'static str,
    pub edge: &'static str,
}

impl Theme {
    /// Both variants, in the order they are rendered and embedded.
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a theme name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn palette(self) -> Palette {
        match self {
            Self::Light => Palette {
                background: "#ffffff",
                font: "#000000",
                node_fill: "#ffffff",
                edge: "#333333",
            },
            Self::Dark => Palette {
                background: "#1e1e1e",
                font: "#ffffff",
                node_fill: "#2d2d2d",
                edge: "#aaaaaa",
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DOT attribute statements for a palette.
fn theme_statements(palette: Palette) -> String {
    let Palette {
        background,
        font,
        node_fill,
        edge,
    } = palette;
    format!(
        "  graph [bgcolor=\"{background}\" fontcolor=\"{font}\"];\n  \
         node [style=filled fillcolor=\"{node_fill}\" fontcolor=\"{font}\" color=\"{edge}\"];\n  \
         edge [color=\"{edge}\" fontcolor=\"{font}\"];\n"
    )
}

/// Byte offset of the top-level graph keyword, skipping blank and comment lines.
///
/// Returns `None` when the first significant line is not a graph declaration
/// (`graph`, `digraph`, optionally preceded by `strict`).
fn graph_declaration_start(source: &str) -> Option<usize> {
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let is_comment = trimmed.starts_with("//") || trimmed.starts_with('#');
        if trimmed.trim_end().is_empty() || is_comment {
            offset += line.len();
            continue;
        }
        let lower = trimmed.to_ascii_lowercase();
        let rest = lower
            .strip_prefix("strict")
            .map_or(lower.as_str(), str::trim_start);
        let declares = ["digraph", "graph"].iter().any(|kw| {
            rest.strip_prefix(kw)
                .is_some_and(|after| after.starts_with(|c: char| c.is_whitespace() || c == '{'))
        });
        return declares.then_some(offset + (line.len() - trimmed.len()));
    }
    None
}

/// Inject theme styling into a Graphviz source.
///
/// The statements go right after the first `{` of the top-level graph
/// declaration. Sources that don't start with a graph declaration are
/// returned unchanged.
#[must_use]
pub fn apply_theme(source: &str, theme: Theme) -> String {
    let Some(decl) = graph_declaration_start(source) else {
        return source.to_owned();
    };
    let Some(brace) = source[decl..].find('{').map(|i| decl + i + 1) else {
        return source.to_owned();
    };

    let statements = theme_statements(theme.palette());
    let mut result = String::with_capacity(source.len() + statements.len() + 1);
    result.push_str(&source[..brace]);
    result.push('\n');
    result.push_str(&statements);
    result.push_str(&source[brace..]);
    result
}
