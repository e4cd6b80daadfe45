//! Replace Graphviz fences in a markdown page with embed markup.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::language::DiagramLanguage;
use crate::renderer::{GraphvizRenderer, RenderedDiagram};

/// Markdown with Graphviz fences replaced, plus per-diagram results.
#[derive(Debug)]
pub struct MarkdownRender {
    pub markdown: String,
    pub diagrams: Vec<RenderedDiagram>,
}

/// A locally rendered fence: byte range in the page and its body.
struct Fence {
    range: std::ops::Range<usize>,
    source: String,
}

fn find_fences(markdown: &str) -> Vec<Fence> {
    let mut fences = Vec::new();
    let mut current: Option<Fence> = None;

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM;

    for (event, range) in Parser::new_ext(markdown, options).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let local = DiagramLanguage::from_info(&info)
                    .is_some_and(DiagramLanguage::renders_locally);
                if local {
                    current = Some(Fence {
                        range,
                        source: String::new(),
                    });
                }
            }
            Event::Text(text) => {
                if let Some(fence) = current.as_mut() {
                    fence.source.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(fence) = current.take() {
                    fences.push(fence);
                }
            }
            _ => {}
        }
    }
    fences
}

/// Render every `graphviz`/`dot` fence in `markdown` and splice in the embeds.
///
/// Other fences and text pass through untouched. Each embed is followed by a
/// blank line so the surrounding markdown keeps its block structure.
pub fn render_markdown(markdown: &str, renderer: &GraphvizRenderer) -> MarkdownRender {
    let fences = find_fences(markdown);
    if fences.is_empty() {
        return MarkdownRender {
            markdown: markdown.to_owned(),
            diagrams: Vec::new(),
        };
    }

    let mut result = String::with_capacity(markdown.len());
    let mut diagrams = Vec::with_capacity(fences.len());
    let mut last = 0;

    for fence in fences {
        let rendered = renderer.render(&fence.source);
        result.push_str(&markdown[last..fence.range.start]);
        result.push_str(&rendered.html);
        result.push_str("\n\n");
        last = fence.range.end;
        diagrams.push(rendered);
    }
    result.push_str(&markdown[last..]);

    tracing::debug!(count = diagrams.len(), "rendered markdown diagrams");
    MarkdownRender {
        markdown: result,
        diagrams,
    }
}
