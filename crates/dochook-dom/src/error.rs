//! Error types for HTML parsing.

/// Error returned when page markup cannot be tokenized.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The tokenizer rejected the markup.
    #[error("markup error: {0}")]
    Markup(#[from] quick_xml::Error),
}
