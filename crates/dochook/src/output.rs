//! Colored terminal output on stderr.
//!
//! Stdout is reserved for `render` results so they can be piped.

use console::{Style, Term};

#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Success,
    Warning,
    Error,
}

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    success: Style,
    warning: Style,
    error: Style,
    label: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            label: Style::new().dim(),
        }
    }

    fn line(&self, tone: Tone, msg: &str) {
        let styled = match tone {
            Tone::Plain => msg.to_owned(),
            Tone::Success => self.success.apply_to(msg).to_string(),
            Tone::Warning => self.warning.apply_to(msg).to_string(),
            Tone::Error => self.error.apply_to(msg).to_string(),
        };
        let _ = self.term.write_line(&styled);
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(Tone::Success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(Tone::Warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(Tone::Error, msg);
    }

    /// Print labelled counts, one per line, with labels padded to align.
    pub(crate) fn totals(&self, rows: &[(&str, usize)]) {
        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, count) in rows {
            let label = format!("{label:<width$}");
            let _ = self
                .term
                .write_line(&format!("  {}  {count}", self.label.apply_to(label)));
        }
    }
}
