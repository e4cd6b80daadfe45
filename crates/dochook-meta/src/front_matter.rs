//! `last_updated` front-matter timestamps.
//!
//! Pages opt in with `timestamp: true`:
//!
//! ```text
//! ---
//! title: Setup
//! timestamp: true
//! last_updated: "2024-05-01"
//! ---
//! ```
//!
//! The date is the file's modification time as a local calendar date.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use serde::Deserialize;

const DELIMITER: &str = "---";
const DATE_FORMAT: &str = "%Y-%m-%d";

static LAST_UPDATED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^last_updated:[ \t]*("[^"\n]*"|[^\n]*)"#).expect("invalid last_updated regex")
});

/// Error reading or writing a page.
#[derive(Debug, thiserror::Error)]
pub enum TimestampError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a page was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The page doesn't start with `---`.
    NoFrontMatter,
    /// No closing delimiter, or the block isn't valid YAML.
    Malformed,
    /// `timestamp: true` is absent.
    NotOptedIn,
}

/// Result of processing one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampOutcome {
    /// The page was rewritten with this date.
    Updated { date: String },
    /// The date was already current.
    Unchanged,
    Skipped(SkipReason),
}

#[derive(Debug, Default, Deserialize)]
struct Flags {
    #[serde(default)]
    timestamp: Option<bool>,
}

/// Byte ranges of the front-matter body, as `(body_start, closing_start)`.
fn split_front_matter(content: &str) -> Result<(usize, usize), SkipReason> {
    let Some(rest) = content.strip_prefix(DELIMITER) else {
        return Err(SkipReason::NoFrontMatter);
    };
    // The opening delimiter must be a line of its own
    let Some(newline) = rest.find('\n') else {
        return Err(SkipReason::Malformed);
    };
    if !rest[..newline].trim().is_empty() {
        return Err(SkipReason::NoFrontMatter);
    }

    let body_start = DELIMITER.len() + newline + 1;
    let mut offset = body_start;
    for line in content[body_start..].split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Ok((body_start, offset));
        }
        offset += line.len();
    }
    Err(SkipReason::Malformed)
}

/// Set `last_updated` to `date` in a page's front matter.
///
/// Replaces the value of an existing `last_updated:` line or adds one right
/// before the closing delimiter. Returns the page unchanged in content when
/// the value already matches.
pub fn set_last_updated(content: &str, date: &str) -> Result<String, SkipReason> {
    let (start, end) = split_front_matter(content)?;
    let front = &content[start..end];

    let flags: Flags = if front.trim().is_empty() {
        Flags::default()
    } else {
        serde_yaml::from_str(front).map_err(|_| SkipReason::Malformed)?
    };
    if flags.timestamp != Some(true) {
        return Err(SkipReason::NotOptedIn);
    }

    let line = format!("last_updated: \"{date}\"");
    let front = if LAST_UPDATED_PATTERN.is_match(front) {
        LAST_UPDATED_PATTERN
            .replace(front, regex::NoExpand(&line))
            .into_owned()
    } else {
        let mut front = front.to_owned();
        if !front.is_empty() && !front.ends_with('\n') {
            front.push('\n');
        }
        front.push_str(&line);
        front.push('\n');
        front
    };

    let mut result = String::with_capacity(content.len() + line.len());
    result.push_str(&content[..start]);
    result.push_str(&front);
    result.push_str(&content[end..]);
    Ok(result)
}

/// Local calendar date of a file's modification time.
pub fn modified_date(path: &Path) -> Result<String, TimestampError> {
    let read_err = |source| TimestampError::Read {
        path: path.to_path_buf(),
        source,
    };
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(read_err)?;
    Ok(DateTime::<Local>::from(modified)
        .format(DATE_FORMAT)
        .to_string())
}

/// Update the `last_updated` field of one page on disk.
///
/// The file is only written when its content changes.
pub fn update_file(path: &Path) -> Result<TimestampOutcome, TimestampError> {
    let content = fs::read_to_string(path).map_err(|source| TimestampError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let date = modified_date(path)?;

    let updated = match set_last_updated(&content, &date) {
        Ok(updated) => updated,
        Err(reason) => {
            tracing::debug!(path = %path.display(), ?reason, "skipping page");
            return Ok(TimestampOutcome::Skipped(reason));
        }
    };
    if updated == content {
        return Ok(TimestampOutcome::Unchanged);
    }

    fs::write(path, updated).map_err(|source| TimestampError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), %date, "updated timestamp");
    Ok(TimestampOutcome::Updated { date })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_insert_last_updated() {
        let content = "---\ntitle: Setup\ntimestamp: true\n---\n# Setup\n";

        let updated = set_last_updated(content, "2024-05-01").unwrap();

        assert_eq!(
            updated,
            "---\ntitle: Setup\ntimestamp: true\nlast_updated: \"2024-05-01\"\n---\n# Setup\n"
        );
    }

    #[test]
    fn test_replace_quoted_value() {
        let content = "---\ntimestamp: true\nlast_updated: \"2020-01-01\"\ntitle: x\n---\nbody";

        let updated = set_last_updated(content, "2024-05-01").unwrap();

        assert_eq!(
            updated,
            "---\ntimestamp: true\nlast_updated: \"2024-05-01\"\ntitle: x\n---\nbody"
        );
    }

    #[test]
    fn test_replace_unquoted_value() {
        let content = "---\ntimestamp: true\nlast_updated: 2020-01-01\n---\n";

        let updated = set_last_updated(content, "2024-05-01").unwrap();

        assert_eq!(
            updated,
            "---\ntimestamp: true\nlast_updated: \"2024-05-01\"\n---\n"
        );
    }

    #[test]
    fn test_same_date_is_identical() {
        let content = "---\ntimestamp: true\nlast_updated: \"2024-05-01\"\n---\n";
        assert_eq!(set_last_updated(content, "2024-05-01").unwrap(), content);
    }

    #[test]
    fn test_not_opted_in() {
        assert_eq!(
            set_last_updated("---\ntitle: x\n---\n", "2024-05-01"),
            Err(SkipReason::NotOptedIn)
        );
        assert_eq!(
            set_last_updated("---\ntimestamp: false\n---\n", "2024-05-01"),
            Err(SkipReason::NotOptedIn)
        );
        assert_eq!(
            set_last_updated("---\n---\nbody", "2024-05-01"),
            Err(SkipReason::NotOptedIn)
        );
    }

    #[test]
    fn test_no_front_matter() {
        assert_eq!(
            set_last_updated("# Title\n---\n", "2024-05-01"),
            Err(SkipReason::NoFrontMatter)
        );
        assert_eq!(
            set_last_updated("----\ntimestamp: true\n---\n", "2024-05-01"),
            Err(SkipReason::NoFrontMatter)
        );
    }

    #[test]
    fn test_malformed_front_matter() {
        assert_eq!(
            set_last_updated("---\ntimestamp: true\nno closing", "2024-05-01"),
            Err(SkipReason::Malformed)
        );
        assert_eq!(
            set_last_updated("---\ntimestamp: [true\n---\n", "2024-05-01"),
            Err(SkipReason::Malformed)
        );
    }

    #[test]
    fn test_dashes_inside_values_are_not_delimiters() {
        let content = "---\ntitle: a---b\ntimestamp: true\n---\n";

        let updated = set_last_updated(content, "2024-05-01").unwrap();

        assert!(updated.contains("title: a---b\ntimestamp: true\nlast_updated: \"2024-05-01\"\n---\n"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntimestamp: true\r\n---\r\nbody";

        let updated = set_last_updated(content, "2024-05-01").unwrap();

        assert!(updated.starts_with("---\r\ntimestamp: true\r\nlast_updated: \"2024-05-01\"\n---\r\n"));
    }

    #[test]
    fn test_update_file_writes_once() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("page.md");
        fs::write(&path, "---\ntimestamp: true\n---\n# Page\n").unwrap();

        let first = update_file(&path).unwrap();
        let TimestampOutcome::Updated { date } = first else {
            panic!("expected update, got {first:?}");
        };
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains(&format!("last_updated: \"{date}\"")));
        assert_eq!(date.len(), 10);

        // Rewriting moved the mtime to today; the second run settles on it
        let second = update_file(&path).unwrap();
        let third = update_file(&path).unwrap();
        assert!(matches!(
            second,
            TimestampOutcome::Unchanged | TimestampOutcome::Updated { .. }
        ));
        assert_eq!(third, TimestampOutcome::Unchanged);
    }

    #[test]
    fn test_update_file_skips_without_writing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plain.md");
        fs::write(&path, "# Plain\n").unwrap();

        assert_eq!(
            update_file(&path).unwrap(),
            TimestampOutcome::Skipped(SkipReason::NoFrontMatter)
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Plain\n");
    }

    #[test]
    fn test_update_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = update_file(&tmp.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, TimestampError::Read { .. }));
    }
}
