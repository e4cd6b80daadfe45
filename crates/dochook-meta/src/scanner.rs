//! File discovery under a documentation tree.

use std::fs;
use std::path::{Path, PathBuf};

/// Walks a directory tree collecting files by extension.
///
/// Hidden files and directories (leading `.`) are skipped, which also keeps
/// the `.diagram_cache` directory out of site scans.
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    extensions: Vec<String>,
}

impl Scanner {
    /// Create a scanner for files ending in any of `extensions` (no dot).
    pub fn new(root: impl Into<PathBuf>, extensions: &[&str]) -> Self {
        Self {
            root: root.into(),
            extensions: extensions.iter().map(|e| e.to_ascii_lowercase()).collect(),
        }
    }

    /// Scanner for markdown sources.
    pub fn markdown(root: impl Into<PathBuf>) -> Self {
        Self::new(root, &["md"])
    }

    /// Scanner for rendered pages.
    pub fn html(root: impl Into<PathBuf>) -> Self {
        Self::new(root, &["html", "htm"])
    }

    /// Matching files in sorted order.
    ///
    /// Returns an empty Vec if the root doesn't exist. A root that is itself
    /// a matching file yields just that file.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if self.root.is_file() {
            if self.matches(&self.root) {
                files.push(self.root.clone());
            }
        } else if self.root.is_dir() {
            self.scan_directory(&self.root, &mut files);
        }
        files.sort();
        files
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|e| self.extensions.contains(&e))
    }

    fn scan_directory(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(dir) else {
            tracing::debug!(path = %dir.display(), "skipping unreadable directory");
            return;
        };

        for entry in entries.filter_map(Result::ok) {
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let path = entry.path();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            if is_dir {
                self.scan_directory(&path, files);
            } else if self.matches(&path) {
                files.push(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scan_markdown_recursively() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "index.md");
        touch(tmp.path(), "guide/setup.md");
        touch(tmp.path(), "guide/notes.txt");
        touch(tmp.path(), "README.MD");

        let files = Scanner::markdown(tmp.path()).scan();

        assert_eq!(
            relative(tmp.path(), &files),
            vec!["README.MD", "guide/setup.md", "index.md"]
        );
    }

    #[test]
    fn test_hidden_entries_skipped() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), ".drafts/secret.md");
        touch(tmp.path(), ".hidden.md");
        touch(tmp.path(), ".diagram_cache/page.html");
        touch(tmp.path(), "page.html");

        assert!(Scanner::markdown(tmp.path()).scan().is_empty());
        assert_eq!(
            relative(tmp.path(), &Scanner::html(tmp.path()).scan()),
            vec!["page.html"]
        );
    }

    #[test]
    fn test_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(Scanner::markdown(tmp.path().join("nope")).scan().is_empty());
    }

    #[test]
    fn test_file_root() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "one.md");
        let file = tmp.path().join("one.md");

        assert_eq!(Scanner::markdown(&file).scan(), vec![file.clone()]);
        assert!(Scanner::html(&file).scan().is_empty());
    }
}
