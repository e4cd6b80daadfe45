//! Page discovery and I/O shared by the per-page commands.

use std::path::{Path, PathBuf};

use dochook_meta::Scanner;

use crate::error::CliError;

/// One input page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Page {
    pub path: PathBuf,
    /// Identifier used in diagnostics: the path relative to its scan root.
    pub id: String,
}

/// Collect pages under each root with the scanner built by `scanner`.
///
/// Roots may be files or directories. A root that doesn't exist is an error;
/// pages reached through more than one root are listed once.
pub(crate) fn collect(
    roots: &[PathBuf],
    scanner: fn(&Path) -> Scanner,
) -> Result<Vec<Page>, CliError> {
    let mut pages: Vec<Page> = Vec::new();
    for root in roots {
        if !root.exists() {
            return Err(CliError::Validation(format!(
                "path not found: {}",
                root.display()
            )));
        }
        for path in scanner(root).scan() {
            if pages.iter().any(|p| p.path == path) {
                continue;
            }
            let id = page_id(root, &path);
            pages.push(Page { path, id });
        }
    }
    Ok(pages)
}

fn page_id(root: &Path, path: &Path) -> String {
    let relative = path
        .strip_prefix(root)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}

pub(crate) fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write(path: &Path, content: &str) -> Result<(), CliError> {
    std::fs::write(path, content).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn markdown(root: &Path) -> Scanner {
        Scanner::markdown(root)
    }

    #[test]
    fn test_collect_directory_ids_are_relative() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("guide")).unwrap();
        std::fs::write(tmp.path().join("index.md"), "").unwrap();
        std::fs::write(tmp.path().join("guide/setup.md"), "").unwrap();

        let pages = collect(&[tmp.path().to_path_buf()], markdown).unwrap();
        let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["guide/setup.md", "index.md"]);
    }

    #[test]
    fn test_collect_file_root_keeps_path() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("one.md");
        std::fs::write(&file, "").unwrap();

        let pages = collect(&[file.clone(), tmp.path().to_path_buf()], markdown).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path, file);
        assert_eq!(pages[0].id, file.to_string_lossy().replace('\\', "/"));
    }

    #[test]
    fn test_collect_missing_root() {
        let tmp = TempDir::new().unwrap();
        let err = collect(&[tmp.path().join("missing")], markdown).unwrap_err();
        assert!(err.to_string().contains("path not found"));
    }
}
