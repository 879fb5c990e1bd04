//! Helpers shared by the filesystem tools.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use glob::{MatchOptions, Pattern};
use path_absolutize::Absolutize;
use serde::Serialize;
use tracing::warn;

use crate::domains::tools::{ToolError, ToolResult};

/// Resolve a caller path to an absolute, lexically normalized path.
pub(super) fn absolute(path: &str) -> ToolResult<PathBuf> {
    if path.trim().is_empty() {
        return Err(ToolError::invalid_input("path must not be empty"));
    }
    Ok(Path::new(path).absolutize()?.into_owned())
}

pub(super) fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).to_rfc3339()
}

pub(super) fn entry_type(path: &Path) -> &'static str {
    if path.is_dir() { "directory" } else { "file" }
}

/// Expand `pattern` relative to `dir`, in glob order.
///
/// Blocking; call from `spawn_blocking`.
pub(super) fn glob_in(dir: &Path, pattern: &str, limit: usize) -> ToolResult<Vec<PathBuf>> {
    if pattern.starts_with('/') {
        return Err(ToolError::invalid_input(
            "pattern must be relative to the directory",
        ));
    }
    let full = format!("{}/{}", Pattern::escape(&dir.to_string_lossy()), pattern);
    let paths = glob::glob_with(&full, MatchOptions::new())
        .map_err(|e| ToolError::invalid_input(format!("Invalid glob pattern: {}", e)))?;

    Ok(paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .take(limit)
        .collect())
}

/// One directory listing row.
#[derive(Debug, Serialize)]
pub(super) struct EntryInfo {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub size: u64,
    pub modified: Option<String>,
}

impl EntryInfo {
    /// Stat `path`, following symlinks. A dangling link is an error.
    pub fn stat(path: &Path) -> ToolResult<Self> {
        let metadata = path.metadata().map_err(|e| {
            warn!("Failed to stat {}: {}", path.display(), e);
            ToolError::from(e)
        })?;
        Ok(Self {
            name: file_name(path),
            path: path.display().to_string(),
            kind: if metadata.is_dir() { "directory" } else { "file" },
            size: metadata.len(),
            modified: metadata.modified().ok().map(format_time),
        })
    }
}

pub(super) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_absolute_normalizes_dots() {
        let resolved = absolute("/tmp/a/../b/./c.txt").unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/b/c.txt"));
        assert!(absolute("relative.txt").unwrap().is_absolute());
        assert!(absolute("  ").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_stat_dangling_symlink_fails() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("dangling");
        std::os::unix::fs::symlink(temp.path().join("missing"), &link).unwrap();

        let err = EntryInfo::stat(&link).unwrap_err();
        assert_eq!(err.kind(), crate::domains::tools::ErrorKind::NotFound);

        fs::write(temp.path().join("real.txt"), "abc").unwrap();
        let info = EntryInfo::stat(&temp.path().join("real.txt")).unwrap();
        assert_eq!(info.size, 3);
        assert_eq!(info.kind, "file");
    }

    #[test]
    fn test_glob_in_escapes_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("odd [dir]");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.txt"), "a").unwrap();
        fs::write(dir.join("b.md"), "b").unwrap();

        let found = glob_in(&dir, "*.txt", usize::MAX).unwrap();
        assert_eq!(found, vec![dir.join("a.txt")]);

        let err = glob_in(&dir, "/etc/*", 10).unwrap_err();
        assert_eq!(err.kind(), crate::domains::tools::ErrorKind::InvalidInput);
    }
}
