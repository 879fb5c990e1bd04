use std::io;
use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

/// Errors that can occur during path resolution
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Access denied: '{path}' is outside allowed directory '{root}'")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    Io { path: PathBuf, error: io::Error },
}

/// Resolves `relative` beneath `root` and verifies it stays there.
///
/// The root is canonicalized first. The joined path is then normalized
/// lexically (so `..` cannot climb out), and its longest existing ancestor
/// is canonicalized so that symlinks are followed before the check.
/// The final comparison is component-wise: `/data/repos-evil` is not
/// inside `/data/repos`.
///
/// The target itself does not need to exist, which lets callers validate
/// destinations (e.g. a clone target) before creating them.
///
/// ```rust,ignore
/// let repo = resolve_within(Path::new("/data/repos"), "proj1")?;
/// ```
pub fn resolve_within(root: &Path, relative: &str) -> Result<PathBuf, PathSecurityError> {
    let canonical_root = root.canonicalize().map_err(|error| PathSecurityError::Io {
        path: root.to_path_buf(),
        error,
    })?;

    let joined = canonical_root.join(relative);
    let normalized = joined
        .absolutize()
        .map_err(|error| PathSecurityError::Io {
            path: joined.clone(),
            error,
        })?
        .into_owned();

    let resolved = canonicalize_existing(&normalized).map_err(|error| PathSecurityError::Io {
        path: normalized.clone(),
        error,
    })?;

    if !is_within_root(&resolved, &canonical_root) {
        return Err(PathSecurityError::OutsideRoot {
            path: resolved,
            root: canonical_root,
        });
    }

    Ok(resolved)
}

/// Checks if a path is within (or equal to) a root directory
pub fn is_within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Canonicalizes the deepest existing ancestor of `path` and re-appends the
/// components that do not exist yet.
fn canonicalize_existing(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();

    loop {
        match existing.canonicalize() {
            Ok(mut resolved) => {
                for component in missing.iter().rev() {
                    resolved.push(component);
                }
                return Ok(resolved);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(name)) => {
                        missing.push(name.to_os_string());
                        existing = parent;
                    }
                    _ => return Err(e),
                }
            }
            Err(e) => return Err(e),
        }
    }
}
