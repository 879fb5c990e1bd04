// Security module for sandboxed path resolution.
//
// Operations that accept a path relative to a configured root resolve it
// here, so traversal (`..`), absolute overrides and symlinks cannot escape.

pub mod path_validator;

pub use path_validator::{PathSecurityError, is_within_root, resolve_within};
