// src/path_utils.rs

//! Path helpers shared by the pattern matcher and the change feeds.

use std::path::{Path, PathBuf};

/// Render a path as a string with forward slashes.
///
/// Patterns are compiled against this form so that a `.mash` file written on
/// one platform matches the same directories on another.
pub fn normalize_separators(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Re-express `path` under `root`.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize the path and try again against `root`, which is
///   expected to be canonical already.
///
/// Returns `None` if the path cannot be reasonably related to `root`.
pub fn rebase_onto_root(root: &Path, path: &Path) -> Option<PathBuf> {
    if path.starts_with(root) {
        return Some(path.to_path_buf());
    }

    // macOS reports /private/var/... for paths watched as /var/..., and a
    // deleted file can no longer be canonicalized; try its parent instead.
    if let Ok(canon) = path.canonicalize() {
        if let Ok(rel) = canon.strip_prefix(root) {
            return Some(root.join(rel));
        }
    }

    let parent = path.parent()?;
    let name = path.file_name()?;
    let parent_canon = parent.canonicalize().ok()?;
    let rel = parent_canon.strip_prefix(root).ok()?;
    Some(root.join(rel).join(name))
}
