//! Path normalization

use std::path::Path;

/// Convert backslashes to forward slashes.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// `path` relative to `root` with forward slashes, or the path unchanged
/// when it does not live under `root`.
pub fn relative_to(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    normalize_path(&relative.to_string_lossy())
}
