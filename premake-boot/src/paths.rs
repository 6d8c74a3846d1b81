//! Path helpers for text that ends up in `premake5.lua` and for the tool path.

use std::path::{Component, Path, PathBuf};

/// Replace every backslash with a forward slash.
///
/// Premake only understands forward-slash paths, whatever the host uses.
pub fn forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Rewrite `path` in host conventions: separators become the host's main
/// separator and `.` components are dropped.
pub fn host_path(path: &Path) -> PathBuf {
    // Rebuilding from components joins with the host separator; `/` is
    // already a separator on Windows. No string round-trip, so names that
    // are not UTF-8 survive.
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}
