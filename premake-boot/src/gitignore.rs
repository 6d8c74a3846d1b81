//! `.gitignore` maintenance for the generated output directories.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;

/// Ignore file looked up in the workspace root.
pub const GITIGNORE: &str = ".gitignore";

/// Comment line placed above the appended entries.
pub const HEADER: &str = "# Premake generated folders";

/// Append the output directories to `root/.gitignore` when they are not
/// already listed as whole lines.
///
/// Does nothing if there is no `.gitignore`. Returns the entries that were
/// appended; an empty list means the file was not written.
pub fn modify_gitignore(root: &Path, cfg: &Config) -> Result<Vec<String>> {
    let path = root.join(GITIGNORE);
    if !path.is_file() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;

    let missing = missing_entries(&content, &[cfg.bin_dir.as_str(), cfg.build_dir.as_str()]);
    if missing.is_empty() {
        return Ok(missing);
    }

    std::fs::write(&path, append_block(&content, &missing))
        .with_context(|| format!("writing {}", path.display()))?;

    info!(
        file = %path.display(),
        added = %missing.join(", "),
        "modified .gitignore"
    );
    Ok(missing)
}

/// Entries from `wanted` that have no exact line match in `content`.
fn missing_entries(content: &str, wanted: &[&str]) -> Vec<String> {
    wanted
        .iter()
        .filter(|entry| !content.lines().any(|line| line == **entry))
        .map(|entry| entry.to_string())
        .collect()
}

/// `content` followed by a blank line, the header and one line per entry.
fn append_block(content: &str, entries: &[String]) -> String {
    let mut out = String::with_capacity(content.len() + 64);
    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    out.push_str(HEADER);
    out.push('\n');
    for entry in entries {
        out.push_str(entry);
        out.push('\n');
    }
    out
}
