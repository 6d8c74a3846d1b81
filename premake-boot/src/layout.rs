//! Output directories Premake writes into.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Config;

/// Create the binary-output and intermediate-build directories under `root`
/// if they are missing. Safe to call repeatedly.
pub fn check_folders(root: &Path, cfg: &Config) -> Result<()> {
    for name in [&cfg.bin_dir, &cfg.build_dir] {
        let dir = root.join(name);
        if dir.is_dir() {
            continue;
        }
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating directory {}", dir.display()))?;
        debug!(dir = %dir.display(), "created output directory");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_both_directories() {
        let tmp = tempfile::tempdir().unwrap();
        check_folders(tmp.path(), &Config::default()).unwrap();
        assert!(tmp.path().join(".bin").is_dir());
        assert!(tmp.path().join(".build").is_dir());
    }

    #[test]
    fn second_call_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = Config::default();
        check_folders(tmp.path(), &cfg).unwrap();
        std::fs::write(tmp.path().join(".build/marker"), "kept").unwrap();

        check_folders(tmp.path(), &cfg).unwrap();

        let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(".build/marker")).unwrap(),
            "kept"
        );
    }

    #[test]
    fn existing_file_in_place_of_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(".bin"), "not a dir").unwrap();
        let err = check_folders(tmp.path(), &Config::default()).unwrap_err();
        assert!(format!("{err:#}").contains(".bin"), "got: {err:#}");
    }
}
