//! Locating, and if necessary installing, the Premake executable.
//!
//! Resolution order:
//!
//! 1. the configured executable name on the search path (`PATH`);
//! 2. a copy extracted into the build directory by an earlier run;
//! 3. the pinned release archive, downloaded and unpacked into the build
//!    directory.
//!
//! The download is not verified and never retried. Any failure aborts the
//! run with an [`AcquisitionError`].

use std::ffi::OsString;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;

/// Why the Premake executable could not be made available.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} while downloading {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read release archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("release archive has no entry named `{0}`")]
    MissingEntry(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Produces the path of a runnable build-configuration tool.
pub trait ToolResolver {
    fn resolve(&self) -> Result<PathBuf, AcquisitionError>;
}

/// Resolver for Premake: search path first, then the build directory, then
/// the network.
#[derive(Debug, Clone)]
pub struct PremakeInstaller {
    executable: String,
    url: String,
    root: PathBuf,
    install_dir: PathBuf,
    search_path: Option<OsString>,
}

impl PremakeInstaller {
    /// Installer for the workspace at `root`, searching the process `PATH`.
    pub fn new(root: &Path, cfg: &Config) -> Self {
        Self {
            executable: cfg.premake.executable.clone(),
            url: cfg.premake.url.clone(),
            root: root.to_path_buf(),
            install_dir: root.join(&cfg.build_dir),
            search_path: std::env::var_os("PATH"),
        }
    }

    /// Replace the directories searched for an already installed executable.
    /// `None` disables the search.
    pub fn with_search_path(mut self, search_path: Option<OsString>) -> Self {
        self.search_path = search_path;
        self
    }

    /// Where a downloaded executable is placed.
    pub fn installed_path(&self) -> PathBuf {
        self.install_dir.join(&self.executable)
    }

    fn find_on_search_path(&self) -> Option<PathBuf> {
        let paths = self.search_path.as_ref()?;
        match which::which_in(&self.executable, Some(paths), &self.root) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!(executable = %self.executable, error = %e, "not found on search path");
                None
            }
        }
    }

    fn download(&self) -> Result<Vec<u8>, AcquisitionError> {
        let response =
            reqwest::blocking::get(&self.url).map_err(|source| AcquisitionError::Download {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let bytes = response
            .bytes()
            .map_err(|source| AcquisitionError::Download {
                url: self.url.clone(),
                source,
            })?;
        debug!(size = bytes.len(), "downloaded release archive");
        Ok(bytes.to_vec())
    }
}

impl ToolResolver for PremakeInstaller {
    fn resolve(&self) -> Result<PathBuf, AcquisitionError> {
        if let Some(path) = self.find_on_search_path() {
            return Ok(path);
        }

        let installed = self.installed_path();
        if installed.is_file() {
            debug!(path = %installed.display(), "using previously downloaded premake");
            return Ok(installed);
        }

        info!(url = %self.url, "Premake not found, downloading it");
        let archive = self.download()?;
        let path = extract_entry(&archive, &self.executable, &self.install_dir)?;
        info!(path = %path.display(), "Premake downloaded successfully");
        Ok(path)
    }
}

/// Extract the single entry `name` from the ZIP `archive` into `dest_dir`.
///
/// The entry is written to a temporary file in `dest_dir` and renamed into
/// place, so an interrupted extraction never leaves a truncated executable.
pub fn extract_entry(
    archive: &[u8],
    name: &str,
    dest_dir: &Path,
) -> Result<PathBuf, AcquisitionError> {
    let mut reader = zip::ZipArchive::new(Cursor::new(archive))?;
    let mut entry = match reader.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(AcquisitionError::MissingEntry(name.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    std::fs::create_dir_all(dest_dir).map_err(io_err(dest_dir))?;
    let dest = dest_dir.join(name);

    let mut tmp = tempfile::NamedTempFile::new_in(dest_dir).map_err(io_err(dest_dir))?;
    std::io::copy(&mut entry, &mut tmp).map_err(io_err(&dest))?;
    tmp.persist(&dest).map_err(|e| AcquisitionError::Io {
        path: dest.clone(),
        source: e.error,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&dest, std::fs::Permissions::from_mode(0o755))
            .map_err(io_err(&dest))?;
    }

    Ok(dest)
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> AcquisitionError {
    let path = path.to_path_buf();
    move |source| AcquisitionError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn zip_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn offline_installer(root: &Path) -> PremakeInstaller {
        let cfg = Config {
            premake: crate::config::PremakeConfig {
                executable: "premake5.exe".to_string(),
                // Nothing listens here; a download attempt fails immediately.
                url: "https://127.0.0.1:9/premake.zip".to_string(),
            },
            ..Config::default()
        };
        PremakeInstaller::new(root, &cfg).with_search_path(None)
    }

    #[test]
    fn extracts_only_the_named_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = zip_with(&[
            ("LICENSE.txt", &b"license"[..]),
            ("premake5.exe", &b"binary-bytes"[..]),
        ]);

        let path = extract_entry(&archive, "premake5.exe", tmp.path()).unwrap();

        assert_eq!(path, tmp.path().join("premake5.exe"));
        assert_eq!(std::fs::read(&path).unwrap(), b"binary-bytes");
        assert!(!tmp.path().join("LICENSE.txt").exists());
        let leftovers: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1, "temporary file left behind");
    }

    #[test]
    fn missing_entry_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = zip_with(&[("premake5", &b"linux build"[..])]);

        let err = extract_entry(&archive, "premake5.exe", tmp.path()).unwrap_err();

        assert!(
            matches!(&err, AcquisitionError::MissingEntry(name) if name == "premake5.exe"),
            "got: {err:?}"
        );
        assert!(!tmp.path().join("premake5.exe").exists());
    }

    #[test]
    fn garbage_is_not_an_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let err = extract_entry(b"<html>rate limited</html>", "premake5.exe", tmp.path())
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::Archive(_)), "got: {err:?}");
    }

    #[test]
    fn reuses_previous_download() {
        let tmp = tempfile::tempdir().unwrap();
        let build = tmp.path().join(".build");
        std::fs::create_dir(&build).unwrap();
        std::fs::write(build.join("premake5.exe"), "cached").unwrap();

        let path = offline_installer(tmp.path()).resolve().unwrap();

        assert_eq!(path, build.join("premake5.exe"));
    }

    #[cfg(unix)]
    #[test]
    fn prefers_executable_on_search_path() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let bin = tmp.path().join("tools");
        std::fs::create_dir(&bin).unwrap();
        let exe = bin.join("premake5.exe");
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

        let build = tmp.path().join(".build");
        std::fs::create_dir(&build).unwrap();
        std::fs::write(build.join("premake5.exe"), "cached").unwrap();

        let installer =
            offline_installer(tmp.path()).with_search_path(Some(bin.clone().into_os_string()));
        let path = installer.resolve().unwrap();

        assert_eq!(path.canonicalize().unwrap(), exe.canonicalize().unwrap());
    }

    #[test]
    fn unreachable_download_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = offline_installer(tmp.path()).resolve().unwrap_err();
        assert!(
            matches!(err, AcquisitionError::Download { .. }),
            "got: {err:?}"
        );
        assert!(!tmp.path().join(".build/premake5.exe").exists());
    }
}
