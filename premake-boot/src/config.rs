//! Configuration types for `premake-boot.toml`.
//!
//! The file is optional. Every field has a default, so a workspace without a
//! config file gets the conventional `.bin` / `.build` / `src` layout and the
//! pinned Premake release.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the workspace root.
pub const CONFIG_FILE: &str = "premake-boot.toml";

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Binary output directory (Premake `targetdir` root).
    pub bin_dir: String,
    /// Intermediate build directory. Holds Premake's project files and the
    /// downloaded Premake binary.
    pub build_dir: String,
    /// Directory whose immediate subdirectories are projects.
    pub projects_root: String,
    /// Build-description file written on the first run.
    pub output: PathBuf,
    /// Premake action passed on the command line.
    pub action: String,
    pub premake: PremakeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bin_dir: ".bin".to_string(),
            build_dir: ".build".to_string(),
            projects_root: "src".to_string(),
            output: PathBuf::from("premake5.lua"),
            action: "vs2022".to_string(),
            premake: PremakeConfig::default(),
        }
    }
}

/// Where Premake comes from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PremakeConfig {
    /// File name searched on `PATH` and extracted from the release archive.
    pub executable: String,
    /// Release archive (ZIP) downloaded when the executable is not found.
    pub url: String,
}

impl Default for PremakeConfig {
    fn default() -> Self {
        Self {
            executable: "premake5.exe".to_string(),
            url: "https://github.com/premake/premake-core/releases/download/v5.0.0-beta2/premake-5.0.0-beta2-windows.zip".to_string(),
        }
    }
}

/// Load and parse a `premake-boot.toml` configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let config: Config = toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {}", path.display(), e))?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::default`].
pub fn load_or_default(path: &Path) -> anyhow::Result<Config> {
    if path.is_file() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}
