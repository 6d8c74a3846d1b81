//! premake-boot: first-run configuration of a Premake C/C++ workspace.
//!
//! Infers a solution from the directory layout, writes `premake5.lua` once,
//! keeps the generated folders out of `.gitignore`, makes sure a Premake
//! binary is available (downloading the pinned release if needed) and runs it.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//!
//! // Same as running `premake-boot` in the workspace directory.
//! let status = premake_boot::run(Path::new("."), None, None).unwrap();
//! std::process::exit(status.code().unwrap_or(1));
//! ```
//!
//! Or stop before Premake runs, with a custom tool resolver:
//!
//! ```no_run
//! use std::path::Path;
//! use premake_boot::{config::Config, tool::PremakeInstaller};
//!
//! let root = Path::new(".");
//! let cfg = Config::default();
//! let boot = premake_boot::bootstrap(root, &cfg, &PremakeInstaller::new(root, &cfg)).unwrap();
//! println!("premake at {}", boot.tool.display());
//! ```

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use tracing::{debug, info};

pub mod config;
pub mod gitignore;
pub mod layout;
pub mod paths;
pub mod project;
pub mod tool;
pub mod workspace;

use config::Config;
use tool::ToolResolver;

/// Outcome of [`bootstrap`].
#[derive(Debug, Clone)]
pub struct Bootstrap {
    /// Premake executable, in host path conventions.
    pub tool: PathBuf,
    /// The build description Premake will read.
    pub build_description: PathBuf,
    /// `false` when an existing build description was kept.
    pub generated: bool,
}

/// Run everything up to, but not including, Premake itself.
///
/// 1. create the output directories;
/// 2. add them to `.gitignore`;
/// 3. resolve the Premake executable through `resolver`;
/// 4. write the build description unless it already exists.
pub fn bootstrap(root: &Path, cfg: &Config, resolver: &dyn ToolResolver) -> Result<Bootstrap> {
    layout::check_folders(root, cfg)?;
    gitignore::modify_gitignore(root, cfg)?;

    let tool = resolver.resolve().context("locating premake")?;
    let tool = paths::host_path(&tool);
    info!(path = %tool.display(), "using premake");

    let build_description = root.join(&cfg.output);
    let generated = if build_description.exists() {
        debug!(
            path = %build_description.display(),
            "build description exists, leaving it untouched"
        );
        false
    } else {
        workspace::generate_premake_file(root, cfg)?;
        true
    };

    Ok(Bootstrap {
        tool,
        build_description,
        generated,
    })
}

/// Run `tool <action>` in `root` and wait for it to exit.
pub fn invoke_tool(root: &Path, tool: &Path, action: &str) -> Result<ExitStatus> {
    info!(tool = %tool.display(), action, "running premake");
    let status = Command::new(tool)
        .arg(action)
        .current_dir(root)
        .status()
        .with_context(|| format!("launching {}", tool.display()))?;
    debug!(%status, "premake exited");
    Ok(status)
}

/// Run the full first-run pipeline for the workspace at `root` and return
/// Premake's exit status.
///
/// `config_path` defaults to `root/premake-boot.toml`; a missing file means
/// default settings. `action` overrides the configured Premake action.
pub fn run(root: &Path, config_path: Option<&Path>, action: Option<&str>) -> Result<ExitStatus> {
    let root = root
        .canonicalize()
        .with_context(|| format!("resolving workspace {}", root.display()))?;

    let cfg = match config_path {
        Some(p) => config::load_config(p)
            .with_context(|| format!("loading config from {}", p.display()))?,
        None => config::load_or_default(&root.join(config::CONFIG_FILE))?,
    };

    let installer = tool::PremakeInstaller::new(&root, &cfg);
    let boot = bootstrap(&root, &cfg, &installer)?;
    if !boot.generated {
        info!(
            path = %boot.build_description.display(),
            "keeping existing build description"
        );
    }

    invoke_tool(&root, &boot.tool, action.unwrap_or(&cfg.action))
}
