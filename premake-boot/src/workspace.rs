//! Workspace inference and the full `premake5.lua` document.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::paths::forward_slashes;
use crate::project::{Project, escape_lua, generate_project_def};

/// Base name of the workspace root directory.
pub fn solution_name(root: &Path) -> Result<String> {
    let abs = root
        .canonicalize()
        .with_context(|| format!("resolving {}", root.display()))?;
    let name = abs
        .file_name()
        .with_context(|| format!("{} has no directory name", abs.display()))?;
    Ok(name.to_string_lossy().into_owned())
}

/// Find the projects of the workspace at `root`.
///
/// Without a projects root directory the workspace itself is the only
/// project, named after the solution. Otherwise every immediate subdirectory
/// of the projects root is a project. Projects are sorted by name so the
/// generated file does not depend on directory listing order.
pub fn discover_projects(root: &Path, solution: &str, cfg: &Config) -> Result<Vec<Project>> {
    let projects_root = root.join(&cfg.projects_root);
    if !projects_root.is_dir() {
        debug!(dir = %projects_root.display(), "no projects root, using workspace directory");
        return Ok(vec![Project::discover(solution, root, ".")?]);
    }

    let mut names = Vec::new();
    let entries = std::fs::read_dir(&projects_root)
        .with_context(|| format!("listing {}", projects_root.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", projects_root.display()))?;
        if !entry.path().is_dir() {
            debug!(path = %entry.path().display(), "skipping non-directory entry");
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    let base = forward_slashes(&cfg.projects_root);
    let base = base.trim_end_matches('/');
    names
        .into_iter()
        .map(|name| {
            let rel = format!("{base}/{name}");
            Project::discover(name.as_str(), &projects_root.join(&name), &rel)
        })
        .collect()
}

/// Render the complete build description: workspace settings followed by
/// one block per project.
pub fn render_workspace(solution: &str, projects: &[Project], cfg: &Config) -> String {
    let build_dir = escape_lua(&forward_slashes(&cfg.build_dir));
    let bin_dir = escape_lua(&forward_slashes(&cfg.bin_dir));
    let projects_root = forward_slashes(&cfg.projects_root);
    let projects_root = escape_lua(projects_root.trim_end_matches('/'));
    let workspace = escape_lua(solution);

    let mut content = format!(
        r##"workspace "{workspace}"
    -- Premake output folder
    location(path.join("{build_dir}", _ACTION))

    -- Target architecture
    architecture "x86_64"

    -- Configuration settings
    configurations {{ "Debug", "Release" }}

    -- Debug configuration
    filter {{ "configurations:Debug" }}
        defines {{ "DEBUG" }}
        symbols "On"
        optimize "Off"

    -- Release configuration
    filter {{ "configurations:Release" }}
        defines {{ "NDEBUG" }}
        optimize "Speed"
        inlining "Auto"

    filter {{ "language:not C#" }}
        defines {{ "_CRT_SECURE_NO_WARNINGS" }}
        characterset ("MBCS")
        cppdialect "C++latest"
        staticruntime "on"

    filter {{ }}
        targetdir "{bin_dir}/%{{cfg.longname}}/"
        defines {{ "WIN32", "_AMD64_" }}
        exceptionhandling "Off"
        rtti "Off"
        vectorextensions "AVX2"

-------------------------------------------------------------------------------

includedirs {{ "libs", "include", "{projects_root}" }}

"##
    );

    for project in projects {
        debug!("{project}");
        content.push_str(&generate_project_def(solution, project));
    }
    content
}

/// Infer the workspace at `root` and write its build description.
///
/// The content goes to a temporary file next to the target and is renamed
/// into place only if nothing exists there yet, so an existing build
/// description is never replaced and a failed write never leaves a partial
/// one. Returns the path written.
pub fn generate_premake_file(root: &Path, cfg: &Config) -> Result<PathBuf> {
    let solution = solution_name(root)?;
    info!(solution = %solution, "solution name");

    let projects = discover_projects(root, &solution, cfg)?;
    let content = render_workspace(&solution, &projects, cfg);

    let path = root.join(&cfg.output);
    let dir = path.parent().unwrap_or(root);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    tmp.persist_noclobber(&path)
        .map_err(|e| e.error)
        .with_context(|| format!("creating {}", path.display()))?;

    info!(
        path = %path.display(),
        projects = projects.len(),
        "wrote build description"
    );
    Ok(path)
}
