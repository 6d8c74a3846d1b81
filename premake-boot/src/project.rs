//! Per-project inference and the `project` block of `premake5.lua`.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

use crate::paths::forward_slashes;

/// Source files whose presence makes a project an executable.
const ENTRY_POINTS: [&str; 2] = ["main.c", "main.cpp"];

/// What Premake builds for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Executable,
    Library,
}

impl ProjectKind {
    /// Premake `kind` value.
    pub fn premake_kind(self) -> &'static str {
        match self {
            ProjectKind::Executable => "ConsoleApp",
            ProjectKind::Library => "StaticLib",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.premake_kind())
    }
}

/// One inferred sub-project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    /// Project directory relative to the workspace root, forward slashes only.
    pub path: String,
    pub kind: ProjectKind,
}

impl Project {
    pub fn new(name: impl Into<String>, path: &str, kind: ProjectKind) -> Self {
        Self {
            name: name.into(),
            path: forward_slashes(path),
            kind,
        }
    }

    /// Inspect `dir` on disk and describe it as the project `name`, written
    /// into the build description as `rel_path`.
    pub fn discover(name: impl Into<String>, dir: &Path, rel_path: &str) -> Result<Self> {
        let kind = detect_kind(dir)?;
        Ok(Self::new(name, rel_path, kind))
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Project: {}, {}, {}", self.name, self.path, self.kind)
    }
}

/// [`ProjectKind::Executable`] if `dir` directly contains `main.c` or
/// `main.cpp` in any letter case, [`ProjectKind::Library`] otherwise.
pub fn detect_kind(dir: &Path) -> Result<ProjectKind> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
        if ENTRY_POINTS.contains(&name.as_str()) && entry.path().is_file() {
            return Ok(ProjectKind::Executable);
        }
    }
    Ok(ProjectKind::Library)
}

/// Render the `project` block for `project`.
///
/// Every project other than the one named after the solution links against
/// the solution-named project.
pub fn generate_project_def(solution_name: &str, project: &Project) -> String {
    let path = escape_lua(&project.path);
    let mut content = format!("project \"{}\"\n", escape_lua(&project.name));
    content.push_str("    language \"C++\"\n");
    content.push_str(&format!("    kind \"{}\"\n", project.kind.premake_kind()));
    content.push_str(&format!("    files {{ \"{path}/**.*\" }}\n"));
    content.push_str(&format!("    removefiles {{ \"{path}/**.aps\" }}\n"));
    content.push_str(&format!("    includedirs {{ \"{path}\" }}\n"));

    if project.name != solution_name {
        let main = escape_lua(solution_name);
        content.push_str(&format!("    links {{ \"{main}\" }}\n"));
    }

    content.push('\n');
    content
}

/// Escape `text` for use inside a double-quoted Lua string.
pub fn escape_lua(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
