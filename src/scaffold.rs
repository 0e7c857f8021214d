//! File scaffolding for generator-style commands: `{token}` template
//! interpolation, file generation, and marker-based injection into existing
//! files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{CmdtrieError, Result};

/// Substitution set for templates. `{key}` occurrences are replaced
/// verbatim; unknown tokens are left alone so typos stay visible in the
/// generated file.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    vars: BTreeMap<String, String>,
}

impl TemplateVars {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn render(&self, template: &str) -> String {
        let mut out = template.to_string();
        for (key, value) in &self.vars {
            out = out.replace(&format!("{{{key}}}"), value);
        }
        out
    }
}

/// Where injected content lands relative to the marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectPosition {
    Before,
    After,
}

/// Render `template` with `vars` and write it to `path`, creating parent
/// directories. Refuses to overwrite unless `force` is set.
pub fn generate_file(path: &Path, template: &str, vars: &TemplateVars, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CmdtrieError::Scaffold(format!(
            "{} already exists (pass force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, vars.render(template))?;
    debug!(path = %path.display(), "generated file");
    Ok(())
}

/// Insert `content` as its own line before or after the first line
/// containing `marker`.
pub fn inject_into_file(
    path: &Path,
    marker: &str,
    content: &str,
    position: InjectPosition,
) -> Result<()> {
    let original = fs::read_to_string(path)
        .map_err(|err| CmdtrieError::Scaffold(format!("read {}: {err}", path.display())))?;
    let mut lines: Vec<&str> = original.lines().collect();
    let marker_idx = lines
        .iter()
        .position(|line| line.contains(marker))
        .ok_or_else(|| {
            CmdtrieError::Scaffold(format!(
                "marker {marker:?} not found in {}",
                path.display()
            ))
        })?;
    let insert_at = match position {
        InjectPosition::Before => marker_idx,
        InjectPosition::After => marker_idx + 1,
    };
    lines.insert(insert_at, content);
    let mut joined = lines.join("\n");
    if original.ends_with('\n') {
        joined.push('\n');
    }
    fs::write(path, joined)?;
    debug!(path = %path.display(), marker, "injected content");
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|err| {
            CmdtrieError::Scaffold(format!("create dir {}: {err}", path.display()))
        })?;
    }
    Ok(())
}

// =========================================
// Tests
// =========================================
