//! Action and visit logs
//!
//! The action log holds one `OLD>NEW` line per planned rename and is
//! written in full before the first rename runs. The visit log holds one
//! absolute directory per line, in visiting order.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const SEPARATOR: char = '>';

/// Overwrite the action log in `dir` with `renames`.
pub fn write_actions(dir: &Path, log_name: &str, renames: &[(String, String)]) -> Result<()> {
    let path = dir.join(log_name);
    let mut content = String::new();
    for (old, new) in renames {
        content.push_str(old);
        content.push(SEPARATOR);
        content.push_str(new);
        content.push('\n');
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Read the action log in `dir`. `None` when there is no log.
pub fn read_actions(dir: &Path, log_name: &str) -> Result<Option<Vec<(String, String)>>> {
    let path = dir.join(log_name);
    if !path.is_file() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;

    let mut actions = Vec::new();
    for line in content.lines() {
        // Names never contain '>', so the first one is the separator.
        match line.split_once(SEPARATOR) {
            Some((old, new)) => actions.push((old.to_string(), new.to_string())),
            None if line.is_empty() => {}
            None => tracing::warn!("ignoring malformed line {line:?} in {}", path.display()),
        }
    }
    Ok(Some(actions))
}

/// Overwrite the visit log in `dir` with `visited`.
pub fn write_visits(dir: &Path, log_name: &str, visited: &[PathBuf]) -> Result<()> {
    let path = dir.join(log_name);
    let mut content = String::new();
    for visit in visited {
        content.push_str(&visit.to_string_lossy());
        content.push('\n');
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Read the visit log in `dir`. `None` when there is no log.
pub fn read_visits(dir: &Path, log_name: &str) -> Result<Option<Vec<PathBuf>>> {
    let path = dir.join(log_name);
    if !path.is_file() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(
        content
            .lines()
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect(),
    ))
}
