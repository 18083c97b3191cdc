//! Reverting the most recent run from its logs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::journal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    Restored,
    /// The renamed entry is gone.
    Missing,
    /// Something already sits under the old name.
    Occupied,
    Failed(String),
}

/// One reverted log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoStep {
    pub old: String,
    pub new: String,
    pub outcome: UndoOutcome,
}

/// Revert the renames recorded in `dir`. `None` when `dir` has no action log.
///
/// Lines are processed in log order. Problems with one line never stop the
/// rest.
pub fn undo_directory(dir: &Path, log_name: &str) -> Result<Option<Vec<UndoStep>>> {
    let Some(actions) = journal::read_actions(dir, log_name)? else {
        return Ok(None);
    };

    let steps = actions
        .into_iter()
        .map(|(old, new)| {
            let outcome = revert(&dir.join(&new), &dir.join(&old));
            UndoStep { old, new, outcome }
        })
        .collect();
    Ok(Some(steps))
}

fn revert(renamed: &Path, original: &Path) -> UndoOutcome {
    if !renamed.exists() {
        return UndoOutcome::Missing;
    }
    if original.exists() {
        return UndoOutcome::Occupied;
    }
    match fs::rename(renamed, original) {
        Ok(()) => UndoOutcome::Restored,
        Err(e) => UndoOutcome::Failed(e.to_string()),
    }
}

/// Directories to revert for a recursive undo, deepest visit first.
/// `None` when `dir` has no visit log.
pub fn recursive_targets(dir: &Path, visit_log: &str) -> Result<Option<Vec<PathBuf>>> {
    Ok(journal::read_visits(dir, visit_log)?.map(|mut visited| {
        visited.reverse();
        visited
    }))
}
