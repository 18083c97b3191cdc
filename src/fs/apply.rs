//! Executes a planned batch against the filesystem.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Result;

use super::journal;
use super::tree::same_entry;

/// A rename that could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameFailure {
    /// Something appeared under the new name after planning.
    Occupied { new: String },
    Denied { old: String },
    Failed { old: String, reason: String },
}

#[derive(Debug, Default)]
pub struct ApplyReport {
    pub renamed: usize,
    pub failures: Vec<RenameFailure>,
}

/// Record `renames` in the action log, then perform them in order.
///
/// A failed rename is reported and the batch carries on.
pub fn apply_renames(
    dir: &Path,
    log_name: &str,
    renames: &[(String, String)],
) -> Result<ApplyReport> {
    journal::write_actions(dir, log_name, renames)?;

    let mut report = ApplyReport::default();
    for (old, new) in renames {
        let source = dir.join(old);
        let target = dir.join(new);
        if target.exists() && !same_entry(&source, &target) {
            report.failures.push(RenameFailure::Occupied { new: new.clone() });
            continue;
        }
        match fs::rename(&source, &target) {
            Ok(()) => {
                tracing::debug!("renamed {} to {new}", source.display());
                report.renamed += 1;
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                report.failures.push(RenameFailure::Denied { old: old.clone() });
            }
            Err(e) => report.failures.push(RenameFailure::Failed {
                old: old.clone(),
                reason: e.to_string(),
            }),
        }
    }
    Ok(report)
}
