use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::args::UndoScope;
use crate::cli::output::Output;
use crate::config::Settings;
use crate::fs::{UndoOutcome, display_dir, recursive_targets, undo_directory};

pub fn execute(scope: UndoScope, settings: &Settings, output: &Output) -> Result<()> {
    let root = std::env::current_dir().context("Failed to read the current directory")?;

    match scope {
        UndoScope::Directory => undo_in(&root, &settings.logs.actions, output),
        UndoScope::Recursive => {
            let Some(targets) = recursive_targets(&root, &settings.logs.visits)? else {
                output.warning(&format!("Missing {} file", settings.logs.visits));
                return Ok(());
            };
            let base = root.parent().unwrap_or(&root);
            for dir in targets {
                output.directory(&display_dir(base, &dir));
                undo_in(&dir, &settings.logs.actions, output)?;
            }
            Ok(())
        }
    }
}

fn undo_in(dir: &Path, log_name: &str, output: &Output) -> Result<()> {
    let Some(steps) = undo_directory(dir, log_name)? else {
        output.warning(&format!("Missing {log_name} file"));
        return Ok(());
    };

    for step in steps {
        output.line(&format!("rename {} back to {}", step.new, step.old));
        match step.outcome {
            UndoOutcome::Restored => {}
            UndoOutcome::Missing => output.error(&format!("{} does not exist", step.new)),
            UndoOutcome::Occupied => output.error(&format!("{} already exists", step.old)),
            UndoOutcome::Failed(reason) => {
                output.error(&format!("Unable to rename {} back: {reason}", step.new))
            }
        }
    }
    Ok(())
}
