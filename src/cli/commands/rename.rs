use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::Cli;
use crate::cli::args::{
    self, PRINT_COLLISIONS, PRINT_RENAMES, PRINT_SKIPPED, PRINT_UNCHANGED, Prefilter,
};
use crate::cli::output::Output;
use crate::config::{ActionMode, Settings};
use crate::engine::{
    BatchDriver, BatchEvent, BatchPlan, CollisionScheme, MatchOptions, NameTransform, NativeProgram,
    Recursion, RegexProgram, SubstituteOp, Traversal,
};
use crate::fs::{FsTree, RenameFailure, apply_renames, display_dir, journal};

const CONFIRM_PROMPT: &str = "Do you want to make these changes now? Y/N";

/// How new names are produced.
#[derive(Debug, Clone)]
pub enum Mode {
    Pattern {
        filter: String,
        replacement: String,
        rules: Vec<String>,
    },
    Regex {
        pattern: String,
        template: String,
    },
    Substitute(String),
}

/// Everything a rename run needs from the command line besides [`Settings`].
#[derive(Debug, Clone)]
pub struct RenameRequest {
    pub mode: Mode,
    pub order: Option<Vec<usize>>,
    pub prefilter: Prefilter,
    /// `None` renames only the starting directory.
    pub recursion: Option<Recursion>,
}

impl RenameRequest {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let mode = match (cli.substitute, cli.filter, cli.replacement) {
            (Some(ops), None, None) => Mode::Substitute(ops),
            (Some(_), _, _) => bail!("-S takes no filter or replacement"),
            (None, Some(filter), Some(replacement)) if cli.regex => {
                if !cli.rules.is_empty() {
                    bail!("Rules cannot be used with -E");
                }
                Mode::Regex {
                    pattern: filter,
                    template: replacement,
                }
            }
            (None, Some(filter), Some(replacement)) => Mode::Pattern {
                filter,
                replacement,
                rules: cli.rules,
            },
            _ => bail!("A filter and a replacement are required. Run 'rene --help' for usage"),
        };

        let order = cli.order.as_deref().map(args::parse_order).transpose()?;
        let prefilter = match cli.prefilter.as_deref() {
            Some(spec) => Prefilter::parse(spec)?,
            None => Prefilter::default(),
        };
        let recursion = cli.recurse.as_deref().map(Recursion::parse).transpose()?;

        Ok(Self {
            mode,
            order,
            prefilter,
            recursion,
        })
    }

    fn transform(&self, settings: &Settings) -> Result<NameTransform> {
        let transform = match &self.mode {
            Mode::Pattern {
                filter,
                replacement,
                rules,
            } => {
                let options = MatchOptions {
                    case_sensitive: settings.case_sensitive,
                    order: self.order.clone(),
                };
                NameTransform::Native(NativeProgram::compile(filter, replacement, rules, &options)?)
            }
            Mode::Regex { pattern, template } => NameTransform::Regex(RegexProgram::compile(
                pattern,
                template,
                settings.case_sensitive,
            )?),
            Mode::Substitute(ops) => NameTransform::Substitute(SubstituteOp::parse_list(ops)?),
        };
        Ok(transform)
    }
}

pub fn execute(request: RenameRequest, settings: &Settings, output: &Output) -> Result<()> {
    let transform = request.transform(settings)?;
    let scheme = CollisionScheme::parse(&settings.collision)?;
    let mut driver = BatchDriver::new(transform, scheme);

    let order = settings.sort.effective();
    let tree = FsTree::new(request.prefilter.selection, order)
        .with_exclusions(request.prefilter.exclusions.clone())
        .with_reserved(vec![settings.logs.actions.clone(), settings.logs.visits.clone()]);

    let root = std::env::current_dir().context("Failed to read the current directory")?;
    let base = root.parent().unwrap_or(&root).to_path_buf();
    let recursive = request.recursion.is_some();
    let recursion = request.recursion.unwrap_or_else(Recursion::none);

    let mut visited: Vec<PathBuf> = Vec::new();
    let completed = Traversal::new(&tree, &mut driver, &recursion).run(
        &root,
        &mut |dir: &Path, plan: BatchPlan| {
            if recursive {
                output.directory(&display_dir(&base, dir));
            }
            visited.push(dir.to_path_buf());
            process_directory(dir, plan, settings, output)
        },
    )?;

    if recursive && settings.action != ActionMode::Show {
        journal::write_visits(&root, &settings.logs.visits, &visited)?;
    }
    if !completed {
        bail!("Stopped on a name collision");
    }
    Ok(())
}

/// Report one directory's plan and carry it out if the action mode allows.
fn process_directory(
    dir: &Path,
    plan: BatchPlan,
    settings: &Settings,
    output: &Output,
) -> Result<()> {
    report(&plan, settings.print, output);

    if plan.aborted {
        return Ok(());
    }
    if plan.renames.is_empty() {
        output.line("No files meet the criteria for renaming");
        return Ok(());
    }

    let proceed = match settings.action {
        ActionMode::Show => false,
        ActionMode::Rename => true,
        ActionMode::Ask => output
            .confirm(CONFIRM_PROMPT, settings.line_input)
            .context("Failed to read the confirmation")?,
    };
    if !proceed {
        return Ok(());
    }

    let report = apply_renames(dir, &settings.logs.actions, &plan.renames)?;
    for failure in &report.failures {
        match failure {
            RenameFailure::Occupied { new } => output.error(&format!("Unable to overwrite {new}")),
            RenameFailure::Denied { old } => output.error(&format!("Denied access to {old}")),
            RenameFailure::Failed { old, reason } => {
                output.error(&format!("Unable to rename {old}: {reason}"))
            }
        }
    }
    output.verbose(&format!("{} of {} renamed", report.renamed, plan.renames.len()));
    Ok(())
}

fn report(plan: &BatchPlan, mask: u32, output: &Output) {
    let shows = |bit: u32| mask & bit != 0;
    for event in &plan.events {
        match event {
            BatchEvent::Planned { old, new } if shows(PRINT_RENAMES) => output.rename(old, new),
            BatchEvent::Skipped(old) if shows(PRINT_SKIPPED) => {
                output.line(&format!("Skipping {old}"))
            }
            BatchEvent::Unchanged(old) if shows(PRINT_UNCHANGED) => {
                output.line(&format!("{old} is unchanged"))
            }
            BatchEvent::Warning(message) => output.warning(message),
            BatchEvent::Collision { trace, resolved } if !resolved || shows(PRINT_COLLISIONS) => {
                output.line(trace)
            }
            BatchEvent::AlreadyExists { old, new } => {
                output.error(&format!("{new} already exists. Unable to rename {old}"))
            }
            BatchEvent::Unresolvable(old) => {
                output.error(&format!("Unresolvable collision trying to rename {old}"))
            }
            _ => {}
        }
    }
}
