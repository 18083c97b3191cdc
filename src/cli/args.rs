//! Decoding of the compact option values (`-Fd/*.lnk`, `-TSI`, `-O2,0` ...)

use anyhow::{Result, bail};
use globset::GlobSet;

use crate::config::ActionMode;
use crate::engine::CompileError;
use crate::fs::Selection;
use crate::shared::glob::build_globset;
use crate::shared::params::{param_list, parse_count, parse_int};

pub const PRINT_RENAMES: u32 = 0x1;
pub const PRINT_COLLISIONS: u32 = 0x2;
pub const PRINT_SKIPPED: u32 = 0x4;
pub const PRINT_UNCHANGED: u32 = 0x8;

/// Candidate selection from `-F`.
#[derive(Debug, Clone, Default)]
pub struct Prefilter {
    pub case_sensitive: bool,
    pub selection: Selection,
    pub exclusions: Option<GlobSet>,
}

impl Prefilter {
    pub fn parse(spec: &str) -> Result<Self, CompileError> {
        let mut prefilter = Self::default();
        let mut patterns = Vec::new();
        for field in param_list(spec) {
            match field {
                "C" => prefilter.case_sensitive = true,
                "d" => prefilter.selection = Selection::FilesAndDirectories,
                "D" => prefilter.selection = Selection::Directories,
                pattern => patterns.push(pattern.to_string()),
            }
        }
        if !patterns.is_empty() {
            prefilter.exclusions = Some(build_globset(&patterns)?);
        }
        Ok(prefilter)
    }
}

/// Flags from `-T`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tweaks {
    pub case_insensitive_sort: bool,
    pub line_input: bool,
}

impl Tweaks {
    pub fn parse(flags: &str) -> Result<Self> {
        let mut tweaks = Self::default();
        for flag in flags.chars() {
            match flag.to_ascii_uppercase() {
                'S' => tweaks.case_insensitive_sort = true,
                'I' => tweaks.line_input = true,
                other => bail!("Unrecognized -T flag {other:?}. Use S or I"),
            }
        }
        Ok(tweaks)
    }
}

/// Which logs an undo follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoScope {
    Directory,
    Recursive,
}

pub fn parse_undo(value: &str) -> Result<UndoScope> {
    match value {
        "" => Ok(UndoScope::Directory),
        "R" | "r" => Ok(UndoScope::Recursive),
        other => bail!("Unrecognized -U argument {other:?}. Use -U or -UR"),
    }
}

pub fn parse_action(value: &str) -> Result<ActionMode> {
    match value.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('A') => Ok(ActionMode::Ask),
        Some('S') => Ok(ActionMode::Show),
        Some('R') => Ok(ActionMode::Rename),
        _ => bail!("-A needs an argument, A, S, or R"),
    }
}

pub fn parse_print_mask(value: &str) -> Result<u32, CompileError> {
    let mask = parse_int("print mask", value)?;
    u32::try_from(mask).map_err(|_| CompileError::OutOfRange {
        field: "print mask",
        value: mask,
    })
}

/// `2,0,1` → floater indices.
pub fn parse_order(value: &str) -> Result<Vec<usize>, CompileError> {
    value
        .split(',')
        .map(|index| parse_count("floater order", index.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefilter_fields() {
        let prefilter = Prefilter::parse("C/d/*.lnk").unwrap();
        assert!(prefilter.case_sensitive);
        assert_eq!(prefilter.selection, Selection::FilesAndDirectories);
        assert!(prefilter.exclusions.unwrap().is_match("x.lnk"));

        let prefilter = Prefilter::parse("D").unwrap();
        assert_eq!(prefilter.selection, Selection::Directories);
        assert!(prefilter.exclusions.is_none());
    }

    #[test]
    fn test_tweaks() {
        let tweaks = Tweaks::parse("SI").unwrap();
        assert!(tweaks.case_insensitive_sort);
        assert!(tweaks.line_input);
        assert!(Tweaks::parse("Q").is_err());
    }

    #[test]
    fn test_action_modes() {
        assert_eq!(parse_action("r").unwrap(), ActionMode::Rename);
        assert_eq!(parse_action("Show").unwrap(), ActionMode::Show);
        let err = parse_action("").unwrap_err();
        assert_eq!(err.to_string(), "-A needs an argument, A, S, or R");
    }

    #[test]
    fn test_print_mask_and_order() {
        assert_eq!(parse_print_mask("0xFFFF").unwrap(), 0xFFFF);
        assert_eq!(parse_print_mask("0110").unwrap(), 6);
        assert!(parse_print_mask("-1").is_err());
        assert_eq!(parse_order("2,0").unwrap(), vec![2, 0]);
        assert!(parse_order("a").is_err());
    }

    #[test]
    fn test_undo_scope() {
        assert_eq!(parse_undo("").unwrap(), UndoScope::Directory);
        assert_eq!(parse_undo("R").unwrap(), UndoScope::Recursive);
        assert!(parse_undo("X").is_err());
    }
}
