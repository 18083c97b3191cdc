//! Filesystem side of a run: listing, renaming, logging and undo.

pub mod apply;
pub mod journal;
pub mod tree;
pub mod undo;

pub use apply::{ApplyReport, RenameFailure, apply_renames};
pub use tree::{FsTree, FsView, Selection, display_dir};
pub use undo::{UndoOutcome, UndoStep, recursive_targets, undo_directory};
