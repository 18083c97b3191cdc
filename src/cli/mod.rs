//! Command-line interface for rene
//!
//! `commands` holds the clap surface and the run/undo/show-config flows,
//! `args` decodes the compact option values and `output` does the printing.

pub mod args;
pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::Output;
