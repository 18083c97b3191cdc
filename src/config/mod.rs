//! Layered configuration
//!
//! Embedded defaults, the user's config file, an explicit `--config` file,
//! `RENE_*` environment variables and finally command-line overrides, each
//! layer replacing the keys it sets.

pub mod core;
pub mod formats;

pub use core::{ActionMode, LogNames, Overrides, ReneConfig, Settings};
pub use formats::ConfigFormat;
