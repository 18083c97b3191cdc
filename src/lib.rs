//! # rene - batch renaming with positional wildcard patterns
//!
//! A filter such as `08*-0*` captures the variable parts of each name (the
//! *floaters*) and a replacement such as `/hap*` rebuilds the name from
//! them, with rules transforming or inserting values along the way:
//!
//! ```bash
//! # 08493357-001.tif -> hap01.tif, 08493357-002.tif -> hap02.tif ...
//! rene '08*-0*' '/hap*' -AR
//!
//! # number every photo, restarting in each directory
//! rene '*.jpg' 'img:.jpg' I/1/1/3/R -R
//!
//! # put it all back
//! rene -UR
//! ```
//!
//! The [`engine`] module is filesystem-free and can be driven directly:
//!
//! ```rust
//! use rene::engine::{MatchOptions, NativeProgram};
//!
//! let options = MatchOptions::default();
//! let mut program = NativeProgram::compile("08*-0*", "/hap*", &[] as &[&str], &options)?;
//! let renamed = program.rename("08493357-001.tif").map(|s| s.name);
//! assert_eq!(renamed.as_deref(), Some("hap01.tif"));
//! # Ok::<(), rene::engine::CompileError>(())
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod fs;
pub mod shared;

pub use cli::{Cli, Output};
pub use config::ReneConfig;

/// Result type alias for rene operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
