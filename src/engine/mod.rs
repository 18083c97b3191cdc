//! The renaming engine
//!
//! Everything in this module is a pure function of its inputs plus the
//! rule state owned by the caller. Directory listing, existence checks and
//! the actual renames are supplied from outside through [`DirectoryView`]
//! and [`Tree`].

pub mod batch;
pub mod collision;
pub mod error;
pub mod extension;
pub mod filter;
pub mod increment;
pub mod replace;
pub mod rules;
pub mod transform;
pub mod traverse;

pub use batch::{BatchDriver, BatchEvent, BatchPlan, DirectoryView};
pub use collision::{CollisionPolicy, CollisionScheme};
pub use error::CompileError;
pub use extension::split_extension;
pub use filter::FilterProgram;
pub use increment::{next_name, next_name_from};
pub use replace::{ReplacementProgram, Synthesis};
pub use rules::RuleSet;
pub use transform::{MatchOptions, NameTransform, NativeProgram, RegexProgram, SubstituteOp};
pub use traverse::{Recursion, SortOrder, Traversal, Tree};
