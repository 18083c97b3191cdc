//! Compile-time errors raised while building a rename program.
//!
//! Every variant is detected before any directory is listed, so a caller
//! can report it once and exit without touching the filesystem.

use thiserror::Error;

/// Errors produced while compiling filters, replacements, rules and options.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The filter argument was empty.
    #[error("the filter is empty")]
    EmptyFilter,

    /// A character that cannot appear in a file name (or is reserved) was found.
    #[error("illegal {ch:?} in {text} at index {index}")]
    IllegalCharacter {
        ch: char,
        text: String,
        index: usize,
    },

    /// Two `*` wildcards in a row capture nothing useful and are rejected.
    #[error("illegal adjacent *s in {0}")]
    AdjacentWildcards(String),

    /// More extension clauses were supplied than `?` wildcards.
    #[error(
        "the filter extension contains {clauses} elements but the filter has only {wildcards} ?s"
    )]
    TooManyClauses { clauses: usize, wildcards: usize },

    /// A semantic range that is neither `lo-hi` nor `#lo-hi`.
    #[error("unrecognized semantic filter rule {0:?}")]
    SemanticRule(String),

    /// A `#lo-hi` range whose bounds are not integers.
    #[error("incorrect numeric range {0:?}")]
    NumericRange(String),

    /// An order permutation referenced a floater that the filter does not capture.
    #[error("order index {index} is out of range: the filter captures {floaters} floaters")]
    OrderOutOfRange { index: usize, floaters: usize },

    /// A rule argument whose first field is not a single letter.
    #[error("bad syntax in rule {0:?}. Did you forget the first /?")]
    RuleSyntax(String),

    /// A rule letter other than S, B or I.
    #[error("unrecognized rule {0:?}")]
    UnknownRule(String),

    /// A rule bound to a replacement variable that cannot drive it.
    #[error("{rule} rule is not supported by the {variable:?} variable")]
    RuleMismatch { rule: char, variable: char },

    /// More rules than rule variables in the replacement.
    #[error("more rules than specified in the replacement")]
    TooManyRules,

    /// Fewer rules than rule variables in the replacement.
    #[error("{replacement} contains {expected} rule-based variables but only {supplied} defined")]
    TooFewRules {
        replacement: String,
        expected: usize,
        supplied: usize,
    },

    /// A rule or option field that should be a number but is not.
    #[error("{field} expects a number, got {value:?}")]
    BadNumber { field: &'static str, value: String },

    /// A rule or option field whose number is outside the accepted range.
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    /// A substitution op that is neither U, L nor a character pair.
    #[error("unrecognized substitution {0:?}")]
    Substitution(String),

    /// A directory or exclusion glob that does not parse.
    #[error(transparent)]
    Glob(#[from] globset::Error),

    /// The assembled pattern was rejected by the regex engine.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}
