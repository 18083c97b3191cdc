//! Transform rules bound to replacement variables
//!
//! - `S/lead/trail/mode` slices a floater
//! - `B/step/mask` bumps a floater through the increment primitive
//! - `I/start/step/width/flags` inserts a counter that advances on every use
//!
//! Slice and Bump are pure functions of the floater they consume. Insert is
//! the only stateful rule; its counter lives in the [`RuleSet`] owned by the
//! caller and survives across files and directories unless it carries the
//! reload flag.

use super::error::CompileError;
use super::extension::split_extension;
use super::increment::next_name;
use super::replace::Variable;
use crate::shared::params::{looks_numeric, parse_count, parse_int};

/// Bump mask bits; shifted left by [`DROP_SHIFT`] they drop instead of copy.
pub const BUMP_ALPHA: u32 = 0x1;
pub const BUMP_NUMERIC: u32 = 0x2;
pub const BUMP_PUNCTUATION: u32 = 0x4;
const DROP_SHIFT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceMode {
    /// `lead` leading plus `trail` trailing characters.
    Ends,
    /// The half-open character range `[lead, trail)`.
    Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceRule {
    pub lead: usize,
    pub trail: usize,
    pub mode: SliceMode,
}

impl SliceRule {
    /// Slice `source`, returning the result and a warning when the source
    /// cannot satisfy the requested bounds.
    pub fn apply(&self, source: &str) -> (String, Option<String>) {
        let chars: Vec<char> = source.chars().collect();
        let len = chars.len();
        match self.mode {
            SliceMode::Ends => {
                let warning = (len < self.lead + self.trail)
                    .then(|| format!("{source} is smaller than the slice"));
                let lead: String = chars[..self.lead.min(len)].iter().collect();
                let trail: String = chars[len - self.trail.min(len)..].iter().collect();
                (lead + &trail, warning)
            }
            SliceMode::Range => {
                let warning = (self.lead >= self.trail || self.trail > len)
                    .then(|| format!("{source} cannot satisfy the slice"));
                let end = self.trail.min(len);
                let start = self.lead.min(end);
                (chars[start..end].iter().collect(), warning)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpRule {
    pub step: i64,
    pub mask: u32,
}

impl BumpRule {
    pub fn apply(&self, source: &str) -> String {
        let (root, extension) = split_extension(source);
        let class = match root.chars().last() {
            Some(c) if c.is_ascii_alphabetic() => BUMP_ALPHA,
            Some(c) if c.is_ascii_digit() => BUMP_NUMERIC,
            _ => BUMP_PUNCTUATION,
        };

        if self.mask & class == 0 {
            format!("{}{extension}", next_name(root, self.step))
        } else if self.mask & (class << DROP_SHIFT) == 0 {
            source.to_string()
        } else {
            extension.to_string()
        }
    }
}

/// Current value of an Insert counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Counter {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertRule {
    pub current: Counter,
    pub step: i64,
    pub width: usize,
    /// Insert at the token position instead of before the extension.
    pub exact: bool,
    /// Restore `initial` at every directory boundary.
    pub reload: bool,
    pub initial: Counter,
}

impl InsertRule {
    /// Emit the current value and advance the counter.
    pub fn take(&mut self) -> String {
        match &mut self.current {
            Counter::Number(value) => {
                let text = format!("{:0width$}", *value, width = self.width);
                let next = value.saturating_add(self.step);
                if value.checked_add(self.step).is_none() && next != *value {
                    tracing::warn!("insert counter saturates at {next}");
                }
                *value = next;
                text
            }
            Counter::Text(value) => {
                let text = value.clone();
                *value = next_name(&text, self.step);
                text
            }
        }
    }

    pub fn reset(&mut self) {
        self.current = self.initial.clone();
    }
}

/// A rule selected once at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Slice(SliceRule),
    Bump(BumpRule),
    Insert(InsertRule),
}

impl Rule {
    /// Parse one rule argument for the replacement variable it is paired with.
    pub fn parse(arg: &str, variable: Variable) -> Result<Self, CompileError> {
        let fields: Vec<&str> = arg.split('/').collect();
        let mut letters = fields[0].chars();
        let (Some(letter), None) = (letters.next(), letters.next()) else {
            return Err(CompileError::RuleSyntax(arg.to_string()));
        };
        let field = |index: usize| fields.get(index).copied().filter(|f| !f.is_empty());

        let rule = match letter {
            'S' => {
                let mode = match field(3).map(|f| parse_int("S mode", f)).transpose()? {
                    None | Some(0) => SliceMode::Ends,
                    Some(1) => SliceMode::Range,
                    Some(other) => {
                        return Err(CompileError::OutOfRange {
                            field: "S mode",
                            value: other,
                        });
                    }
                };
                Rule::Slice(SliceRule {
                    lead: field(1).map_or(Ok(2), |f| parse_count("S lead", f))?,
                    trail: field(2).map_or(Ok(2), |f| parse_count("S trail", f))?,
                    mode,
                })
            }
            'B' => {
                let mask = field(2).map_or(Ok(0), |f| parse_int("B mask", f))?;
                Rule::Bump(BumpRule {
                    step: field(1).map_or(Ok(1), |f| parse_int("B step", f))?,
                    mask: u32::try_from(mask).map_err(|_| CompileError::OutOfRange {
                        field: "B mask",
                        value: mask,
                    })?,
                })
            }
            'I' => {
                let start = match field(1) {
                    None => Counter::Number(0),
                    Some(f) if looks_numeric(f) => Counter::Number(parse_int("I start", f)?),
                    Some(f) => Counter::Text(f.to_string()),
                };
                let flags = field(4).unwrap_or("");
                Rule::Insert(InsertRule {
                    current: start.clone(),
                    step: field(2).map_or(Ok(1), |f| parse_int("I step", f))?,
                    width: field(3).map_or(Ok(1), |f| parse_count("I width", f))?,
                    exact: flags.contains('E'),
                    reload: flags.contains('R'),
                    initial: start,
                })
            }
            _ => return Err(CompileError::UnknownRule(arg.to_string())),
        };

        let expected = match rule {
            Rule::Insert(_) => Variable::Insert,
            Rule::Slice(_) | Rule::Bump(_) => Variable::RuleConsume,
        };
        if variable != expected {
            return Err(CompileError::RuleMismatch {
                rule: letter,
                variable: variable.symbol(),
            });
        }
        Ok(rule)
    }
}

/// The owned, mutable rule state of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Pair rule arguments with the rule variables of a replacement, in order.
    pub fn compile<S: AsRef<str>>(
        args: &[S],
        variables: &[Variable],
        replacement: &str,
    ) -> Result<Self, CompileError> {
        if args.len() > variables.len() {
            return Err(CompileError::TooManyRules);
        }
        if args.len() < variables.len() {
            return Err(CompileError::TooFewRules {
                replacement: replacement.to_string(),
                expected: variables.len(),
                supplied: args.len(),
            });
        }

        let rules = args
            .iter()
            .zip(variables)
            .map(|(arg, &variable)| Rule::parse(arg.as_ref(), variable))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("compiled {} rules: {rules:?}", rules.len());
        Ok(Self { rules })
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Rule> {
        self.rules.get_mut(index)
    }

    /// Restore every Insert counter flagged for reload.
    pub fn reload(&mut self) {
        for rule in &mut self.rules {
            if let Rule::Insert(insert) = rule {
                if insert.reload {
                    insert.reset();
                }
            }
        }
    }
}
