//! Name transforms: the positional pattern language plus the regex and
//! substitution modes that share its batch handling.

use regex::{Regex, RegexBuilder};

use super::error::CompileError;
use super::filter::FilterProgram;
use super::replace::{ReplacementProgram, Synthesis};
use super::rules::RuleSet;
use crate::shared::params::param_list;

/// Settings that shape how a filter matches.
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    pub case_sensitive: bool,
    pub order: Option<Vec<usize>>,
}

/// Filter, replacement and rules compiled together.
#[derive(Debug, Clone)]
pub struct NativeProgram {
    filter: FilterProgram,
    replacement: ReplacementProgram,
    rules: RuleSet,
}

impl NativeProgram {
    pub fn compile<S: AsRef<str>>(
        filter: &str,
        replacement: &str,
        rules: &[S],
        options: &MatchOptions,
    ) -> Result<Self, CompileError> {
        let mut filter = FilterProgram::compile(filter, options.case_sensitive)?;
        if let Some(order) = &options.order {
            filter = filter.with_order(order)?;
        }
        let replacement = ReplacementProgram::parse(replacement)?;
        let rules = RuleSet::compile(rules, &replacement.rule_variables(), replacement.source())?;
        Ok(Self {
            filter,
            replacement,
            rules,
        })
    }

    /// Synthesize a new name, or `None` when the filter rejects `name`.
    pub fn rename(&mut self, name: &str) -> Option<Synthesis> {
        let floaters = self.filter.floaters(name)?;
        tracing::trace!("{name} floaters {floaters:?}");
        Some(self.replacement.synthesize(&floaters, &mut self.rules))
    }
}

/// Regular-expression renaming: the pattern must match at the start of the
/// name and every match is replaced by the template.
#[derive(Debug, Clone)]
pub struct RegexProgram {
    pattern: Regex,
    template: String,
}

impl RegexProgram {
    pub fn compile(
        pattern: &str,
        template: &str,
        case_sensitive: bool,
    ) -> Result<Self, CompileError> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()?;
        Ok(Self {
            pattern,
            template: convert_template(template),
        })
    }

    pub fn rename(&self, name: &str) -> Option<Synthesis> {
        let found = self.pattern.find(name)?;
        if found.start() != 0 {
            return None;
        }
        Some(Synthesis {
            name: self
                .pattern
                .replace_all(name, self.template.as_str())
                .into_owned(),
            warnings: Vec::new(),
        })
    }
}

/// Rewrite `\1` and `\g<name>` group references into `${1}` / `${name}`,
/// escaping any literal `$`.
fn convert_template(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' => match chars.peek().copied() {
                Some(d) if d.is_ascii_digit() => {
                    let mut group = String::new();
                    while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                        group.push(d);
                        chars.next();
                    }
                    out.push_str(&format!("${{{group}}}"));
                }
                Some('g') => {
                    chars.next();
                    if chars.peek() == Some(&'<') {
                        chars.next();
                        let group: String = chars.by_ref().take_while(|&c| c != '>').collect();
                        out.push_str(&format!("${{{group}}}"));
                    } else {
                        out.push_str("\\g");
                    }
                }
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                _ => out.push('\\'),
            },
            _ => out.push(c),
        }
    }
    out
}

/// One step of substitution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstituteOp {
    Upper,
    Lower,
    Replace(char, char),
    Delete(char),
}

impl SubstituteOp {
    /// Parse a `/`-separated op list such as `L/_-` or `U/aa`.
    pub fn parse_list(spec: &str) -> Result<Vec<Self>, CompileError> {
        param_list(spec)
            .into_iter()
            .map(|op| {
                let chars: Vec<char> = op.chars().collect();
                match chars.as_slice() {
                    ['U' | 'u'] => Ok(Self::Upper),
                    ['L' | 'l'] => Ok(Self::Lower),
                    [from, to] if from == to => Ok(Self::Delete(*from)),
                    [from, to] => Ok(Self::Replace(*from, *to)),
                    _ => Err(CompileError::Substitution(op.to_string())),
                }
            })
            .collect()
    }

    fn apply(self, name: &str) -> String {
        match self {
            Self::Upper => name.to_uppercase(),
            Self::Lower => name.to_lowercase(),
            Self::Replace(from, to) => name.replace(from, to.encode_utf8(&mut [0; 4])),
            Self::Delete(c) => name.replace(c, ""),
        }
    }
}

/// The transform a batch runs every candidate through.
#[derive(Debug, Clone)]
pub enum NameTransform {
    Native(NativeProgram),
    Regex(RegexProgram),
    Substitute(Vec<SubstituteOp>),
}

impl NameTransform {
    /// New name for `name`, or `None` when the candidate is not selected.
    pub fn apply(&mut self, name: &str) -> Option<Synthesis> {
        match self {
            Self::Native(program) => program.rename(name),
            Self::Regex(program) => program.rename(name),
            Self::Substitute(ops) => Some(Synthesis {
                name: ops.iter().fold(name.to_string(), |acc, op| op.apply(&acc)),
                warnings: Vec::new(),
            }),
        }
    }

    /// Signal a directory boundary to stateful rules.
    pub fn reload(&mut self) {
        if let Self::Native(program) = self {
            program.rules.reload();
        }
    }
}
