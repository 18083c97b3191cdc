//! Filter compilation
//!
//! A filter is a file name pattern made of literal anchors and two
//! wildcards: `*` captures any run of characters (lazily) and `?` captures a
//! single character. Each `?` may be refined by an extension clause given
//! after the first `/` of the filter argument:
//!
//! ```text
//! IMAG?.JPG/4            exactly four characters
//! IMAG?.JPG/1,3          one to three characters
//! IMAG?.JPG/#459-462     any width, numerically between 459 and 462
//! my?/3,DEF-MNO          three characters, lexically between DEF and MNO
//! ```
//!
//! Width constraints become repetition counts in the compiled regex. Range
//! constraints are checked after a structural match against the captured
//! fragments ("floaters").

use regex::{Regex, RegexBuilder};

use super::error::CompileError;

/// Characters that cannot appear in the pattern part of a filter.
const ILLEGAL_FILTER_CHARS: &[char] = &['<', '>', '|', '"', ',', '\\', ';', ':', '/'];

/// Post-match range check applied to one floater.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticRule {
    NumericRange { lo: i64, hi: i64 },
    LexicalRange { lo: String, hi: String },
}

impl SemanticRule {
    /// Parse `lo-hi` or `#lo-hi`.
    fn parse(text: &str) -> Result<Self, CompileError> {
        let parts: Vec<&str> = text.split('-').collect();
        let [lo, hi] = parts.as_slice() else {
            return Err(CompileError::SemanticRule(text.to_string()));
        };

        match lo.strip_prefix('#') {
            Some(lo) => {
                let bad = || CompileError::NumericRange(text.to_string());
                Ok(Self::NumericRange {
                    lo: lo.parse().map_err(|_| bad())?,
                    hi: hi.parse().map_err(|_| bad())?,
                })
            }
            None => Ok(Self::LexicalRange {
                lo: lo.to_string(),
                hi: hi.to_string(),
            }),
        }
    }

    /// Check a floater. A floater that looks like `name.ext` is judged by
    /// the part before its first dot.
    pub fn accepts(&self, floater: &str) -> bool {
        let value = floater.split('.').next().unwrap_or(floater);
        match self {
            Self::NumericRange { lo, hi } => value
                .parse::<i64>()
                .is_ok_and(|number| *lo <= number && number <= *hi),
            Self::LexicalRange { lo, hi } => lo.as_str() <= value && value <= hi.as_str(),
        }
    }
}

/// Compiled filter: a structural matcher plus deferred range checks.
#[derive(Debug, Clone)]
pub struct FilterProgram {
    source: String,
    matcher: Regex,
    semantic: Vec<(usize, SemanticRule)>,
    floaters: usize,
    order: Vec<usize>,
    reject_hidden: bool,
}

impl FilterProgram {
    /// Compile a filter argument (pattern plus optional `/`-separated clauses).
    pub fn compile(filter: &str, case_sensitive: bool) -> Result<Self, CompileError> {
        let (pattern, clauses): (&str, Vec<&str>) = match filter.split_once('/') {
            Some((pattern, rest)) => (pattern, rest.split('/').collect()),
            None => (filter, Vec::new()),
        };

        let wildcards = pattern.matches('?').count();
        if clauses.len() > wildcards {
            return Err(CompileError::TooManyClauses {
                clauses: clauses.len(),
                wildcards,
            });
        }
        if let Some((index, ch)) = pattern
            .char_indices()
            .find(|(_, c)| ILLEGAL_FILTER_CHARS.contains(c))
        {
            return Err(CompileError::IllegalCharacter {
                ch,
                text: pattern.to_string(),
                index,
            });
        }
        if pattern.contains("**") {
            return Err(CompileError::AdjacentWildcards(pattern.to_string()));
        }
        if pattern.is_empty() {
            return Err(CompileError::EmptyFilter);
        }

        let reject_hidden = pattern.starts_with("*.");
        let (body, root_only) = if let Some(body) = pattern.strip_suffix("*.") {
            (body, true)
        } else {
            (pattern.strip_suffix('.').unwrap_or(pattern), false)
        };

        let mut regex = String::from("^");
        let mut semantic = Vec::new();
        let mut floaters = 0;
        let mut clauses = clauses.into_iter();
        for c in body.chars() {
            match c {
                '*' => {
                    regex.push_str("(.*?)");
                    floaters += 1;
                }
                '?' => {
                    let (group, rule) = match clauses.next() {
                        Some(clause) => compile_clause(clause)?,
                        None => ("(.)".to_string(), None),
                    };
                    regex.push_str(&group);
                    if let Some(rule) = rule {
                        semantic.push((floaters, rule));
                    }
                    floaters += 1;
                }
                _ => regex.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        if root_only {
            regex.push_str("([^.]*)");
            floaters += 1;
        }
        regex.push('$');

        let matcher = RegexBuilder::new(&regex)
            .case_insensitive(!case_sensitive)
            .dot_matches_new_line(true)
            .build()?;
        tracing::debug!("compiled filter {filter:?} to {regex} with {floaters} floaters");

        Ok(Self {
            source: filter.to_string(),
            matcher,
            semantic,
            floaters,
            order: (0..floaters).collect(),
            reject_hidden,
        })
    }

    /// Reorder floaters. Indices must name captured floaters; any floater
    /// not listed follows in ascending order.
    pub fn with_order(mut self, order: &[usize]) -> Result<Self, CompileError> {
        if let Some(&index) = order.iter().find(|&&index| index >= self.floaters) {
            return Err(CompileError::OrderOutOfRange {
                index,
                floaters: self.floaters,
            });
        }
        let mut full = order.to_vec();
        full.extend((0..self.floaters).filter(|index| !order.contains(index)));
        self.order = full;
        Ok(self)
    }

    /// Floaters of `name` in output order, or `None` if the name is not selected.
    pub fn floaters(&self, name: &str) -> Option<Vec<String>> {
        if self.reject_hidden && name.starts_with('.') {
            return None;
        }
        let captures = self.matcher.captures(name)?;
        let captured: Vec<&str> = (1..=self.floaters)
            .map(|group| captures.get(group).map_or("", |m| m.as_str()))
            .collect();

        if !self
            .semantic
            .iter()
            .all(|(index, rule)| rule.accepts(captured[*index]))
        {
            tracing::trace!("{name} failed a range check of {}", self.source);
            return None;
        }

        Some(self.order.iter().map(|&index| captured[index].to_string()).collect())
    }

    /// The filter argument this program was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Translate one extension clause into a capture group and optional range.
fn compile_clause(clause: &str) -> Result<(String, Option<SemanticRule>), CompileError> {
    if clause.is_empty() {
        return Ok(("(.)".to_string(), None));
    }

    let fields: Vec<&str> = clause.split(',').collect();
    let is_width = |field: &str| !field.is_empty() && field.chars().all(|c| c.is_ascii_digit());
    let width = |field: &str| -> Result<usize, CompileError> {
        field.parse().map_err(|_| CompileError::BadNumber {
            field: "? width",
            value: field.to_string(),
        })
    };

    let (group, filter_field) = if is_width(fields[0]) {
        match fields.get(1) {
            Some(&max) if is_width(max) => (
                format!("(.{{{},{}}})", width(fields[0])?, width(max)?),
                2,
            ),
            _ => match width(fields[0])? {
                0 => ("(.*?)".to_string(), 1),
                exact => (format!("(.{{{exact}}})"), 1),
            },
        }
    } else if fields[0].is_empty() {
        ("(.*?)".to_string(), 1)
    } else {
        ("(.*?)".to_string(), 0)
    };

    let rule = fields
        .get(filter_field)
        .map(|text| SemanticRule::parse(text))
        .transpose()?;
    Ok((group, rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floaters(filter: &str, name: &str) -> Option<Vec<String>> {
        FilterProgram::compile(filter, false).unwrap().floaters(name)
    }

    #[test]
    fn test_star_captures_lazily() {
        assert_eq!(
            floaters("08*-0*", "08493357-001.tif").unwrap(),
            vec!["493357", "01.tif"]
        );
        assert_eq!(
            floaters("*_*_*_*", "a_b_c_d.txt").unwrap(),
            vec!["a", "b", "c", "d.txt"]
        );
    }

    #[test]
    fn test_question_mark_is_one_character() {
        assert_eq!(floaters("hi?X*", "hi1X.txt").unwrap(), vec!["1", ".txt"]);
        assert!(floaters("hi?X*", "hi12X.txt").is_none());
    }

    #[test]
    fn test_case_sensitivity() {
        assert!(floaters("*.TIF", "a.tif").is_some());
        let strict = FilterProgram::compile("*.TIF", true).unwrap();
        assert!(strict.floaters("a.tif").is_none());
    }

    /// Regex metacharacters in anchors match literally
    #[test]
    fn test_literal_metacharacters() {
        assert!(floaters("a+(*)", "a+(x)").is_some());
        assert!(floaters("a+(*)", "aa(x)").is_none());
    }

    /// `*.` prefix rejects hidden files, `*.` suffix forbids a trailing extension
    #[test]
    fn test_dot_conveniences() {
        assert!(floaters("*.cfg", ".cfg").is_none());
        assert!(floaters("*.cfg", "cat.cfg").is_some());
        assert_eq!(floaters(".*.", ".bashx").unwrap(), vec!["bashx"]);
        assert!(floaters(".*.", ".bashx.txt").is_none());
        assert_eq!(floaters("abc.", "abc").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_width_clauses() {
        assert!(floaters("IMAG?.JPG/4", "IMAG0459.JPG").is_some());
        assert!(floaters("IMAG?.JPG/4", "IMAG459.JPG").is_none());
        assert!(floaters("IMAG?.JPG/0", "IMAG12345.JPG").is_some());
        assert!(floaters("?A?B?//2/1,3", "xAyyB12").is_some());
        assert!(floaters("?A?B?//2/1,3", "xAyB12").is_none());
        assert!(floaters("?A?B?//2/1,3", "xAyyB1234").is_none());
    }

    #[test]
    fn test_numeric_range() {
        let filter = "tree?.jpg/#459-462";
        assert!(floaters(filter, "tree461.jpg").is_some());
        assert!(floaters(filter, "tree0459.jpg").is_some());
        assert!(floaters(filter, "tree463.jpg").is_none());
        assert!(floaters(filter, "treeabc.jpg").is_none());
    }

    /// Lexical ranges compare strings, so width matters
    #[test]
    fn test_lexical_range() {
        let filter = "tree?.jpg/459-462";
        assert!(floaters(filter, "tree461.jpg").is_some());
        assert!(floaters(filter, "tree0459.jpg").is_none());
        assert!(floaters("my?/3,DEF-MNO", "myGHI").is_some());
        assert!(floaters("my?/3,DEF-MNO", "myABC").is_none());
        assert!(floaters("hi?X*/2,3,B-D", "hiBBX.txt").is_some());
        assert!(floaters("hi?X*/2,3,B-D", "hiEEX.txt").is_none());
    }

    /// Ranges judge the part of a floater before its first dot
    #[test]
    fn test_range_uses_floater_root() {
        assert!(floaters("?x/#7-80", "12.jpgx").is_some());
        assert!(floaters("?x/#7-80", "6.jpgx").is_none());
    }

    #[test]
    fn test_compile_errors() {
        assert!(matches!(
            FilterProgram::compile("a**b", false),
            Err(CompileError::AdjacentWildcards(_))
        ));
        assert!(matches!(
            FilterProgram::compile("a?/1/2", false),
            Err(CompileError::TooManyClauses { clauses: 2, wildcards: 1 })
        ));
        assert!(matches!(
            FilterProgram::compile("a?/B", false),
            Err(CompileError::SemanticRule(_))
        ));
        assert!(matches!(
            FilterProgram::compile("a?/#B-C", false),
            Err(CompileError::NumericRange(_))
        ));
        assert!(matches!(
            FilterProgram::compile("a|b", false),
            Err(CompileError::IllegalCharacter { ch: '|', index: 1, .. })
        ));
        assert!(matches!(
            FilterProgram::compile("", false),
            Err(CompileError::EmptyFilter)
        ));
    }

    #[test]
    fn test_order_permutation() {
        let program = FilterProgram::compile("*-*.*", false)
            .unwrap()
            .with_order(&[2, 1])
            .unwrap();
        assert_eq!(program.floaters("08493357-001.tif").unwrap(), vec!["tif", "001", "08493357"]);
    }

    #[test]
    fn test_order_out_of_range() {
        let result = FilterProgram::compile("*-*", false).unwrap().with_order(&[1, 2]);
        assert!(matches!(
            result,
            Err(CompileError::OrderOutOfRange { index: 2, floaters: 2 })
        ));
    }
}
