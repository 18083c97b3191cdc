//! Collision avoidance
//!
//! When a proposed name is already taken, a bounded search derives
//! alternatives from it. The scheme is written compactly on the command
//! line, e.g. `M,{$}` or `/xxx0/` or `,,~`:
//!
//! - `S` stops the whole run on a collision with an existing entry
//! - `C` skips the file and continues
//! - `M` merges: the root's own tail is incremented instead of appending
//! - a digit run, a single letter or `/string/` is the appended start token
//! - a punctuation run decorates the root; leading commas choose where
//!   (none = after the root, `,` = before it, `,,` = after the counter)

use super::error::CompileError;
use super::extension::split_extension;
use super::increment::{next_name, next_name_from};

/// Alternatives tried after the proposed name before giving up.
pub const SEARCH_CEILING: usize = 10;

const DECORATION_CHARS: &str = "`~!@#$%^&()_+[]{}-";

/// What to do when the proposed name belongs to an existing entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    #[default]
    Search,
    Stop,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationPosition {
    Prefix,
    Mid,
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub text: String,
    pub position: DecorationPosition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionScheme {
    pub policy: CollisionPolicy,
    pub merge: bool,
    pub start: String,
    pub decoration: Option<Decoration>,
}

impl Default for CollisionScheme {
    fn default() -> Self {
        Self {
            policy: CollisionPolicy::Search,
            merge: false,
            start: "0".to_string(),
            decoration: None,
        }
    }
}

/// Outcome of a search: the free name, if one was found, and the trail of
/// names that were tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avoidance {
    pub name: Option<String>,
    pub trace: String,
}

impl CollisionScheme {
    pub fn parse(spec: &str) -> Result<Self, CompileError> {
        let mut scheme = Self::default();
        let mut commas = 0;
        let mut chars = spec.chars().peekable();

        while let Some(c) = chars.next() {
            // Only the commas directly in front of the decoration place it.
            let run = commas;
            if c != ',' {
                commas = 0;
            }
            match c {
                'S' => scheme.policy = CollisionPolicy::Stop,
                'C' => scheme.policy = CollisionPolicy::Continue,
                'M' => scheme.merge = true,
                '/' => {
                    let mut start = String::new();
                    for c in chars.by_ref() {
                        if c == '/' {
                            break;
                        }
                        start.push(c);
                    }
                    scheme.start = start;
                }
                '0'..='9' => {
                    let mut start = c.to_string();
                    while let Some(&c) = chars.peek().filter(|c| c.is_ascii_digit()) {
                        start.push(c);
                        chars.next();
                    }
                    scheme.start = start;
                }
                ',' if scheme.decoration.is_none() => commas += 1,
                c if DECORATION_CHARS.contains(c) && scheme.decoration.is_none() => {
                    let mut text = c.to_string();
                    while let Some(&c) = chars.peek().filter(|c| DECORATION_CHARS.contains(**c)) {
                        text.push(c);
                        chars.next();
                    }
                    let position = match run {
                        0 => DecorationPosition::Mid,
                        1 => DecorationPosition::Prefix,
                        _ => DecorationPosition::Suffix,
                    };
                    scheme.decoration = Some(Decoration { text, position });
                }
                c if c.is_alphabetic() => scheme.start = c.to_string(),
                _ => {}
            }
        }

        if scheme.merge {
            if let Some(decoration) = &mut scheme.decoration {
                if decoration.position == DecorationPosition::Mid {
                    decoration.position = DecorationPosition::Suffix;
                }
            }
        }
        if scheme.start.is_empty() {
            return Err(CompileError::BadNumber {
                field: "collision start",
                value: spec.to_string(),
            });
        }
        Ok(scheme)
    }

    /// Search for a free alternative to `name`. `taken` answers whether a
    /// candidate is already used on disk or in the current batch.
    pub fn avoid(&self, name: &str, taken: impl Fn(&str) -> bool) -> Avoidance {
        let (root, extension) = split_extension(name);
        let mut trace = format!("Name collision: {name}");

        let (mut root, suffix) = match &self.decoration {
            Some(Decoration {
                text,
                position: DecorationPosition::Prefix,
            }) => (format!("{text}{root}"), ""),
            Some(Decoration {
                text,
                position: DecorationPosition::Mid,
            }) => (format!("{root}{text}"), ""),
            Some(Decoration {
                text,
                position: DecorationPosition::Suffix,
            }) => (root.to_string(), text.as_str()),
            None => (root.to_string(), ""),
        };
        let mut counter_start = root.len();

        for attempt in 0..=SEARCH_CEILING {
            let candidate = format!("{root}{suffix}{extension}");
            if !taken(&candidate) {
                return Avoidance {
                    name: Some(candidate),
                    trace,
                };
            }
            if attempt == SEARCH_CEILING {
                break;
            }

            root = if self.merge {
                next_name(&root, 1)
            } else if attempt == 0 {
                counter_start = root.len();
                format!("{root}{}", self.start)
            } else {
                next_name_from(&root, 1, counter_start)
            };
            trace.push('>');
            trace.push_str(&root);
            trace.push_str(suffix);
        }

        tracing::debug!("{trace}");
        Avoidance { name: None, trace }
    }
}
