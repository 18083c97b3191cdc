//! Replacement parsing and name synthesis
//!
//! A replacement is literal text interleaved with single-character
//! variables:
//!
//! | variable | consumes a floater | emits                               |
//! |----------|--------------------|-------------------------------------|
//! | `*`      | yes                | the floater                         |
//! | `/`      | yes                | nothing                             |
//! | `?`      | yes                | the floater transformed by S or B   |
//! | `:`      | no                 | the next value of an I counter      |
//!
//! The last consuming variable swallows every floater left at that point,
//! so `*` at the end of a replacement means "everything else".

use super::error::CompileError;
use super::extension::split_extension;
use super::rules::{Rule, RuleSet};

/// Characters that cannot appear in a replacement.
const ILLEGAL_REPLACEMENT_CHARS: &[char] = &['<', '>', '|', '"', ',', '\\', ';'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    Copy,
    Discard,
    RuleConsume,
    Insert,
}

impl Variable {
    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '*' => Some(Self::Copy),
            '/' => Some(Self::Discard),
            '?' => Some(Self::RuleConsume),
            ':' => Some(Self::Insert),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Copy => '*',
            Self::Discard => '/',
            Self::RuleConsume => '?',
            Self::Insert => ':',
        }
    }

    fn consumes(self) -> bool {
        !matches!(self, Self::Insert)
    }

    fn takes_rule(self) -> bool {
        matches!(self, Self::RuleConsume | Self::Insert)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Variable(Variable),
}

/// A synthesized name and the warnings raised while building it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Synthesis {
    pub name: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementProgram {
    source: String,
    tokens: Vec<Token>,
    last_consumer: Option<usize>,
}

impl ReplacementProgram {
    pub fn parse(replacement: &str) -> Result<Self, CompileError> {
        if let Some((index, ch)) = replacement
            .char_indices()
            .find(|(_, c)| ILLEGAL_REPLACEMENT_CHARS.contains(c))
        {
            return Err(CompileError::IllegalCharacter {
                ch,
                text: replacement.to_string(),
                index,
            });
        }

        let mut tokens = Vec::new();
        let mut literal = String::new();
        for c in replacement.chars() {
            match Variable::from_symbol(c) {
                Some(variable) => {
                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    tokens.push(Token::Variable(variable));
                }
                None => literal.push(c),
            }
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        let last_consumer = tokens
            .iter()
            .rposition(|token| matches!(token, Token::Variable(v) if v.consumes()));

        Ok(Self {
            source: replacement.to_string(),
            tokens,
            last_consumer,
        })
    }

    /// Rule-driven variables in order of occurrence; rules pair with these.
    pub fn rule_variables(&self) -> Vec<Variable> {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                Token::Variable(v) if v.takes_rule() => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Build a new name from `floaters`, advancing stateful rules.
    pub fn synthesize(&self, floaters: &[String], rules: &mut RuleSet) -> Synthesis {
        let mut out = Synthesis::default();
        let mut cursor = 0;
        let mut rule_index = 0;

        for (position, token) in self.tokens.iter().enumerate() {
            let variable = match token {
                Token::Literal(text) => {
                    out.name.push_str(text);
                    continue;
                }
                Token::Variable(variable) => *variable,
            };
            let rule = if variable.takes_rule() {
                rule_index += 1;
                rules.get_mut(rule_index - 1)
            } else {
                None
            };

            if variable == Variable::Insert {
                if let Some(Rule::Insert(insert)) = rule {
                    let value = insert.take();
                    if insert.exact {
                        out.name.push_str(&value);
                    } else {
                        let (root, extension) = split_extension(&out.name);
                        out.name = format!("{root}{value}{extension}");
                    }
                }
                continue;
            }

            if cursor >= floaters.len() {
                continue;
            }
            let source = if Some(position) == self.last_consumer {
                floaters[cursor..].concat()
            } else {
                floaters[cursor].clone()
            };
            cursor += 1;

            match (variable, rule) {
                (Variable::Copy, _) => out.name.push_str(&source),
                (Variable::RuleConsume, Some(rule)) if !source.is_empty() => match rule {
                    Rule::Slice(slice) => {
                        let (text, warning) = slice.apply(&source);
                        out.name.push_str(&text);
                        out.warnings.extend(warning);
                    }
                    Rule::Bump(bump) => out.name.push_str(&bump.apply(&source)),
                    Rule::Insert(_) => {}
                },
                _ => {}
            }
        }

        out
    }
}
