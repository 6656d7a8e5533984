//!
//! # Field selectors
//!
//! Terms `field=value`, `field==value` and `field!=value`, joined by `,`.
//! A missing field compares as the empty string.
//!

use std::fmt;
use std::str::FromStr;

pub use crate::set::Set;
use crate::set::split_terms;
use crate::labels::SelectorParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Term {
    Equals { field: String, value: String },
    NotEquals { field: String, value: String },
}

impl Term {
    fn matches(&self, fields: &Set) -> bool {
        match self {
            Self::Equals { field, value } => fields.get_or_empty(field) == value,
            Self::NotEquals { field, value } => fields.get_or_empty(field) != value,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { field, value } => write!(f, "{field}={value}"),
            Self::NotEquals { field, value } => write!(f, "{field}!={value}"),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selector {
    terms: Vec<Term>,
}

impl Selector {
    pub fn everything() -> Self {
        Self::default()
    }

    pub fn one_term_equal(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            terms: vec![Term::Equals {
                field: field.into(),
                value: value.into(),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, fields: &Set) -> bool {
        self.terms.iter().all(|term| term.matches(fields))
    }

    /// value required for `field`, if any term pins it
    pub fn required_value(&self, field: &str) -> Option<&str> {
        self.terms.iter().find_map(|term| match term {
            Term::Equals { field: f, value } if f == field => Some(value.as_str()),
            _ => None,
        })
    }
}

impl FromStr for Selector {
    type Err = SelectorParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().is_empty() {
            return Ok(Self::everything());
        }
        let mut terms = vec![];
        for raw in split_terms(input) {
            let raw = raw.trim();
            let (field, value, negated) = if let Some((field, value)) = raw.split_once("!=") {
                (field, value, true)
            } else if let Some((field, value)) = raw.split_once("==") {
                (field, value, false)
            } else if let Some((field, value)) = raw.split_once('=') {
                (field, value, false)
            } else {
                return Err(SelectorParseError::Malformed(raw.to_owned()));
            };
            let field = field.trim();
            if field.is_empty() {
                return Err(SelectorParseError::EmptyKey(raw.to_owned()));
            }
            let field = field.to_owned();
            let value = value.trim().to_owned();
            terms.push(if negated {
                Term::NotEquals { field, value }
            } else {
                Term::Equals { field, value }
            });
        }
        Ok(Self { terms })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self.terms.iter().map(|t| t.to_string()).collect();
        write!(f, "{}", terms.join(","))
    }
}
