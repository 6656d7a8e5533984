//!
//! # Label selectors
//!
//! Supported grammar, terms joined by `,` are ANDed:
//!     key=value | key==value | key!=value
//!     key in (v1,v2) | key notin (v1,v2)
//!     key | !key
//!

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::validation::names::{is_qualified_name, is_valid_label_value};

pub use crate::set::Set;
use crate::set::split_terms;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorParseError {
    #[error("empty key in term {0:?}")]
    EmptyKey(String),
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },
    #[error("invalid value {value:?}: {reason}")]
    InvalidValue { value: String, reason: String },
    #[error("set operator in {0:?} requires at least one value")]
    MissingValues(String),
    #[error("unable to parse term {0:?}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    DoubleEquals,
    NotEquals,
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    key: String,
    operator: Operator,
    values: BTreeSet<String>,
}

impl Requirement {
    pub fn new<I, V>(key: &str, operator: Operator, values: I) -> Result<Self, SelectorParseError>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        if key.is_empty() {
            return Err(SelectorParseError::EmptyKey(key.to_owned()));
        }
        if let Some(reason) = is_qualified_name(key).into_iter().next() {
            return Err(SelectorParseError::InvalidKey {
                key: key.to_owned(),
                reason,
            });
        }

        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        match operator {
            Operator::Exists | Operator::DoesNotExist if !values.is_empty() => {
                return Err(SelectorParseError::Malformed(key.to_owned()));
            }
            Operator::In | Operator::NotIn if values.is_empty() => {
                return Err(SelectorParseError::MissingValues(key.to_owned()));
            }
            Operator::Equals | Operator::DoubleEquals | Operator::NotEquals
                if values.len() != 1 =>
            {
                return Err(SelectorParseError::Malformed(key.to_owned()));
            }
            _ => {}
        }
        for value in &values {
            if let Some(reason) = is_valid_label_value(value).into_iter().next() {
                return Err(SelectorParseError::InvalidValue {
                    value: value.to_owned(),
                    reason,
                });
            }
        }

        Ok(Self {
            key: key.to_owned(),
            operator,
            values,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn matches(&self, labels: &Set) -> bool {
        match self.operator {
            Operator::Equals | Operator::DoubleEquals | Operator::In => labels
                .get(&self.key)
                .is_some_and(|value| self.values.contains(value)),
            Operator::NotEquals | Operator::NotIn => labels
                .get(&self.key)
                .is_none_or(|value| !self.values.contains(value)),
            Operator::Exists => labels.has(&self.key),
            Operator::DoesNotExist => !labels.has(&self.key),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<&str> = self.values.iter().map(String::as_str).collect();
        match self.operator {
            Operator::Equals => write!(f, "{}={}", self.key, values.join("")),
            Operator::DoubleEquals => write!(f, "{}=={}", self.key, values.join("")),
            Operator::NotEquals => write!(f, "{}!={}", self.key, values.join("")),
            Operator::In => write!(f, "{} in ({})", self.key, values.join(",")),
            Operator::NotIn => write!(f, "{} notin ({})", self.key, values.join(",")),
            Operator::Exists => write!(f, "{}", self.key),
            Operator::DoesNotExist => write!(f, "!{}", self.key),
        }
    }
}

/// Conjunction of label requirements. An empty selector matches everything.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    pub fn everything() -> Self {
        Self::default()
    }

    /// selector requiring every pair of `set`
    pub fn from_set(set: &Set) -> Result<Self, SelectorParseError> {
        let requirements = set
            .iter()
            .map(|(key, value)| Requirement::new(key, Operator::Equals, [value.as_str()]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { requirements })
    }

    pub fn add(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn matches(&self, labels: &Set) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl FromStr for Selector {
    type Err = SelectorParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().is_empty() {
            return Ok(Self::everything());
        }
        let requirements = split_terms(input)
            .into_iter()
            .map(parse_requirement)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { requirements })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self.requirements.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", terms.join(","))
    }
}

fn parse_requirement(term: &str) -> Result<Requirement, SelectorParseError> {
    let term = term.trim();
    if term.is_empty() {
        return Err(SelectorParseError::EmptyKey(term.to_owned()));
    }

    if let Some(key) = term.strip_prefix('!') {
        return Requirement::new(key.trim(), Operator::DoesNotExist, Vec::<String>::new());
    }

    if let Some(open) = term.find('(') {
        let Some(inner) = term[open + 1..].strip_suffix(')') else {
            return Err(SelectorParseError::Malformed(term.to_owned()));
        };
        let head = term[..open].trim_end();
        let (key, operator) = if let Some(key) = head.strip_suffix("notin") {
            (key, Operator::NotIn)
        } else if let Some(key) = head.strip_suffix("in") {
            (key, Operator::In)
        } else {
            return Err(SelectorParseError::Malformed(term.to_owned()));
        };
        // operator must be a separate word
        if !key.ends_with(char::is_whitespace) {
            return Err(SelectorParseError::Malformed(term.to_owned()));
        }
        let values: Vec<&str> = if inner.trim().is_empty() {
            vec![]
        } else {
            inner.split(',').map(str::trim).collect()
        };
        return Requirement::new(key.trim(), operator, values);
    }

    for (token, operator) in [
        ("!=", Operator::NotEquals),
        ("==", Operator::DoubleEquals),
        ("=", Operator::Equals),
    ] {
        if let Some((key, value)) = term.split_once(token) {
            return Requirement::new(key.trim(), operator, [value.trim()]);
        }
    }

    Requirement::new(term, Operator::Exists, Vec::<String>::new())
}

#[cfg(test)]
mod test {

    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> Set {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_equality_selector() {
        let selector: Selector = "app=foo".parse().expect("parse");
        assert!(selector.matches(&labels(&[("app", "foo")])));
        assert!(!selector.matches(&labels(&[("app", "bar")])));
        assert!(!selector.matches(&labels(&[])));

        let selector: Selector = "app==foo,tier!=db".parse().expect("parse");
        assert!(selector.matches(&labels(&[("app", "foo"), ("tier", "web")])));
        assert!(selector.matches(&labels(&[("app", "foo")])));
        assert!(!selector.matches(&labels(&[("app", "foo"), ("tier", "db")])));
    }

    #[test]
    fn test_set_selector() {
        let selector: Selector = "env in (prod, qa),team notin (x)".parse().expect("parse");
        assert!(selector.matches(&labels(&[("env", "qa"), ("team", "y")])));
        assert!(!selector.matches(&labels(&[("env", "dev")])));
        assert!(!selector.matches(&labels(&[("env", "prod"), ("team", "x")])));
        assert_eq!(selector.to_string(), "env in (prod,qa),team notin (x)");
    }

    #[test]
    fn test_existence_selector() {
        let selector: Selector = "app,!legacy".parse().expect("parse");
        assert!(selector.matches(&labels(&[("app", "")])));
        assert!(!selector.matches(&labels(&[("app", "a"), ("legacy", "true")])));
        assert!(!selector.matches(&labels(&[])));
    }

    #[test]
    fn test_everything() {
        let selector: Selector = "  ".parse().expect("parse");
        assert!(selector.is_empty());
        assert!(selector.matches(&labels(&[("any", "thing")])));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "=foo".parse::<Selector>(),
            Err(SelectorParseError::EmptyKey(_))
        ));
        assert!(matches!(
            "env in ()".parse::<Selector>(),
            Err(SelectorParseError::MissingValues(_))
        ));
        assert!(matches!(
            "env in (a".parse::<Selector>(),
            Err(SelectorParseError::Malformed(_))
        ));
        assert!(matches!(
            "envin (a)".parse::<Selector>(),
            Err(SelectorParseError::Malformed(_))
        ));
        assert!(matches!(
            "app=in valid".parse::<Selector>(),
            Err(SelectorParseError::InvalidValue { .. })
        ));
        assert!(matches!(
            "bad key=1".parse::<Selector>(),
            Err(SelectorParseError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_from_set() {
        let set = labels(&[("app", "foo"), ("tier", "db")]);
        let selector = Selector::from_set(&set).expect("valid");
        assert!(selector.matches(&set));
        assert!(!selector.matches(&labels(&[("app", "foo")])));
    }
}
