//! `where(...)` predicates: expression tree, parser and evaluator.
//!
//! The grammar is intentionally small:
//!
//! ```text
//! expr    := primary (("and" | "or") primary)*        left-associative
//! primary := path "=" 'literal'
//!          | path ".exists()"
//!          | path ".empty()"
//! path    := ident ("." ident)*
//! ```
//!
//! Keywords are case-insensitive. Parentheses, nested `where(...)` and any
//! other FHIRPath function are rejected rather than partially parsed, as is
//! any chain longer than [`MAX_PREDICATE_TERMS`] primaries.

mod evaluator;
mod parser;

pub use evaluator::{FieldLookup, evaluate};
pub use parser::{MAX_PREDICATE_TERMS, parse_predicate};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dotted field path relative to the element a predicate is tested against.
///
/// Holds plain property names only; indices and predicates are not part of
/// the predicate grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Build a path from already-validated segments.
    ///
    /// Returns `None` for an empty list or when any segment is not a plain
    /// identifier.
    pub fn new<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || !segments.iter().all(|s| is_identifier(s)) {
            return None;
        }
        Some(Self { segments })
    }

    /// Parse `a.b.c`.
    pub fn parse(dotted: &str) -> Option<Self> {
        Self::new(dotted.split('.'))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Parsed `where(...)` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PredicateExpression {
    Equals { path: FieldPath, literal: String },
    Exists { path: FieldPath },
    Empty { path: FieldPath },
    And {
        left: Box<PredicateExpression>,
        right: Box<PredicateExpression>,
    },
    Or {
        left: Box<PredicateExpression>,
        right: Box<PredicateExpression>,
    },
}

impl PredicateExpression {
    pub fn equals(path: FieldPath, literal: impl Into<String>) -> Self {
        Self::Equals {
            path,
            literal: literal.into(),
        }
    }

    pub fn exists(path: FieldPath) -> Self {
        Self::Exists { path }
    }

    pub fn empty(path: FieldPath) -> Self {
        Self::Empty { path }
    }

    pub fn and(left: PredicateExpression, right: PredicateExpression) -> Self {
        Self::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: PredicateExpression, right: PredicateExpression) -> Self {
        Self::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Renders the canonical grammar form.
///
/// Output re-parses to the same tree for anything the parser produced. Trees
/// built by hand with a compound right operand have no paren-free spelling
/// and render flattened.
impl fmt::Display for PredicateExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { path, literal } => {
                write!(f, "{path}='")?;
                for c in literal.chars() {
                    if c == '\'' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("'")
            }
            Self::Exists { path } => write!(f, "{path}.exists()"),
            Self::Empty { path } => write!(f, "{path}.empty()"),
            Self::And { left, right } => write!(f, "{left} and {right}"),
            Self::Or { left, right } => write!(f, "{left} or {right}"),
        }
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_identifier_char)
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_rejects_non_identifiers() {
        assert!(FieldPath::parse("name.given").is_some());
        assert!(FieldPath::parse("").is_none());
        assert!(FieldPath::parse("name..given").is_none());
        assert!(FieldPath::parse("name[0]").is_none());
        assert!(FieldPath::parse("where(x)").is_none());
    }

    #[test]
    fn test_display_escapes_literal() {
        let expr = PredicateExpression::equals(FieldPath::parse("display").unwrap(), "O'Brien");
        assert_eq!(expr.to_string(), r"display='O\'Brien'");
    }

    #[test]
    fn test_display_compound() {
        let expr = PredicateExpression::or(
            PredicateExpression::exists(FieldPath::parse("system").unwrap()),
            PredicateExpression::empty(FieldPath::parse("code").unwrap()),
        );
        assert_eq!(expr.to_string(), "system.exists() or code.empty()");
    }
}
