//! Tokenizer for semantic path expressions such as
//! `Observation.performer.where(display='Doctor B').display`.

use crate::error::NavigationFailure;
use crate::predicate::{PredicateExpression, is_identifier, parse_predicate};
use std::fmt;

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Leading resource type (`Observation`, `Bundle`).
    ResourceScope(String),
    Field(String),
    IndexedField {
        name: String,
        index: usize,
    },
    PredicateField {
        name: String,
        predicate: PredicateExpression,
    },
}

impl PathSegment {
    pub fn name(&self) -> &str {
        match self {
            Self::ResourceScope(name) | Self::Field(name) => name,
            Self::IndexedField { name, .. } | Self::PredicateField { name, .. } => name,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceScope(name) | Self::Field(name) => f.write_str(name),
            Self::IndexedField { name, index } => write!(f, "{name}[{index}]"),
            Self::PredicateField { name, predicate } => write!(f, "{name}.where({predicate})"),
        }
    }
}

/// Parsed path: an optional leading [`PathSegment::ResourceScope`] followed by
/// field steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    segments: Vec<PathSegment>,
}

impl PathExpression {
    pub fn parse(path: &str) -> Result<Self, NavigationFailure> {
        let invalid = |reason: &str| NavigationFailure::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let raw = split_top_level(path.trim()).ok_or_else(|| invalid("unbalanced brackets"))?;
        if raw.iter().all(|t| t.is_empty()) {
            return Err(invalid("empty path"));
        }

        let mut segments: Vec<PathSegment> = Vec::with_capacity(raw.len());
        for (position, token) in raw.iter().enumerate() {
            if token.is_empty() {
                return Err(invalid("empty segment"));
            }

            if let Some(body) = token
                .strip_prefix("where(")
                .and_then(|rest| rest.strip_suffix(')'))
            {
                let predicate =
                    parse_predicate(body).ok_or_else(|| NavigationFailure::InvalidPredicate {
                        predicate: body.to_string(),
                    })?;
                let name = match segments.pop() {
                    Some(PathSegment::Field(name)) => name,
                    _ => return Err(invalid("where() must follow a plain field")),
                };
                segments.push(PathSegment::PredicateField { name, predicate });
                continue;
            }

            if position == 0 && is_resource_type(token) {
                segments.push(PathSegment::ResourceScope(token.to_string()));
                continue;
            }

            if let Some((name, index)) = token.strip_suffix(']').and_then(|t| t.split_once('[')) {
                let index = index
                    .parse::<usize>()
                    .map_err(|_| invalid("array index must be a non-negative integer"))?;
                if !is_field_name(name) {
                    return Err(invalid("invalid field name"));
                }
                segments.push(PathSegment::IndexedField {
                    name: name.to_string(),
                    index,
                });
                continue;
            }

            if !is_field_name(token) {
                return Err(invalid("unsupported segment"));
            }
            segments.push(PathSegment::Field(token.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The leading resource type, if the path is resource-relative.
    pub fn resource_scope(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::ResourceScope(name)) => Some(name),
            _ => None,
        }
    }

    /// Segments after the resource scope.
    pub fn steps(&self) -> &[PathSegment] {
        match self.segments.first() {
            Some(PathSegment::ResourceScope(_)) => &self.segments[1..],
            _ => &self.segments,
        }
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// FHIR resource and type names start upper-case; element names never do.
fn is_resource_type(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_uppercase()) && is_identifier(token)
}

/// Any JSON key free of path syntax and whitespace.
fn is_field_name(token: &str) -> bool {
    !token.is_empty()
        && !token
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '.' | '[' | ']' | '(' | ')' | '\''))
}

/// Split on `.` outside of `[...]`, `(...)` and quoted literals.
fn split_top_level(path: &str) -> Option<Vec<&str>> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut in_literal = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in path.char_indices() {
        if in_literal {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '\'' => in_literal = false,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' if depth > 0 => in_literal = true,
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.checked_sub(1)?,
            '.' if depth == 0 => {
                tokens.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 || in_literal {
        return None;
    }
    tokens.push(&path[start..]);
    Some(tokens)
}
