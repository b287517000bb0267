use crate::error::Result;
use crate::navigation::{ResolvedLocation, SmartPathNavigator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Information,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Information => write!(f, "information"),
        }
    }
}

/// A rule engine's report, before it has a document location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolation {
    pub rule_id: String,
    #[serde(default)]
    pub severity: Severity,
    pub message: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl RuleViolation {
    pub fn new(
        rule_id: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity: Severity::Error,
            message: message.into(),
            path: path.into(),
            entry_index: None,
            resource_type: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_entry_index(mut self, entry_index: usize) -> Self {
        self.entry_index = Some(entry_index);
        self
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }
}

/// A violation together with where it sits in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatedIssue {
    #[serde(flatten)]
    pub violation: RuleViolation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ResolvedLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved_reason: Option<String>,
}

impl LocatedIssue {
    pub fn is_located(&self) -> bool {
        self.location.is_some()
    }

    pub fn pointer(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.pointer.as_str())
    }
}

pub struct IssueLocator {
    navigator: SmartPathNavigator,
}

impl IssueLocator {
    pub fn new(navigator: SmartPathNavigator) -> Self {
        Self { navigator }
    }

    pub fn navigator(&self) -> &SmartPathNavigator {
        &self.navigator
    }

    pub fn locate_one(&self, root: &Value, violation: &RuleViolation) -> LocatedIssue {
        let result = self.navigator.try_resolve(
            root,
            &violation.path,
            violation.entry_index,
            violation.resource_type.as_deref(),
        );

        let (location, unresolved_reason) = match result {
            Ok(location) => (Some(location), None),
            Err(failure) => (None, Some(failure.to_string())),
        };

        LocatedIssue {
            violation: violation.clone(),
            location,
            unresolved_reason,
        }
    }

    /// Locate every violation. Each one is resolved independently; an
    /// unresolvable path only affects its own issue.
    pub fn locate(&self, root: &Value, violations: &[RuleViolation]) -> Vec<LocatedIssue> {
        let issues: Vec<LocatedIssue> = violations
            .iter()
            .map(|violation| self.locate_one(root, violation))
            .collect();

        let located = issues.iter().filter(|issue| issue.is_located()).count();
        tracing::info!(
            total = issues.len(),
            located,
            unresolved = issues.len() - located,
            "located rule violations"
        );

        issues
    }

    /// Parse a JSON array of violations and locate them.
    pub fn locate_json(&self, root: &Value, violations_json: &str) -> Result<Vec<LocatedIssue>> {
        let violations: Vec<RuleViolation> = serde_json::from_str(violations_json)?;
        Ok(self.locate(root, &violations))
    }
}

impl Default for IssueLocator {
    fn default() -> Self {
        Self::new(SmartPathNavigator::default())
    }
}
