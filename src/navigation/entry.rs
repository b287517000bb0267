use crate::error::NavigationFailure;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Which bundle entry a resource-relative path resolves against when the
/// input carries no explicit entry index.
///
/// An explicit index always wins, whatever the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryResolutionPolicy {
    /// Never guess; an explicit entry index is required.
    Strict,
    /// First entry whose resource has the requested `resourceType`.
    PreferExplicit,
    /// Like `PreferExplicit`, falling back to entry 0.
    #[default]
    FallbackToFirst,
}

impl EntryResolutionPolicy {
    /// Pick an entry index out of `entries`.
    pub fn select_entry(
        &self,
        entries: &[Value],
        explicit_index: Option<usize>,
        resource_type: Option<&str>,
    ) -> Result<usize, NavigationFailure> {
        if let Some(index) = explicit_index {
            return if index < entries.len() {
                Ok(index)
            } else {
                Err(NavigationFailure::EntryIndexOutOfRange {
                    index,
                    len: entries.len(),
                })
            };
        }

        match self {
            Self::Strict => Err(NavigationFailure::AmbiguousEntry),
            Self::PreferExplicit => {
                let resource_type = resource_type.ok_or(NavigationFailure::AmbiguousEntry)?;
                find_by_resource_type(entries, resource_type).ok_or_else(|| {
                    NavigationFailure::NoMatchingEntry {
                        resource_type: resource_type.to_string(),
                    }
                })
            }
            Self::FallbackToFirst => {
                if let Some(index) = resource_type.and_then(|rt| find_by_resource_type(entries, rt))
                {
                    return Ok(index);
                }
                if entries.is_empty() {
                    return Err(NavigationFailure::EntryIndexOutOfRange { index: 0, len: 0 });
                }
                tracing::debug!(
                    resource_type = resource_type.unwrap_or_default(),
                    "no matching bundle entry, falling back to entry 0"
                );
                Ok(0)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::PreferExplicit => "prefer-explicit",
            Self::FallbackToFirst => "fallback-to-first",
        }
    }
}

impl fmt::Display for EntryResolutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryResolutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "strict" => Ok(Self::Strict),
            "prefer-explicit" | "preferexplicit" => Ok(Self::PreferExplicit),
            "fallback-to-first" | "fallbacktofirst" => Ok(Self::FallbackToFirst),
            other => Err(format!("unknown entry resolution policy: {other}")),
        }
    }
}

/// `resource.resourceType` of a bundle entry.
pub fn entry_resource_type(entry: &Value) -> Option<&str> {
    entry.get("resource")?.get("resourceType")?.as_str()
}

fn find_by_resource_type(entries: &[Value], resource_type: &str) -> Option<usize> {
    entries
        .iter()
        .position(|entry| entry_resource_type(entry) == Some(resource_type))
}
