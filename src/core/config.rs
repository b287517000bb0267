use crate::error::{Result, SmartPathError};
use crate::hints::{KnownStructuralHints, NullStructuralHints, StructuralHintProvider};
use crate::navigation::EntryResolutionPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigatorConfig {
    pub entry_policy: EntryResolutionPolicy,
    pub hints: HintSource,
    pub implicit_indexing: ImplicitIndexing,
    /// Extra repeating paths per resource type, merged into the known table.
    pub extra_repeating: BTreeMap<String, Vec<String>>,
}

/// Which structural hint provider the navigator is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HintSource {
    None,
    #[default]
    Known,
}

/// When an array reached without an explicit index defaults to element 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImplicitIndexing {
    /// Whenever the document holds an array at that point.
    #[default]
    DocumentShape,
    /// Only when the hint provider reports the property as repeating.
    HintedOnly,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            entry_policy: EntryResolutionPolicy::FallbackToFirst,
            hints: HintSource::Known,
            implicit_indexing: ImplicitIndexing::DocumentShape,
            extra_repeating: BTreeMap::new(),
        }
    }
}

impl NavigatorConfig {
    /// Production validation: no entry guessing, hinted arrays only.
    pub fn strict() -> Self {
        Self {
            entry_policy: EntryResolutionPolicy::Strict,
            implicit_indexing: ImplicitIndexing::HintedOnly,
            ..Default::default()
        }
    }

    /// Authoring and playground tools: resolve as much as possible.
    pub fn authoring() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SmartPathError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&content)
    }

    pub fn with_entry_policy(mut self, policy: EntryResolutionPolicy) -> Self {
        self.entry_policy = policy;
        self
    }

    pub fn with_hints(mut self, hints: HintSource) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_implicit_indexing(mut self, implicit_indexing: ImplicitIndexing) -> Self {
        self.implicit_indexing = implicit_indexing;
        self
    }

    pub fn with_repeating(
        mut self,
        resource_type: impl Into<String>,
        property_path: impl Into<String>,
    ) -> Self {
        self.extra_repeating
            .entry(resource_type.into())
            .or_default()
            .push(property_path.into());
        self
    }

    /// Build the hint provider this configuration describes.
    pub fn build_hint_provider(&self) -> Arc<dyn StructuralHintProvider> {
        match self.hints {
            HintSource::None => {
                if !self.extra_repeating.is_empty() {
                    tracing::warn!("extraRepeating is ignored when hints are disabled");
                }
                Arc::new(NullStructuralHints)
            }
            HintSource::Known => {
                let hints = self.extra_repeating.iter().fold(
                    KnownStructuralHints::new(),
                    |hints, (resource_type, paths)| {
                        paths
                            .iter()
                            .fold(hints, |h, path| h.with_repeating(resource_type, path))
                    },
                );
                Arc::new(hints)
            }
        }
    }
}
