use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Hooks, components and functions found in one source file
///
/// Every list is sorted and free of duplicates. When parsing failed only
/// `error` is meaningful and the lists are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolDigest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hooks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defined_components: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub used_components: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SymbolDigest {
    /// Digest carrying only a parse error
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// True when nothing was found and nothing failed
    pub fn is_empty(&self) -> bool {
        self.error.is_none()
            && self.hooks.is_empty()
            && self.defined_components.is_empty()
            && self.used_components.is_empty()
            && self.functions.is_empty()
    }
}

/// Accumulates symbol names while the syntax tree is walked
#[derive(Debug, Default)]
pub(crate) struct SymbolSets {
    pub hooks: BTreeSet<String>,
    pub defined_components: BTreeSet<String>,
    pub used_components: BTreeSet<String>,
    pub functions: BTreeSet<String>,
}

impl SymbolSets {
    pub fn into_digest(self) -> SymbolDigest {
        SymbolDigest {
            hooks: self.hooks.into_iter().collect(),
            defined_components: self.defined_components.into_iter().collect(),
            used_components: self.used_components.into_iter().collect(),
            functions: self.functions.into_iter().collect(),
            error: None,
        }
    }
}
