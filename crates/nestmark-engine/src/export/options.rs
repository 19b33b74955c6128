use serde::{Deserialize, Serialize};

use crate::pandoc::DEFAULT_API_VERSION;

/// Configuration of one index the document may refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    /// Class put on references to this index instead of the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_class: Option<String>,
    /// Where the reference sits relative to the indexed text (e.g. "after").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
}

/// Caller-supplied settings for an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub api_version: [u32; 3],
    pub indexes: Vec<IndexDefinition>,
    /// Pretty-print with this many spaces; `None` writes compact JSON.
    pub indent: Option<usize>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION,
            indexes: vec![],
            indent: None,
        }
    }
}

impl ExportOptions {
    pub fn index(&self, name: &str) -> Option<&IndexDefinition> {
        self.indexes.iter().find(|d| d.name == name)
    }
}
