//! Dataset metadata from the Socrata views API

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    #[serde(default)]
    pub field_name: String,
    #[serde(default)]
    pub data_type_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ColumnMetadata {
    /// Description cut to `max_chars`, or `None` when blank
    pub fn short_description(&self, max_chars: usize) -> Option<String> {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| d.chars().take(max_chars).collect())
    }
}
