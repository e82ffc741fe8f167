//! Class index to label mapping from the model's `config.json`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ModelConfigFile {
    #[serde(default)]
    id2label: BTreeMap<usize, String>,
}

/// The model's `id2label` table, fixed at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelTable(BTreeMap<usize, String>);

impl LabelTable {
    /// Build a table from `(index, label)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (usize, String)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Read `id2label` from a model `config.json`.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_config_json(&contents).map_err(|e| Error::ModelMetadata {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Parse `id2label` from model config JSON.
    pub fn from_config_json(json: &str) -> serde_json::Result<Self> {
        let config: ModelConfigFile = serde_json::from_str(json)?;
        Ok(Self(config.id2label))
    }

    /// Lower-cased label for a class index.
    pub fn label(&self, index: usize) -> Result<String> {
        self.0
            .get(&index)
            .map(|label| label.to_lowercase())
            .ok_or(Error::UnknownLabel { index })
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
