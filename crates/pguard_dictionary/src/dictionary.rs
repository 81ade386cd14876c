//! Dictionary layers and the consolidated dictionary.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DictionaryError, DictionaryResult};

/// Serialization formats accepted for dictionary and plan files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
    Toml,
}

impl FileFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(FileFormat::Yaml),
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// One named layer of key/value entries attached to an environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    /// Layer name; defaults to the file stem when loaded from disk
    #[serde(default)]
    pub name: String,
    /// Entries of this layer
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Add an entry, replacing any previous value for the key.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Build a dictionary from key/value pairs.
    pub fn from_entries<K, V, I>(name: impl Into<String>, entries: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            name: name.into(),
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load a dictionary from a YAML, JSON or TOML file.
    pub fn from_file(path: &Path) -> DictionaryResult<Self> {
        let format = FileFormat::from_path(path)
            .ok_or_else(|| DictionaryError::UnsupportedFormat(path.to_path_buf()))?;
        let content = std::fs::read_to_string(path)?;

        let mut dictionary: Dictionary = match format {
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        if dictionary.name.is_empty() {
            dictionary.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        debug!(
            "Loaded dictionary '{}' with {} entries from {:?}",
            dictionary.name,
            dictionary.entries.len(),
            path
        );
        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The flattened, fully resolved mapping produced from all layers.
///
/// Keys iterate in sorted order. Instances are only produced by the resolver
/// and are never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConsolidatedDictionary {
    entries: BTreeMap<String, String>,
}

impl ConsolidatedDictionary {
    pub(crate) fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Resolved value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Borrow the underlying mapping.
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.entries
    }
}
