//! Static plugin reference table
//!
//! Every plugin-specific rule consults this table. A plugin absent from it is
//! unknown and exempt from config validation.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ProxyLintError, Result};

const BUNDLED_PLUGINS: &str = include_str!("../data/plugins.json");

static BUNDLED: Lazy<PluginCatalog> = Lazy::new(|| {
    PluginCatalog::from_json(BUNDLED_PLUGINS).unwrap_or_else(|err| {
        tracing::error!("Failed to load bundled plugin data: {}", err);
        PluginCatalog::default()
    })
});

/// Config section descriptor of a plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Prefix of the snippet that scaffolds the section
    pub name: String,
    /// `Some(true)` required, `Some(false)` optional, `None` unspecified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSnippetEntry {
    pub instance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PluginConfig>,
    #[serde(default)]
    pub requires_language_model: bool,
}

impl PluginSnippetEntry {
    pub fn requires_config(&self) -> bool {
        self.config
            .as_ref()
            .is_some_and(|config| config.required == Some(true))
    }

    pub fn has_optional_config(&self) -> bool {
        self.config
            .as_ref()
            .is_some_and(|config| config.required == Some(false))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDoc {
    pub url: String,
}

/// Plugin name to reference data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCatalog {
    plugins: BTreeMap<String, PluginSnippetEntry>,
    #[serde(default)]
    docs: BTreeMap<String, PluginDoc>,
}

impl PluginCatalog {
    /// The catalog shipped with the crate
    pub fn bundled() -> &'static PluginCatalog {
        &BUNDLED
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| ProxyLintError::DataError {
            name: "plugins.json".to_string(),
            message: err.to_string(),
        })
    }

    /// Build a catalog from entries, mostly useful in tests
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, PluginSnippetEntry)>,
    ) -> Self {
        Self {
            plugins: entries.into_iter().collect(),
            docs: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PluginSnippetEntry> {
        self.plugins.get(name)
    }

    /// Case-sensitive membership test
    pub fn is_known(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn doc_url(&self, name: &str) -> Option<&str> {
        self.docs.get(name).map(|doc| doc.url.as_str())
    }

    pub fn language_model_plugins(&self) -> Vec<&str> {
        self.plugins
            .iter()
            .filter(|(_, entry)| entry.requires_language_model)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn plugins_requiring_config(&self) -> Vec<&str> {
        self.plugins
            .iter()
            .filter(|(_, entry)| entry.requires_config())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
