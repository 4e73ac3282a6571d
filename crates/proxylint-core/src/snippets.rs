//! Snippet templates used to scaffold plugin config sections

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ProxyLintError, Result};

const BUNDLED_SNIPPETS: &str = include_str!("../data/snippets.json");

static BUNDLED: Lazy<SnippetCatalog> = Lazy::new(|| {
    SnippetCatalog::from_json(BUNDLED_SNIPPETS).unwrap_or_else(|err| {
        tracing::error!("Failed to load bundled snippets: {}", err);
        SnippetCatalog::default()
    })
});

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{\d+:([^}]*)\}").unwrap());
static EMPTY_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{\d+\}").unwrap());
static TABSTOP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\d+").unwrap());
static SECTION_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(\w+)":"#).unwrap());

/// A single editor snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub prefix: String,
    pub body: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Snippet {
    /// Snippet body as plain JSON text
    ///
    /// Tabstops are removed (placeholders keep their default text) and
    /// escaped `\"` / `\$` are unescaped. Lines are joined with a newline
    /// plus two spaces so the body lines up as a top-level property.
    pub fn render_body(&self) -> String {
        self.body
            .iter()
            .map(|line| render_line(line))
            .collect::<Vec<_>>()
            .join("\n  ")
    }

    /// Name of the first property declared on the first body line
    pub fn section_name(&self) -> Option<&str> {
        let first = self.body.first()?;
        SECTION_KEY
            .captures(first)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

fn render_line(line: &str) -> String {
    let line = PLACEHOLDER.replace_all(line, "$1");
    let line = EMPTY_PLACEHOLDER.replace_all(&line, "");
    let line = TABSTOP.replace_all(&line, "");
    line.replace("\\\"", "\"").replace("\\$", "$")
}

/// Snippet key to template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetCatalog {
    snippets: BTreeMap<String, Snippet>,
}

impl SnippetCatalog {
    pub fn bundled() -> &'static SnippetCatalog {
        &BUNDLED
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| ProxyLintError::DataError {
            name: "snippets.json".to_string(),
            message: err.to_string(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&Snippet> {
        self.snippets.get(key)
    }

    /// Snippet whose prefix equals `prefix` exactly
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Snippet> {
        self.snippets.values().find(|snippet| snippet.prefix == prefix)
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}
