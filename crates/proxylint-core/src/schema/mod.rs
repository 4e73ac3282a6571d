//! Remote schema fetching, caching and validation
//!
//! Schema fetches are the only network I/O of the linter. A fetch failure is
//! never an error: the caller simply skips validation for that section.

mod project;
mod validate;

pub use project::{project, project_object};
pub use validate::{
    ADDITIONAL_PROPERTIES, SchemaValidationResult, ValidationError, compile,
    format_error_message, json_type_name, strip_schema_key, validate_against_schema,
    validate_with,
};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{ProxyLintError, Result};

/// Default timeout for a single schema download
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of JSON Schema documents
#[async_trait]
pub trait SchemaFetcher: Send + Sync {
    /// Fetch and parse the schema at `url`; `None` when unavailable
    async fn fetch(&self, url: &str) -> Option<Value>;
}

/// Fetches schemas over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSchemaFetcher {
    client: reqwest::Client,
}

impl HttpSchemaFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("proxylint/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProxyLintError::internal_error(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }
}

impl HttpSchemaFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ProxyLintError::fetch_error(url, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyLintError::fetch_error(url, status.to_string()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| ProxyLintError::fetch_error(url, format!("not valid JSON: {err}")))
    }
}

#[async_trait]
impl SchemaFetcher for HttpSchemaFetcher {
    async fn fetch(&self, url: &str) -> Option<Value> {
        match self.fetch_json(url).await {
            Ok(schema) => Some(schema),
            Err(err) => {
                warn!("{}", err);
                None
            }
        }
    }
}

/// Memoizing schema store keyed by URL
///
/// Entries are only added; nothing is evicted until [`SchemaCache::clear`].
/// Compiled validators are cached alongside the raw schemas.
pub struct SchemaCache {
    fetcher: Arc<dyn SchemaFetcher>,
    schemas: DashMap<String, Arc<Value>>,
    validators: DashMap<String, Arc<jsonschema::Validator>>,
}

impl SchemaCache {
    pub fn new(fetcher: Arc<dyn SchemaFetcher>) -> Self {
        Self {
            fetcher,
            schemas: DashMap::new(),
            validators: DashMap::new(),
        }
    }

    /// Cache backed by an [`HttpSchemaFetcher`]
    pub fn http(timeout: Duration) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpSchemaFetcher::new(timeout)?)))
    }

    /// Cached schema, fetching it on a miss
    pub async fn fetch_schema(&self, url: &str) -> Option<Arc<Value>> {
        if let Some(schema) = self.schemas.get(url) {
            debug!("Schema cache hit: {}", url);
            return Some(Arc::clone(schema.value()));
        }

        debug!("Fetching schema: {}", url);
        let schema = Arc::new(self.fetcher.fetch(url).await?);
        self.schemas.insert(url.to_string(), Arc::clone(&schema));
        Some(schema)
    }

    fn validator(&self, url: &str, schema: &Value) -> Result<Arc<jsonschema::Validator>> {
        if let Some(validator) = self.validators.get(url) {
            return Ok(Arc::clone(validator.value()));
        }
        let validator = Arc::new(compile(schema).map_err(|err| match err {
            ProxyLintError::SchemaError { message, .. } => {
                ProxyLintError::schema_error(url, message)
            }
            other => other,
        })?);
        self.validators
            .insert(url.to_string(), Arc::clone(&validator));
        Ok(validator)
    }

    /// Validate `data` against the schema at `url`
    ///
    /// Returns `Ok(None)` when the schema cannot be fetched.
    pub async fn validate(&self, url: &str, data: &Value) -> Result<Option<SchemaValidationResult>> {
        let Some(schema) = self.fetch_schema(url).await else {
            return Ok(None);
        };
        let validator = self.validator(url, &schema)?;
        Ok(Some(validate_with(&validator, data)))
    }

    /// Drop every cached schema and compiled validator
    pub fn clear(&self) {
        self.schemas.clear();
        self.validators.clear();
    }

    /// Number of cached schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl std::fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache")
            .field("schemas", &self.schemas.len())
            .field("validators", &self.validators.len())
            .finish()
    }
}
