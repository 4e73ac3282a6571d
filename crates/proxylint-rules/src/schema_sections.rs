//! Config section validation against remote schemas
//!
//! Sections carrying their own `$schema` are validated concurrently. Errors
//! that cannot be located in the document are dropped.

use futures::future::join_all;
use proxylint_core::query::{find_node_by_pointer, property};
use proxylint_core::schema::{ADDITIONAL_PROPERTIES, ValidationError, project_object};
use proxylint_core::{
    Diagnostic, DiagnosticCode, ObjectNode, PropertyNode, SchemaCache, to_range,
};
use tracing::{debug, warn};

/// Root properties that are never config sections
pub const RESERVED_PROPERTIES: &[&str] = &[
    "$schema",
    "plugins",
    "urlsToWatch",
    "logLevel",
    "newVersionNotification",
    "showSkipMessages",
    "languageModel",
    "rate",
    "labelMode",
];

/// A top-level object that may hold plugin settings
#[derive(Debug, Clone, Copy)]
pub struct ConfigSection<'a> {
    pub name: &'a str,
    pub property: &'a PropertyNode,
    pub object: &'a ObjectNode,
    /// The section's own `$schema` property
    pub schema: Option<&'a PropertyNode>,
}

impl<'a> ConfigSection<'a> {
    pub fn schema_url(&self) -> Option<&'a str> {
        self.schema.and_then(|schema| schema.value.as_str())
    }
}

/// Non-reserved, object-valued root properties in document order
pub fn config_sections(root: &ObjectNode) -> impl Iterator<Item = ConfigSection<'_>> {
    root.children.iter().filter_map(|prop| {
        if RESERVED_PROPERTIES.contains(&prop.key.value.as_str()) {
            return None;
        }
        let object = prop.value.as_object()?;
        Some(ConfigSection {
            name: &prop.key.value,
            property: prop,
            object,
            schema: property(object, "$schema"),
        })
    })
}

/// Validate every section that references a schema
///
/// Results keep section order regardless of which fetch finishes first.
pub async fn lint_schema_sections(root: &ObjectNode, cache: &SchemaCache) -> Vec<Diagnostic> {
    let pending = config_sections(root).filter_map(|section| {
        let url = section.schema_url()?;
        Some(validate_section(section, url, cache))
    });

    join_all(pending).await.into_iter().flatten().collect()
}

async fn validate_section(
    section: ConfigSection<'_>,
    url: &str,
    cache: &SchemaCache,
) -> Vec<Diagnostic> {
    let data = project_object(section.object);
    let result = match cache.validate(url, &data).await {
        Ok(Some(result)) => result,
        Ok(None) => {
            debug!("Schema {} unavailable, skipping section {}", url, section.name);
            return Vec::new();
        }
        Err(err) => {
            warn!("Error validating config section {}: {}", section.name, err);
            return Vec::new();
        }
    };

    result
        .errors
        .iter()
        .filter_map(|error| diagnostic_for_error(&section, error))
        .collect()
}

/// Locate a validation error in the section and build its diagnostic
pub fn diagnostic_for_error(
    section: &ConfigSection<'_>,
    error: &ValidationError,
) -> Option<Diagnostic> {
    let message = format!("{}: {}", section.name, error.message);

    if error.keyword == ADDITIONAL_PROPERTIES {
        let name = error.additional_property()?;
        let target = property(section.object, name)?;
        return Some(Diagnostic::warning(
            to_range(&target.key),
            message,
            DiagnosticCode::UnknownConfigProperty,
        ));
    }

    let Some(target) = find_node_by_pointer(section.object, &error.path) else {
        debug!(
            "Dropping '{}' error at {}: no matching node",
            error.keyword, error.path
        );
        return None;
    };
    Some(Diagnostic::error(
        to_range(&target.diagnostic_target()),
        message,
        DiagnosticCode::InvalidConfigValue,
    ))
}
