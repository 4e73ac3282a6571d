//! Recognizing Dev Proxy files

use std::path::Path;

use crate::query::{property, string_property};
use crate::syntax::parse;

/// File name that is always treated as a config file
pub const DEFAULT_CONFIG_FILE_NAME: &str = "devproxyrc.json";

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("jsonc"))
}

fn is_dev_proxy_schema(schema: &str, suffix: &str) -> bool {
    schema.contains("dev-proxy") && schema.ends_with(suffix)
}

/// Whether `text` at `path` is a Dev Proxy config file
///
/// A file with a `$schema` that is not a Dev Proxy config schema is never a
/// config file, even when it has a `plugins` array.
pub fn is_config_file(path: &Path, text: &str) -> bool {
    if !has_json_extension(path) {
        return false;
    }

    let Ok(root) = parse(text) else {
        return false;
    };

    if path.to_string_lossy().ends_with(DEFAULT_CONFIG_FILE_NAME) {
        return true;
    }

    if let Some(schema_prop) = property(&root, "$schema") {
        return schema_prop
            .value
            .as_str()
            .is_some_and(|schema| is_dev_proxy_schema(schema, "rc.schema.json"));
    }

    property(&root, "plugins").is_some_and(|plugins| plugins.value.as_array().is_some())
}

/// Whether `text` carries any Dev Proxy schema (mocks, error responses, ...)
pub fn is_proxy_file(text: &str) -> bool {
    let Ok(root) = parse(text) else {
        return false;
    };
    string_property(&root, "$schema").is_some_and(|schema| is_dev_proxy_schema(schema, ".schema.json"))
}
