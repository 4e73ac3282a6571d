//! Validating config section data against a JSON Schema
//!
//! Validator errors are normalized into [`ValidationError`] values carrying a
//! JSON pointer into the validated data, a keyword and a readable message.

use jsonschema::error::{TypeKind, ValidationErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{ProxyLintError, Result};

/// Keyword reported for unknown properties
pub const ADDITIONAL_PROPERTIES: &str = "additionalProperties";

/// A single normalized validation error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON pointer to the offending value, `/` for the root
    pub path: String,
    pub message: String,
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl ValidationError {
    /// Name of the unexpected property for `additionalProperties` errors
    pub fn additional_property(&self) -> Option<&str> {
        self.params
            .as_ref()?
            .get("additionalProperty")
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Compile a schema
pub fn compile(schema: &Value) -> Result<jsonschema::Validator> {
    jsonschema::options()
        .build(schema)
        .map_err(|err| ProxyLintError::schema_error(schema_id(schema), err.to_string()))
}

fn schema_id(schema: &Value) -> String {
    schema
        .get("$id")
        .and_then(Value::as_str)
        .unwrap_or("<inline>")
        .to_string()
}

/// Drop the `$schema` key from an object; it is metadata, not data
pub fn strip_schema_key(data: &Value) -> Value {
    match data {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| key.as_str() != "$schema")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Map<_, _>>(),
        ),
        other => other.clone(),
    }
}

/// Compile `schema` and validate `data` against it, collecting every error
pub fn validate_against_schema(data: &Value, schema: &Value) -> Result<SchemaValidationResult> {
    let validator = compile(schema)?;
    Ok(validate_with(&validator, data))
}

/// Validate with an already compiled validator
pub fn validate_with(validator: &jsonschema::Validator, data: &Value) -> SchemaValidationResult {
    let data = strip_schema_key(data);
    let mut errors = Vec::new();

    for err in validator.iter_errors(&data) {
        let pointer = err.instance_path.to_string();
        let path = if pointer.is_empty() {
            "/".to_string()
        } else {
            pointer.clone()
        };
        let instance = data.pointer(&pointer).cloned();

        match &err.kind {
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                // One error per unknown key so each can be located separately
                for name in unexpected {
                    errors.push(ValidationError {
                        path: path.clone(),
                        message: format!("Unknown property '{name}'"),
                        keyword: ADDITIONAL_PROPERTIES.to_string(),
                        data: instance.clone(),
                        params: Some(json!({ "additionalProperty": name })),
                    });
                }
            }
            ValidationErrorKind::Required { property } => {
                let name = plain(property);
                errors.push(ValidationError {
                    path,
                    message: format!("Missing required property '{name}'"),
                    keyword: "required".to_string(),
                    data: instance,
                    params: Some(json!({ "missingProperty": name })),
                });
            }
            kind => {
                let (keyword, params) = match keyword_params(kind) {
                    Some((keyword, params)) => (keyword.to_string(), Some(params)),
                    None => (schema_keyword(&err.schema_path.to_string()), None),
                };
                let message = format_error_message(
                    &keyword,
                    params.as_ref(),
                    instance.as_ref(),
                    &err.to_string(),
                );
                errors.push(ValidationError {
                    path,
                    message,
                    keyword,
                    data: instance,
                    params,
                });
            }
        }
    }

    SchemaValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

/// Last segment of a schema location, e.g. `maximum` in `/properties/rate/maximum`
fn schema_keyword(schema_path: &str) -> String {
    schema_path.rsplit('/').next().unwrap_or_default().to_string()
}

/// Keyword and its parameters, read from the error itself
///
/// Parameters are named `limit`, `allowedValues`, `type`, `pattern` and `format`.
fn keyword_params(kind: &ValidationErrorKind) -> Option<(&'static str, Value)> {
    let entry = match kind {
        ValidationErrorKind::Type { kind } => {
            let expected = match kind {
                TypeKind::Single(ty) => ty.to_string(),
                TypeKind::Multiple(types) => types
                    .iter()
                    .map(|ty| ty.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            };
            ("type", json!({ "type": expected }))
        }
        ValidationErrorKind::Enum { options } => {
            let allowed = match options {
                Value::Array(values) => values.clone(),
                other => vec![other.clone()],
            };
            ("enum", json!({ "allowedValues": allowed }))
        }
        ValidationErrorKind::Constant { expected_value } => {
            ("const", json!({ "allowedValue": expected_value }))
        }
        ValidationErrorKind::Minimum { limit } => ("minimum", json!({ "limit": limit })),
        ValidationErrorKind::Maximum { limit } => ("maximum", json!({ "limit": limit })),
        ValidationErrorKind::ExclusiveMinimum { limit } => {
            ("exclusiveMinimum", json!({ "limit": limit }))
        }
        ValidationErrorKind::ExclusiveMaximum { limit } => {
            ("exclusiveMaximum", json!({ "limit": limit }))
        }
        ValidationErrorKind::MinLength { limit } => ("minLength", json!({ "limit": limit })),
        ValidationErrorKind::MaxLength { limit } => ("maxLength", json!({ "limit": limit })),
        ValidationErrorKind::MinItems { limit } => ("minItems", json!({ "limit": limit })),
        ValidationErrorKind::MaxItems { limit } => ("maxItems", json!({ "limit": limit })),
        ValidationErrorKind::Pattern { pattern } => ("pattern", json!({ "pattern": pattern })),
        ValidationErrorKind::Format { format } => ("format", json!({ "format": format })),
        _ => return None,
    };
    Some(entry)
}

/// JSON type name of a value
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn join_plain(values: &[Value], separator: &str) -> String {
    values.iter().map(plain).collect::<Vec<_>>().join(separator)
}

/// Readable message for a keyword, falling back to the validator's message
pub fn format_error_message(
    keyword: &str,
    params: Option<&Value>,
    instance: Option<&Value>,
    fallback: &str,
) -> String {
    let param = |name: &str| params.and_then(|p| p.get(name));

    let message = match keyword {
        "type" => param("type").map(|expected| {
            let actual = instance.map(json_type_name).unwrap_or("undefined");
            format!("Expected {}, got {actual}", plain(expected))
        }),
        "enum" => param("allowedValues")
            .and_then(Value::as_array)
            .map(|options| format!("Invalid value. Allowed values: {}", join_plain(options, ", "))),
        "minimum" => param("limit").map(|limit| format!("Value must be >= {}", plain(limit))),
        "maximum" => param("limit").map(|limit| format!("Value must be <= {}", plain(limit))),
        "minLength" => param("limit")
            .map(|limit| format!("String must be at least {} characters", plain(limit))),
        "maxLength" => param("limit")
            .map(|limit| format!("String must be at most {} characters", plain(limit))),
        "pattern" => param("pattern")
            .map(|pattern| format!("String does not match pattern {}", plain(pattern))),
        "format" => param("format")
            .map(|format| format!("Invalid format. Expected {}", plain(format))),
        _ => None,
    };
    message.unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "properties": {
                "mocksFile": { "type": "string", "minLength": 1 },
                "rate": { "type": "number", "minimum": 0, "maximum": 100 },
                "mode": { "enum": ["fast", "slow"] },
                "tags": { "type": "array", "items": { "type": "string", "pattern": "^[a-z]+$" } }
            },
            "required": ["mocksFile"],
            "additionalProperties": false
        })
    }

    #[test]
    fn valid_data_has_no_errors() {
        let result =
            validate_against_schema(&json!({"mocksFile": "mocks.json", "rate": 5}), &schema())
                .unwrap();
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn schema_key_is_never_reported() {
        let data = json!({"$schema": "https://example.com/s.json", "mocksFile": "m.json"});
        let result = validate_against_schema(&data, &schema()).unwrap();
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn unknown_properties_are_split_per_key() {
        let data = json!({"mocksFile": "m.json", "foo": 1, "bar": 2});
        let result = validate_against_schema(&data, &schema()).unwrap();
        let mut unknown: Vec<_> = result
            .errors
            .iter()
            .filter(|e| e.keyword == ADDITIONAL_PROPERTIES)
            .map(|e| e.additional_property().unwrap().to_string())
            .collect();
        unknown.sort();
        assert_eq!(unknown, vec!["bar", "foo"]);
        assert!(
            result
                .errors
                .iter()
                .any(|e| e.message == "Unknown property 'foo'" && e.path == "/")
        );
    }

    #[test]
    fn collects_all_errors() {
        let data = json!({"rate": 500, "mode": "medium", "tags": ["ok", "NOPE"]});
        let result = validate_against_schema(&data, &schema()).unwrap();
        assert!(!result.valid);
        let messages: Vec<_> = result.errors.iter().map(|e| e.message.as_str()).collect();
        assert!(messages.contains(&"Missing required property 'mocksFile'"));
        assert!(messages.contains(&"Value must be <= 100"));
        assert!(messages.contains(&"Invalid value. Allowed values: fast, slow"));
        assert!(messages.contains(&"String does not match pattern ^[a-z]+$"));

        let rate = result.errors.iter().find(|e| e.keyword == "maximum").unwrap();
        assert_eq!(rate.path, "/rate");
        assert_eq!(rate.data, Some(json!(500)));
        let tag = result.errors.iter().find(|e| e.keyword == "pattern").unwrap();
        assert_eq!(tag.path, "/tags/1");
    }

    #[test]
    fn type_errors_name_both_types() {
        let data = json!({"mocksFile": 5});
        let result = validate_against_schema(&data, &schema()).unwrap();
        let err = result.errors.iter().find(|e| e.keyword == "type").unwrap();
        assert_eq!(err.message, "Expected string, got number");
        assert_eq!(err.path, "/mocksFile");
    }

    #[test]
    fn invalid_schema_is_a_schema_error() {
        let err = validate_against_schema(&json!({}), &json!({"type": 12})).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Schema);
    }

    #[test]
    fn keywords_behind_refs_keep_their_parameters() {
        let schema = json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "definitions": {
                "rate": { "type": "number", "maximum": 100 },
                "name": { "type": "string", "minLength": 2 },
                "mode": { "enum": ["fast", "slow"] }
            },
            "properties": {
                "rate": { "$ref": "#/definitions/rate" },
                "name": { "$ref": "#/definitions/name" },
                "mode": { "$ref": "#/definitions/mode" },
                "count": { "$ref": "#/definitions/rate" }
            }
        });
        let data = json!({"rate": 500, "name": "x", "mode": "medium", "count": "ten"});
        let result = validate_against_schema(&data, &schema).unwrap();
        let message = |path: &str| {
            result
                .errors
                .iter()
                .find(|e| e.path == path)
                .map(|e| e.message.clone())
                .unwrap()
        };

        assert_eq!(message("/rate"), "Value must be <= 100");
        assert_eq!(message("/name"), "String must be at least 2 characters");
        assert_eq!(message("/mode"), "Invalid value. Allowed values: fast, slow");
        assert_eq!(message("/count"), "Expected number, got string");

        let rate = result.errors.iter().find(|e| e.path == "/rate").unwrap();
        assert_eq!(rate.keyword, "maximum");
        assert_eq!(rate.params, Some(json!({ "limit": 100 })));
    }

    #[test]
    fn unknown_keywords_fall_back() {
        assert_eq!(
            format_error_message("const", Some(&json!({ "allowedValue": 1 })), None, "library message"),
            "library message"
        );
        assert_eq!(
            format_error_message("minimum", None, None, "library message"),
            "library message"
        );
        assert_eq!(
            format_error_message("minLength", Some(&json!({ "limit": 3 })), None, ""),
            "String must be at least 3 characters"
        );
        assert_eq!(
            format_error_message("format", Some(&json!({ "format": "uri" })), None, ""),
            "Invalid format. Expected uri"
        );
    }
}
