//! Plain JSON projection of a syntax tree

use serde_json::{Map, Number, Value};

use crate::syntax::{LiteralValue, ObjectNode, SyntaxNode};

/// Convert a value node into plain JSON
///
/// Duplicate keys keep the last value. Non-finite numbers become `null`.
pub fn project(node: &SyntaxNode) -> Value {
    match node {
        SyntaxNode::Object(object) => project_object(object),
        SyntaxNode::Array(array) => Value::Array(array.children.iter().map(project).collect()),
        SyntaxNode::Literal(literal) => match &literal.value {
            LiteralValue::String(s) => Value::String(s.clone()),
            LiteralValue::Number(n) => project_number(*n, &literal.raw),
            LiteralValue::Bool(b) => Value::Bool(*b),
            LiteralValue::Null => Value::Null,
        },
    }
}

/// Convert an object node into a JSON object
pub fn project_object(object: &ObjectNode) -> Value {
    let mut map = Map::new();
    for prop in &object.children {
        map.insert(prop.key.value.clone(), project(&prop.value));
    }
    Value::Object(map)
}

fn project_number(n: f64, raw: &str) -> Value {
    // Integers keep their exact representation
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(uint) = raw.parse::<u64>() {
        return Value::Number(uint.into());
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}
