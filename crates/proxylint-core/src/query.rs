//! Lookups over the syntax tree

use crate::syntax::{AstNode, NodeKind, NodeRef, ObjectNode, PropertyNode, SyntaxNode};

/// Find the first property whose key has the given syntactic kind and value
pub fn find_property<'a>(
    siblings: &'a [PropertyNode],
    key_kind: NodeKind,
    key_value: &str,
) -> Option<&'a PropertyNode> {
    siblings
        .iter()
        .find(|prop| prop.key.kind() == key_kind && prop.key.value == key_value)
}

/// Shorthand for the common identifier-keyed lookup
pub fn property<'a>(object: &'a ObjectNode, name: &str) -> Option<&'a PropertyNode> {
    find_property(&object.children, NodeKind::Identifier, name)
}

/// Decoded string value of a named property
pub fn string_property<'a>(object: &'a ObjectNode, name: &str) -> Option<&'a str> {
    property(object, name).and_then(|prop| prop.value.as_str())
}

/// True only when the named property is the literal `true`
pub fn is_enabled(object: &ObjectNode) -> bool {
    property(object, "enabled")
        .and_then(|prop| prop.value.as_bool())
        .unwrap_or(false)
}

/// Object entries of the top-level `plugins` array
pub fn plugin_objects(root: &ObjectNode) -> Option<Vec<&ObjectNode>> {
    let plugins = property(root, "plugins")?.value.as_array()?;
    Some(
        plugins
            .children
            .iter()
            .filter_map(SyntaxNode::as_object)
            .collect(),
    )
}

fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Resolve a `/`-delimited JSON pointer against a node
///
/// Object segments resolve to the matching property (the property itself is
/// returned for the final segment); array segments must be in-bounds
/// non-negative integers. `""` and `"/"` resolve to the root. Any miss yields
/// `None`; partial matches are never returned.
pub fn find_node_by_pointer<'a>(root: &'a ObjectNode, pointer: &str) -> Option<NodeRef<'a>> {
    if pointer.is_empty() || pointer == "/" {
        return Some(NodeRef::Object(root));
    }

    let segments: Vec<&str> = pointer.strip_prefix('/').unwrap_or(pointer).split('/').collect();
    let last = segments.len() - 1;
    let mut current = NodeRef::Object(root);

    for (index, raw_segment) in segments.iter().enumerate() {
        let segment = unescape_segment(raw_segment);
        current = match current {
            NodeRef::Object(object) => {
                let prop = find_property(&object.children, NodeKind::Identifier, &segment)?;
                if index == last {
                    return Some(NodeRef::Property(prop));
                }
                NodeRef::from(&prop.value)
            }
            NodeRef::Array(array) => {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let item = segment.parse::<usize>().ok()?;
                NodeRef::from(array.children.get(item)?)
            }
            _ => return None,
        };
    }

    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    const DOC: &str = r#"{
  "$schema": "https://example.com/rc.schema.json",
  "name": "first",
  "name": "second",
  "section": {
    "items": [{"id": 1}, {"id": 2}],
    "a/b": true
  }
}"#;

    #[test]
    fn finds_first_match_in_document_order() {
        let root = parse(DOC).unwrap();
        let prop = find_property(&root.children, NodeKind::Identifier, "name").unwrap();
        assert_eq!(prop.value.as_str(), Some("first"));
    }

    #[test]
    fn missing_or_wrong_kind_is_none() {
        let root = parse(DOC).unwrap();
        assert!(find_property(&root.children, NodeKind::Identifier, "missing").is_none());
        assert!(find_property(&root.children, NodeKind::Literal, "name").is_none());
    }

    #[test]
    fn empty_pointer_is_root() {
        let root = parse(DOC).unwrap();
        for pointer in ["", "/"] {
            let node = find_node_by_pointer(&root, pointer).unwrap();
            assert_eq!(node.kind(), NodeKind::Object);
            assert_eq!(node.loc(), &root.loc);
        }
    }

    #[test]
    fn resolves_property_paths() {
        let root = parse(DOC).unwrap();
        let node = find_node_by_pointer(&root, "/section/items").unwrap();
        assert!(matches!(node, NodeRef::Property(p) if p.key.value == "items"));

        let node = find_node_by_pointer(&root, "/section/items/1/id").unwrap();
        let NodeRef::Property(prop) = node else {
            panic!("expected property");
        };
        assert_eq!(prop.value.as_literal().unwrap().raw, "2");
    }

    #[test]
    fn array_index_resolves_to_value() {
        let root = parse(DOC).unwrap();
        let node = find_node_by_pointer(&root, "/section/items/0").unwrap();
        assert_eq!(node.kind(), NodeKind::Object);
    }

    #[test]
    fn escaped_segments() {
        let root = parse(DOC).unwrap();
        assert!(find_node_by_pointer(&root, "/section/a~1b").is_some());
    }

    #[test]
    fn misses_return_none() {
        let root = parse(DOC).unwrap();
        assert!(find_node_by_pointer(&root, "/section/items/5").is_none());
        assert!(find_node_by_pointer(&root, "/section/items/-1").is_none());
        assert!(find_node_by_pointer(&root, "/section/items/x").is_none());
        assert!(find_node_by_pointer(&root, "/name/deeper").is_none());
        assert!(find_node_by_pointer(&root, "/nope").is_none());
    }

    #[test]
    fn repeated_segment_names_resolve_fully() {
        let root = parse(r#"{"a": {"a": {"b": 1}}}"#).unwrap();
        let node = find_node_by_pointer(&root, "/a/a/b").unwrap();
        assert!(matches!(node, NodeRef::Property(p) if p.key.value == "b"));
    }
}
