//! Shared schema-node classification and document helpers.
//!
//! Storage stays `serde_json::Value` so vendor extensions and unknown
//! keywords survive the pipeline untouched; [`SchemaKind::classify`] gives
//! passes a total, tagged view of a node instead of scattered presence
//! checks.

use serde_json::{Map, Value};

use crate::reference::Section;

/// Total classification of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind<'a> {
    /// `{ "$ref": "..." }` — semantically "replace me with the target".
    Reference(&'a str),
    /// An `allOf` composition.
    AllOf,
    /// `type: array` (or a bare `items`).
    Array,
    /// `type: object` (or a bare `properties`).
    Object,
    /// Anything else: scalars, bare enums, marker nodes.
    Scalar,
}

impl SchemaKind<'_> {
    pub fn classify(node: &Map<String, Value>) -> SchemaKind<'_> {
        if let Some(Value::String(target)) = node.get("$ref") {
            return SchemaKind::Reference(target);
        }
        if node.contains_key("allOf") {
            return SchemaKind::AllOf;
        }
        let ty = node.get("type").and_then(Value::as_str);
        if ty == Some("array") || node.contains_key("items") {
            return SchemaKind::Array;
        }
        if ty == Some("object") || node.contains_key("properties") {
            return SchemaKind::Object;
        }
        SchemaKind::Scalar
    }
}

/// Borrow a section map (`definitions`, `parameters`, `responses`) from the
/// document root, if present and object-shaped.
pub fn section_map(doc: &Map<String, Value>, section: Section) -> Option<&Map<String, Value>> {
    doc.get(section.key()).and_then(Value::as_object)
}

/// Mutable variant of [`section_map`].
pub fn section_map_mut(
    doc: &mut Map<String, Value>,
    section: Section,
) -> Option<&mut Map<String, Value>> {
    doc.get_mut(section.key()).and_then(Value::as_object_mut)
}

/// Visit every JSON object in a tree, parents before children, mutably.
pub fn for_each_object_mut<F>(value: &mut Value, visit: &mut F)
where
    F: FnMut(&mut Map<String, Value>),
{
    match value {
        Value::Object(obj) => {
            visit(obj);
            for child in obj.values_mut() {
                for_each_object_mut(child, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                for_each_object_mut(item, visit);
            }
        }
        _ => {}
    }
}
