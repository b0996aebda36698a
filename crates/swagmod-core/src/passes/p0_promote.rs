//! Pass 0: Definition Promotion
//!
//! Lifts inline, titled object and array-item schemas into top-level named
//! definitions and replaces the original site with a `$ref`. Promotion roots:
//! every schema under `definitions`/`responses`/`parameters`, plus every
//! operation's `responses` map and `parameters` array.
//!
//! A promoted schema is re-scanned before it is stored, so titled children of
//! a promoted body become definitions of their own. Title collisions are not
//! detected here — later writes overwrite earlier ones, and disambiguation is
//! the renamer's job (Pass 3).

use serde_json::{json, Map, Value};

use crate::reference::Section;
use crate::schema_utils::{section_map_mut, SchemaKind};

/// Promote every titled inline schema reachable from the promotion roots.
///
/// New definitions are collected into a staging map and merged into
/// `definitions` after the sweep, so no section map is grown while it is
/// being iterated.
pub fn promote_definitions(doc: &mut Map<String, Value>) {
    let mut staged = Map::new();

    for section in Section::ALL {
        if let Some(map) = section_map_mut(doc, section) {
            for schema in map.values_mut() {
                promote_node(schema, &mut staged);
            }
        }
    }

    if let Some(paths) = doc.get_mut("paths").and_then(Value::as_object_mut) {
        for operations in paths.values_mut() {
            let Some(operations) = operations.as_object_mut() else {
                continue;
            };
            for operation in operations.values_mut() {
                let Some(operation) = operation.as_object_mut() else {
                    continue;
                };
                if let Some(responses) = operation.get_mut("responses") {
                    promote_container(responses, &mut staged);
                }
                if let Some(parameters) = operation.get_mut("parameters") {
                    promote_container(parameters, &mut staged);
                }
            }
        }
    }

    if staged.is_empty() {
        return;
    }
    let definitions = doc
        .entry("definitions")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(definitions) = definitions.as_object_mut() {
        for (name, schema) in staged {
            definitions.insert(name, schema);
        }
    }
}

/// A container of schemas: an operation's `responses` map or `parameters`
/// array.
fn promote_container(container: &mut Value, staged: &mut Map<String, Value>) {
    match container {
        Value::Array(items) => {
            for item in items {
                promote_node(item, staged);
            }
        }
        Value::Object(map) => {
            for value in map.values_mut() {
                promote_node(value, staged);
            }
        }
        _ => {}
    }
}

fn promote_node(value: &mut Value, staged: &mut Map<String, Value>) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };
    match SchemaKind::classify(obj) {
        SchemaKind::Object => promote_properties(obj, staged),
        SchemaKind::AllOf => promote_all_of_members(obj, staged),
        SchemaKind::Reference(_) => {}
        // Response/parameter wrappers carry their schema under `schema`.
        _ => promote_schema_wrapper(obj, staged),
    }
}

fn promote_properties(obj: &mut Map<String, Value>, staged: &mut Map<String, Value>) {
    let Some(props) = obj.get_mut("properties").and_then(Value::as_object_mut) else {
        return;
    };
    for prop in props.values_mut() {
        let Some(p) = prop.as_object() else {
            continue;
        };
        match SchemaKind::classify(p) {
            SchemaKind::Object => {
                if p.contains_key("title") && p.contains_key("properties") {
                    promote_in_place(prop, staged);
                }
            }
            SchemaKind::Array => {
                let promotable = p.get("items").and_then(Value::as_object).is_some_and(|items| {
                    !items.contains_key("$ref")
                        && items.contains_key("title")
                        && items.contains_key("properties")
                });
                if promotable {
                    if let Some(items) = prop.get_mut("items") {
                        promote_in_place(items, staged);
                    }
                }
            }
            _ => {}
        }
    }
}

/// allOf members are recursed into but never promoted themselves.
fn promote_all_of_members(obj: &mut Map<String, Value>, staged: &mut Map<String, Value>) {
    let Some(members) = obj.get_mut("allOf").and_then(Value::as_array_mut) else {
        return;
    };
    for member in members {
        let inline_object = member
            .as_object()
            .is_some_and(|m| !m.contains_key("$ref") && m.contains_key("properties"));
        if inline_object {
            promote_node(member, staged);
        }
    }
}

fn promote_schema_wrapper(obj: &mut Map<String, Value>, staged: &mut Map<String, Value>) {
    let promotable = obj.get("schema").and_then(Value::as_object).is_some_and(|s| {
        !s.contains_key("$ref") && s.contains_key("title") && s.contains_key("properties")
    });
    if promotable {
        if let Some(slot) = obj.get_mut("schema") {
            promote_in_place(slot, staged);
        }
    }
}

/// Replace `slot` with a `$ref` to its title and stage the moved body as a
/// new definition, re-scanning the body first for nested promotable schemas.
fn promote_in_place(slot: &mut Value, staged: &mut Map<String, Value>) {
    let title = slot
        .as_object()
        .and_then(|o| o.get("title"))
        .and_then(Value::as_str)
        .map(str::to_owned);
    let Some(title) = title else {
        return;
    };
    if title.is_empty() {
        return;
    }
    let reference = json!({ "$ref": format!("#/definitions/{title}") });
    let mut body = std::mem::replace(slot, reference);
    promote_node(&mut body, staged);
    staged.insert(title, body);
}

// ===========================================================================
// Tests
// ===========================================================================
