//! Pass 1: Additional-Properties Normalization
//!
//! Two independent rewrites over every schema node under `definitions`,
//! `responses` and `parameters`:
//!
//! 1. A node keyed literally `Dictionaries` (a structural marker, not a JSON
//!    Schema keyword) has every property reshaped from a bare `$ref` into a
//!    typed collection: `{type: "array", items: {$ref: ...}}`.
//! 2. A node declaring `additionalProperties` alongside `properties` gets the
//!    declaration copied into the `properties` map under the literal key
//!    `additionalProperties` — a workaround for generators that drop sibling
//!    `additionalProperties`. The original key is kept.
//!
//! Malformed nodes are skipped silently; this pass has no error conditions.

use serde_json::{json, Map, Value};

use crate::reference::Section;

pub fn normalize_additional_properties(doc: &mut Map<String, Value>) {
    for section in Section::ALL {
        if let Some(value) = doc.get_mut(section.key()) {
            walk(value);
        }
    }
}

fn walk(value: &mut Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                walk(item);
            }
        }
        Value::Object(obj) => {
            let has_properties = obj.contains_key("properties");
            if has_properties {
                if let Some(additional) = obj.get("additionalProperties").cloned() {
                    if let Some(props) = obj.get_mut("properties").and_then(Value::as_object_mut) {
                        props.insert("additionalProperties".to_string(), additional);
                    }
                }
            }
            for (key, child) in obj.iter_mut() {
                match key.as_str() {
                    "Dictionaries" => reshape_dictionaries(child),
                    // Already copied above; a sibling declaration is not
                    // descended into again.
                    "additionalProperties" if has_properties => {}
                    _ => walk(child),
                }
            }
        }
        _ => {}
    }
}

/// Turn every `$ref`-valued property of a `Dictionaries` node into an array
/// of that reference.
fn reshape_dictionaries(node: &mut Value) {
    let Some(props) = node
        .get_mut("properties")
        .and_then(Value::as_object_mut)
    else {
        return;
    };
    for prop in props.values_mut() {
        let Some(obj) = prop.as_object_mut() else {
            continue;
        };
        let Some(target) = obj.remove("$ref") else {
            continue;
        };
        obj.insert("type".to_string(), json!("array"));
        obj.insert("items".to_string(), json!({ "$ref": target }));
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(doc: Value) -> Value {
        let Value::Object(mut map) = doc else {
            panic!("test doc must be an object")
        };
        normalize_additional_properties(&mut map);
        Value::Object(map)
    }

    #[test]
    fn test_dictionaries_properties_become_arrays() {
        let doc = run(json!({
            "definitions": {
                "Dictionaries": {
                    "type": "object",
                    "properties": {
                        "countries": { "$ref": "#/definitions/Country" },
                        "currencies": { "$ref": "#/definitions/Currency" }
                    }
                }
            }
        }));

        let props = &doc["definitions"]["Dictionaries"]["properties"];
        assert_eq!(
            props["countries"],
            json!({ "type": "array", "items": { "$ref": "#/definitions/Country" } })
        );
        assert_eq!(
            props["currencies"],
            json!({ "type": "array", "items": { "$ref": "#/definitions/Currency" } })
        );
    }

    #[test]
    fn test_dictionaries_non_ref_property_skipped() {
        let doc = run(json!({
            "definitions": {
                "Dictionaries": {
                    "properties": {
                        "inline": { "type": "string" }
                    }
                }
            }
        }));

        assert_eq!(
            doc["definitions"]["Dictionaries"]["properties"]["inline"],
            json!({ "type": "string" })
        );
    }

    #[test]
    fn test_sibling_additional_properties_copied() {
        let doc = run(json!({
            "definitions": {
                "Mixed": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" }
                    },
                    "additionalProperties": { "type": "integer" }
                }
            }
        }));

        let mixed = &doc["definitions"]["Mixed"];
        // Copied under the literal key...
        assert_eq!(
            mixed["properties"]["additionalProperties"],
            json!({ "type": "integer" })
        );
        // ...and the original declaration is kept.
        assert_eq!(mixed["additionalProperties"], json!({ "type": "integer" }));
    }

    #[test]
    fn test_additional_properties_without_siblings_untouched() {
        let input = json!({
            "definitions": {
                "Lookup": {
                    "type": "object",
                    "additionalProperties": { "type": "string" }
                }
            }
        });
        assert_eq!(run(input.clone()), input);
    }

    #[test]
    fn test_nested_rewrites_inside_responses() {
        let doc = run(json!({
            "responses": {
                "Wrapped": {
                    "schema": {
                        "type": "object",
                        "properties": {
                            "tags": { "type": "string" }
                        },
                        "additionalProperties": { "type": "string" }
                    }
                }
            }
        }));

        assert_eq!(
            doc["responses"]["Wrapped"]["schema"]["properties"]["additionalProperties"],
            json!({ "type": "string" })
        );
    }

    #[test]
    fn test_boolean_additional_properties_copied_verbatim() {
        // `additionalProperties: false` is a legal declaration; the copy is
        // duck-typed and carries it over unchanged.
        let doc = run(json!({
            "definitions": {
                "Closed": {
                    "properties": { "a": { "type": "string" } },
                    "additionalProperties": false
                }
            }
        }));

        assert_eq!(
            doc["definitions"]["Closed"]["properties"]["additionalProperties"],
            json!(false)
        );
    }
}
