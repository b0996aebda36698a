//! Pass 5: Generator Config Emission
//!
//! Derives an OpenAPI-generator configuration document from the final
//! reference set. Generators lowercase and de-punctuate model names, so the
//! config maps each name's normalized form back to the exact renamed name via
//! `additionalProperties.customNames`.
//!
//! When a pre-existing config is supplied it is used as the base and only the
//! managed keys are overlaid; anything else the user put there survives the
//! rewrite. A base that is not a JSON object is discarded in favor of the
//! default shape.

use indexmap::IndexSet;
use serde_json::{json, Map, Value};

use crate::reference::Reference;

/// Build the generator config for `refs`, overlaying onto `existing` when
/// given.
pub fn generator_config(
    refs: &IndexSet<Reference>,
    existing: Option<Value>,
    package_name: Option<&str>,
) -> Value {
    let mut config = match existing {
        Some(Value::Object(obj)) => obj,
        Some(_) => {
            tracing::warn!("existing generator config is not an object; starting fresh");
            Map::new()
        }
        None => Map::new(),
    };

    let additional = config
        .entry("additionalProperties")
        .or_insert_with(|| Value::Object(Map::new()));
    if !additional.is_object() {
        *additional = Value::Object(Map::new());
    }
    let additional = additional.as_object_mut().unwrap();

    for (key, default) in [
        ("generateAliasAsModel", json!(true)),
        ("modelDocs", json!(false)),
        ("apiDocs", json!(false)),
    ] {
        additional.entry(key).or_insert(default);
    }
    if let Some(package_name) = package_name {
        additional.insert("packageName".to_string(), json!(package_name));
    }

    let mut custom_names = Map::new();
    for reference in refs {
        custom_names.insert(camelize(&reference.name), json!(reference.name));
    }
    additional.insert("customNames".to_string(), Value::Object(custom_names));

    Value::Object(config)
}

/// Lowercase the name, then collapse each run of non-alphanumerics by
/// uppercasing the character that follows it.
pub(crate) fn camelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut boundary = false;
    let mut last_separator = None;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if boundary {
                out.extend(c.to_uppercase());
                boundary = false;
            } else {
                out.push(c);
            }
        } else {
            boundary = true;
            last_separator = Some(c);
        }
    }
    // A trailing separator run has no character to uppercase; keep one.
    if boundary {
        if let Some(c) = last_separator {
            out.push(c);
        }
    }
    out
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn refs(raw: &[&str]) -> IndexSet<Reference> {
        raw.iter().map(|r| Reference::parse(r).unwrap()).collect()
    }

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("FOSCriteria"), "foscriteria");
        assert_eq!(camelize("my-model"), "myModel");
        assert_eq!(camelize("My_Big__Model"), "myBigModel");
        assert_eq!(camelize("plain"), "plain");
        assert_eq!(camelize(""), "");
    }

    #[test]
    fn test_fresh_config_shape() {
        let config = generator_config(
            &refs(&["#/definitions/FOSCriteria", "#/responses/Error-Body"]),
            None,
            None,
        );

        assert_eq!(
            config,
            json!({
                "additionalProperties": {
                    "generateAliasAsModel": true,
                    "modelDocs": false,
                    "apiDocs": false,
                    "customNames": {
                        "foscriteria": "FOSCriteria",
                        "errorBody": "Error-Body"
                    }
                }
            })
        );
    }

    #[test]
    fn test_package_name_overlaid() {
        let config = generator_config(&IndexSet::new(), None, Some("fos-client"));
        assert_eq!(
            config["additionalProperties"]["packageName"],
            json!("fos-client")
        );
    }

    #[test]
    fn test_existing_config_preserved() {
        let existing = json!({
            "library": "reqwest",
            "additionalProperties": {
                "modelDocs": true,
                "extra": "kept"
            }
        });
        let config = generator_config(&refs(&["#/definitions/A"]), Some(existing), None);

        // Unmanaged keys survive; existing managed values are not clobbered.
        assert_eq!(config["library"], json!("reqwest"));
        assert_eq!(config["additionalProperties"]["extra"], json!("kept"));
        assert_eq!(config["additionalProperties"]["modelDocs"], json!(true));
        // customNames is always regenerated.
        assert_eq!(
            config["additionalProperties"]["customNames"],
            json!({ "a": "A" })
        );
    }

    #[test]
    fn test_non_object_existing_discarded() {
        let config = generator_config(&IndexSet::new(), Some(json!([1, 2])), None);
        assert_eq!(
            config["additionalProperties"]["generateAliasAsModel"],
            json!(true)
        );
    }
}
