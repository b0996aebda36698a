//! Pass 4: Unused Definition Pruning
//!
//! Drops every entry of `definitions`, `parameters` and `responses` that no
//! operation reaches, using the reference set the renamer accumulated.
//! Surviving entries keep their relative order.

use indexmap::IndexSet;
use serde_json::{Map, Value};

use crate::reference::{Reference, Section};

/// Result of running the pruning pass.
#[derive(Debug, Default)]
pub struct PrunePassResult {
    /// Removed entries, in document order per section.
    pub removed: Vec<Reference>,
}

pub fn prune_unused(doc: &mut Map<String, Value>, refs: &IndexSet<Reference>) -> PrunePassResult {
    let mut result = PrunePassResult::default();

    for section in Section::ALL {
        let Some(map) = doc.get_mut(section.key()).and_then(Value::as_object_mut) else {
            continue;
        };
        let unused: Vec<String> = map
            .keys()
            .filter(|name| !refs.contains(&Reference::new(section, name.as_str())))
            .cloned()
            .collect();
        for name in unused {
            map.shift_remove(name.as_str());
            let removed = Reference::new(section, name);
            tracing::debug!(reference = %removed, "pruned unused entry");
            result.removed.push(removed);
        }
    }

    result
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
    fn test_unreferenced_definitions_removed() {
        let mut doc = json!({
            "definitions": {
                "Used": { "type": "object" },
                "Unused": { "type": "object" }
            }
        });
        let result = prune_unused(
            doc.as_object_mut().unwrap(),
            &refs(&["#/definitions/Used"]),
        );

        assert!(doc["definitions"].get("Used").is_some());
        assert!(doc["definitions"].get("Unused").is_none());
        assert_eq!(
            result.removed,
            vec![Reference::parse("#/definitions/Unused").unwrap()]
        );
    }

    #[test]
    fn test_all_sections_pruned() {
        let mut doc = json!({
            "definitions": { "D": {} },
            "parameters": { "P": {} },
            "responses": { "R": {} }
        });
        let result = prune_unused(doc.as_object_mut().unwrap(), &IndexSet::new());

        assert_eq!(doc["definitions"], json!({}));
        assert_eq!(doc["parameters"], json!({}));
        assert_eq!(doc["responses"], json!({}));
        assert_eq!(result.removed.len(), 3);
    }

    #[test]
    fn test_section_mismatch_does_not_retain() {
        // A definitions ref must not keep a same-named response alive.
        let mut doc = json!({
            "definitions": { "Shared": {} },
            "responses": { "Shared": {} }
        });
        prune_unused(
            doc.as_object_mut().unwrap(),
            &refs(&["#/definitions/Shared"]),
        );

        assert!(doc["definitions"].get("Shared").is_some());
        assert!(doc["responses"].get("Shared").is_none());
    }

    #[test]
    fn test_survivor_order_preserved() {
        let mut doc = json!({
            "definitions": {
                "A": {}, "B": {}, "C": {}, "D": {}
            }
        });
        prune_unused(
            doc.as_object_mut().unwrap(),
            &refs(&["#/definitions/D", "#/definitions/B"]),
        );

        let keys: Vec<&String> = doc["definitions"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["B", "D"]);
    }

    #[test]
    fn test_missing_sections_tolerated() {
        let mut doc = json!({ "swagger": "2.0" });
        let result = prune_unused(doc.as_object_mut().unwrap(), &IndexSet::new());
        assert!(result.removed.is_empty());
        assert_eq!(doc, json!({ "swagger": "2.0" }));
    }
}
