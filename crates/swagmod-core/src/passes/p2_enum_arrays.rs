//! Pass 2: Enum Array Deduplication
//!
//! Definitions shaped `{type: "array", items: {enum: [...]}}` describe the
//! same enum once per wrapper, which makes generators mint a fresh model for
//! every use. This pass runs in two phases:
//!
//! 1. **Scan** `definitions` for array-of-enum candidates, caching each
//!    candidate's enum values and array-level metadata up front.
//! 2. **Rewrite** every reference to a candidate, anywhere in the document:
//!    the call site becomes the array wrapper itself (metadata copied from
//!    the original unless already present — the call-site value wins), with
//!    `items` pointing at a shared `<Name>Enum` definition carrying just
//!    `{type: "string", enum: [...]}`. Originals that were rewritten at
//!    least once are deleted; the shared definitions are appended.
//!
//! Caching every candidate before any deletion means a reference can never
//! observe a deleted original without a generated shape — the latent
//! ordering bug of the one-pass design cannot occur here.

use indexmap::{IndexMap, IndexSet};
use serde_json::{json, Map, Value};

use crate::reference::{Reference, Section};
use crate::schema_utils::section_map;

const ARRAY_METADATA: &[&str] = &["description", "minItems", "maxItems", "example"];

/// An array-of-enum definition captured during the scan phase.
struct Candidate {
    enum_values: Value,
    metadata: Map<String, Value>,
}

impl Candidate {
    fn detect(schema: &Value) -> Option<Self> {
        let obj = schema.as_object()?;
        if obj.get("type").and_then(Value::as_str) != Some("array") {
            return None;
        }
        let items = obj.get("items")?.as_object()?;
        let enum_values = items.get("enum")?;
        enum_values.as_array()?;
        let mut metadata = Map::new();
        for key in ARRAY_METADATA {
            if let Some(value) = obj.get(*key) {
                metadata.insert((*key).to_string(), value.clone());
            }
        }
        Some(Self {
            enum_values: enum_values.clone(),
            metadata,
        })
    }
}

pub fn share_enum_arrays(doc: &mut Map<String, Value>) {
    let mut candidates: IndexMap<String, Candidate> = IndexMap::new();
    if let Some(definitions) = section_map(doc, Section::Definitions) {
        for (name, schema) in definitions {
            if let Some(candidate) = Candidate::detect(schema) {
                candidates.insert(name.clone(), candidate);
            }
        }
    }
    if candidates.is_empty() {
        return;
    }

    // Shared definitions created on first rewrite, keyed by generated name.
    let mut generated: IndexMap<String, Value> = IndexMap::new();
    // Originals rewritten at least once; deleted after the walk.
    let mut replaced: IndexSet<String> = IndexSet::new();

    let keys: Vec<String> = doc.keys().cloned().collect();
    for key in keys {
        if let Some(value) = doc.get_mut(&key) {
            rewrite(value, &candidates, &mut generated, &mut replaced);
        }
    }

    if let Some(definitions) = doc
        .get_mut(Section::Definitions.key())
        .and_then(Value::as_object_mut)
    {
        for name in &replaced {
            definitions.shift_remove(name.as_str());
            tracing::debug!(definition = name.as_str(), "replaced array-of-enum definition");
        }
        for (name, schema) in generated {
            definitions.insert(name, schema);
        }
    }
}

fn rewrite(
    value: &mut Value,
    candidates: &IndexMap<String, Candidate>,
    generated: &mut IndexMap<String, Value>,
    replaced: &mut IndexSet<String>,
) {
    match value {
        Value::Array(items) => {
            for item in items {
                rewrite(item, candidates, generated, replaced);
            }
        }
        Value::Object(obj) => {
            let target = obj
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(Reference::parse)
                .filter(|r| r.section == Section::Definitions);
            if let Some(reference) = target {
                if let Some(candidate) = candidates.get(&reference.name) {
                    rewrite_call_site(obj, &reference.name, candidate, generated);
                    replaced.insert(reference.name);
                    return;
                }
            }
            for child in obj.values_mut() {
                rewrite(child, candidates, generated, replaced);
            }
        }
        _ => {}
    }
}

fn rewrite_call_site(
    obj: &mut Map<String, Value>,
    name: &str,
    candidate: &Candidate,
    generated: &mut IndexMap<String, Value>,
) {
    let enum_name = format!("{name}Enum");

    obj.remove("$ref");
    // Array-level metadata: the call-site value wins over the original's.
    for (key, value) in &candidate.metadata {
        if !obj.contains_key(key) {
            obj.insert(key.clone(), value.clone());
        }
    }
    obj.insert("type".to_string(), json!("array"));
    obj.insert(
        "items".to_string(),
        json!({ "$ref": format!("#/definitions/{enum_name}") }),
    );

    generated
        .entry(enum_name)
        .or_insert_with(|| json!({ "type": "string", "enum": candidate.enum_values.clone() }));
}

// ===========================================================================
// Tests
// ===========================================================================
