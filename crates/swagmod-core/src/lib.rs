//! Core engine for rewriting bundled OpenAPI/Swagger v2 documents into
//! shapes that code generators handle well.
//!
//! [`modify`] runs the full pipeline over an in-memory document:
//!
//! 1. promote inline titled schemas into named definitions,
//! 2. normalize the `Dictionaries` marker and sibling `additionalProperties`,
//! 3. deduplicate array-of-enum definitions into shared `<Name>Enum` models,
//! 4. rename referenced models per operation (prefix/suffix/inputSuffix),
//! 5. prune definitions no operation reaches.
//!
//! [`generator_config`] then derives the optional generator side-config from
//! the surviving reference set.
//!
//! ```
//! use serde_json::json;
//! use swagmod_core::{modify, ModifyOptions};
//!
//! let doc = json!({
//!     "swagger": "2.0",
//!     "definitions": { "Criteria": { "type": "object" } },
//!     "paths": {
//!         "/search": {
//!             "get": {
//!                 "parameters": [
//!                     { "in": "body", "schema": { "$ref": "#/definitions/Criteria" } }
//!                 ]
//!             }
//!         }
//!     }
//! });
//! let result = modify(&doc, None, &ModifyOptions::default()).unwrap();
//! assert!(result.document["definitions"]["Criteria"].is_object());
//! ```

mod config;
mod error;
mod passes;
mod reference;
mod schema_utils;

use indexmap::IndexSet;
use serde_json::Value;

pub use config::{Mode, ModifyOptions, RenameMapping, RenameRule};
pub use error::ModifyError;
pub use passes::p5_generator_config::generator_config;
pub use reference::{Reference, Section};

use schema_utils::for_each_object_mut;

/// Outcome of one pipeline run.
#[derive(Debug)]
pub struct ModifyResult {
    /// The rewritten document.
    pub document: Value,
    /// Every reference some operation uses, first-seen order.
    pub refs: IndexSet<Reference>,
    /// Entries removed by the pruner.
    pub pruned: Vec<Reference>,
}

/// Run the full rewriting pipeline over a bundled document.
///
/// The input is not mutated; the rewritten document is returned in
/// [`ModifyResult`]. `mapping` is the optional rename-mapping config; without
/// one the renamer still records references so pruning stays sound.
pub fn modify(
    document: &Value,
    mapping: Option<&RenameMapping>,
    options: &ModifyOptions,
) -> Result<ModifyResult, ModifyError> {
    let Value::Object(mut doc) = document.clone() else {
        return Err(ModifyError::NotAnObject);
    };

    tracing::debug!("promoting inline titled schemas");
    passes::p0_promote::promote_definitions(&mut doc);

    tracing::debug!("normalizing additionalProperties shapes");
    passes::p1_dictionaries::normalize_additional_properties(&mut doc);

    tracing::debug!("deduplicating array-of-enum definitions");
    passes::p2_enum_arrays::share_enum_arrays(&mut doc);

    tracing::debug!("renaming referenced models");
    let renamed = passes::p3_rename::rename_refs(&mut doc, mapping, options)?;

    tracing::debug!(refs = renamed.refs.len(), "pruning unreachable entries");
    let pruned = passes::p4_prune::prune_unused(&mut doc, &renamed.refs);

    let mut document = Value::Object(doc);
    verify_referential_closure(&mut document, options)?;

    Ok(ModifyResult {
        document,
        refs: renamed.refs,
        pruned: pruned.removed,
    })
}

/// Post-condition check: every section-shaped `$ref` left in the document
/// points at an existing entry. Strict mode fails the run; lenient mode warns
/// per dangling reference.
fn verify_referential_closure(
    document: &mut Value,
    options: &ModifyOptions,
) -> Result<(), ModifyError> {
    let mut used: Vec<Reference> = Vec::new();
    for_each_object_mut(document, &mut |obj| {
        if let Some(reference) = obj
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(Reference::parse)
        {
            used.push(reference);
        }
    });

    let root = document.as_object().ok_or(ModifyError::NotAnObject)?;
    for reference in used {
        let exists = schema_utils::section_map(root, reference.section)
            .is_some_and(|section| section.contains_key(&reference.name));
        if exists {
            continue;
        }
        match options.mode {
            Mode::Strict => {
                return Err(ModifyError::DanglingRef {
                    path: reference.to_string(),
                    reference: reference.to_string(),
                })
            }
            Mode::Lenient => {
                tracing::warn!(reference = %reference, "output still contains a dangling $ref");
            }
        }
    }
    Ok(())
}
