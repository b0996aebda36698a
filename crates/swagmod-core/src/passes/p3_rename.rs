//! Pass 3: Reference Renaming
//!
//! Applies per-operation prefix/suffix fragments to every referenced
//! definition/parameter/response name and records the set of references each
//! operation actually uses (the pruner's input).
//!
//! The pass runs in two phases to keep mutation out of the traversal:
//!
//! 1. **Resolve** — a read-only walk over every operation's `responses` and
//!    `parameters`, following references into the named sections. It builds
//!    an explicit rename table (original reference → new name), a claims map
//!    (new reference → the original that claimed it, which is what makes
//!    collisions between *different* originals decidable) and the ordered,
//!    deduplicated `refs` accumulator.
//! 2. **Apply** — rewrite every `$ref` string in the document through the
//!    table, then rebuild each section map with renamed keys in the original
//!    insertion order.
//!
//! Name resolution for one reference:
//!
//! * Already-renamed names (idempotence guard, see
//!   [`RenameRule::already_applied`]) keep their name, but are still recorded
//!   and their targets still walked so pruning stays sound on re-runs and
//!   under an empty mapping.
//! * Parameter references get `input_suffix` appended unless the same
//!   original already claimed the plain composite, so models shared between
//!   requests and responses keep one name while parameter-only models get
//!   the input variant.
//! * A composite claimed by a different original is disambiguated with
//!   `input_suffix`; an unresolvable collision is always an error — silently
//!   merging two models is never safe.
//! * A second operation computing a different name for an already-renamed
//!   original keeps the first mapping (warn in lenient mode, error in
//!   strict mode).

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use crate::config::{Mode, ModifyOptions, RenameMapping, RenameRule};
use crate::error::ModifyError;
use crate::reference::{Reference, Section};

/// Result of running the renaming pass.
#[derive(Debug)]
pub struct RenamePassResult {
    /// Every reference used by some operation after renaming, first-seen
    /// order, deduplicated on insert.
    pub refs: IndexSet<Reference>,
}

/// Where a walk started; parameters additionally carry the input suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefSite {
    Response,
    Parameter,
}

pub fn rename_refs(
    doc: &mut Map<String, Value>,
    mapping: Option<&RenameMapping>,
    options: &ModifyOptions,
) -> Result<RenamePassResult, ModifyError> {
    let outcome = resolve(doc, mapping, options)?;
    apply(doc, &outcome.renames);
    Ok(RenamePassResult { refs: outcome.refs })
}

// ---------------------------------------------------------------------------
// Phase 1: resolve
// ---------------------------------------------------------------------------

struct ResolveOutcome {
    renames: IndexMap<Reference, String>,
    refs: IndexSet<Reference>,
}

/// Traversal state threaded through the resolve walk, scoped to one run.
struct RenameContext<'a> {
    doc: &'a Map<String, Value>,
    options: &'a ModifyOptions,
    renames: IndexMap<Reference, String>,
    claims: IndexMap<Reference, Reference>,
    refs: IndexSet<Reference>,
    visited: IndexSet<Reference>,
}

fn resolve(
    doc: &Map<String, Value>,
    mapping: Option<&RenameMapping>,
    options: &ModifyOptions,
) -> Result<ResolveOutcome, ModifyError> {
    let mut ctx = RenameContext {
        doc,
        options,
        renames: IndexMap::new(),
        claims: IndexMap::new(),
        refs: IndexSet::new(),
        visited: IndexSet::new(),
    };

    let Some(paths) = doc.get("paths").and_then(Value::as_object) else {
        return Ok(ctx.into_outcome());
    };
    for (path, operations) in paths {
        let Some(operations) = operations.as_object() else {
            continue;
        };
        for (method, operation) in operations {
            let Some(operation) = operation.as_object() else {
                continue;
            };
            let rule = mapping
                .map(|m| m.effective_rule(path, method))
                .unwrap_or_default();
            if let Some(responses) = operation.get("responses") {
                let at = format!("#/paths/{path}/{method}/responses");
                ctx.resolve_tree(responses, &rule, RefSite::Response, &at)?;
            }
            if let Some(parameters) = operation.get("parameters") {
                let at = format!("#/paths/{path}/{method}/parameters");
                ctx.resolve_tree(parameters, &rule, RefSite::Parameter, &at)?;
            }
        }
    }
    Ok(ctx.into_outcome())
}

impl RenameContext<'_> {
    fn into_outcome(self) -> ResolveOutcome {
        ResolveOutcome {
            renames: self.renames,
            refs: self.refs,
        }
    }

    fn resolve_tree(
        &mut self,
        node: &Value,
        rule: &RenameRule,
        site: RefSite,
        at: &str,
    ) -> Result<(), ModifyError> {
        match node {
            Value::Object(obj) => {
                if let Some(raw) = obj.get("$ref").and_then(Value::as_str) {
                    self.resolve_ref(raw, rule, site, at)?;
                }
                for (key, child) in obj {
                    if key == "$ref" {
                        continue;
                    }
                    let child_at = format!("{at}/{key}");
                    self.resolve_tree(child, rule, site, &child_at)?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let child_at = format!("{at}/{index}");
                    self.resolve_tree(item, rule, site, &child_at)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn resolve_ref(
        &mut self,
        raw: &str,
        rule: &RenameRule,
        site: RefSite,
        at: &str,
    ) -> Result<(), ModifyError> {
        let Some(original) = Reference::parse(raw) else {
            return self.malformed(at, raw);
        };

        // Idempotence guard: the name already carries this rule's fragments.
        // Record it and walk its target anyway so the pruner sees the full
        // transitive closure.
        if rule.already_applied(&original.name) {
            self.claims
                .entry(original.clone())
                .or_insert_with(|| original.clone());
            self.refs.insert(original.clone());
            return self.resolve_target(&original, rule, site);
        }

        let base = format!("{}{}{}", rule.prefix, original.name, rule.suffix);
        let mut new_name = base.clone();

        // Parameter references get the input variant unless this original
        // already claimed the shared composite via a response walk.
        if site == RefSite::Parameter && !rule.input_suffix.is_empty() {
            let shared = Reference::new(original.section, base);
            if self.claims.get(&shared) != Some(&original) {
                new_name.push_str(&rule.input_suffix);
            }
        }

        // Collision: the composite is claimed by a different original.
        let mut new_ref = Reference::new(original.section, new_name);
        if let Some(owner) = self.claims.get(&new_ref) {
            if *owner != original {
                if rule.input_suffix.is_empty() || new_ref.name.ends_with(&rule.input_suffix) {
                    return Err(ModifyError::RenameCollision {
                        name: new_ref.name,
                        first: owner.to_string(),
                        second: original.to_string(),
                    });
                }
                let disambiguated = format!("{}{}", new_ref.name, rule.input_suffix);
                new_ref = Reference::new(original.section, disambiguated);
                if let Some(owner) = self.claims.get(&new_ref) {
                    if *owner != original {
                        return Err(ModifyError::RenameCollision {
                            name: new_ref.name,
                            first: owner.to_string(),
                            second: original.to_string(),
                        });
                    }
                }
            }
        }

        match self.renames.get(&original) {
            Some(existing) if *existing == new_ref.name => {}
            Some(existing) => {
                // A different operation's rule already renamed this target;
                // the first mapping wins.
                if self.options.mode == Mode::Strict {
                    return Err(ModifyError::ConflictingRename {
                        reference: original.to_string(),
                        first: existing.clone(),
                        second: new_ref.name,
                    });
                }
                let kept = Reference::new(original.section, existing.clone());
                tracing::warn!(
                    reference = %original,
                    kept = %kept,
                    wanted = %new_ref,
                    "conflicting rename rules; first mapping wins"
                );
                self.refs.insert(kept);
                return Ok(());
            }
            None => {
                self.claims.insert(new_ref.clone(), original.clone());
                self.renames.insert(original.clone(), new_ref.name.clone());
            }
        }
        self.refs.insert(new_ref);
        self.resolve_target(&original, rule, site)
    }

    /// Walk the referenced definition's body under the same rule, so nested
    /// references inherit the operation's fragments.
    fn resolve_target(
        &mut self,
        original: &Reference,
        rule: &RenameRule,
        site: RefSite,
    ) -> Result<(), ModifyError> {
        if !self.visited.insert(original.clone()) {
            return Ok(());
        }
        let body = self
            .doc
            .get(original.section.key())
            .and_then(Value::as_object)
            .and_then(|section| section.get(&original.name));
        match body {
            Some(body) => {
                let at = original.to_string();
                self.resolve_tree(body, rule, site, &at)
            }
            None => self.dangling(&original.to_string()),
        }
    }

    fn malformed(&self, at: &str, raw: &str) -> Result<(), ModifyError> {
        match self.options.mode {
            Mode::Strict => Err(ModifyError::MalformedRef {
                path: at.to_string(),
                reference: raw.to_string(),
            }),
            Mode::Lenient => {
                tracing::warn!(path = at, reference = raw, "skipping non-section $ref");
                Ok(())
            }
        }
    }

    fn dangling(&self, reference: &str) -> Result<(), ModifyError> {
        match self.options.mode {
            Mode::Strict => Err(ModifyError::DanglingRef {
                path: reference.to_string(),
                reference: reference.to_string(),
            }),
            Mode::Lenient => {
                tracing::warn!(reference, "skipping $ref with no backing definition");
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Phase 2: apply
// ---------------------------------------------------------------------------

fn apply(doc: &mut Map<String, Value>, renames: &IndexMap<Reference, String>) {
    if renames.is_empty() {
        return;
    }

    let mut table: IndexMap<String, String> = IndexMap::new();
    for (old, new_name) in renames {
        if old.name != *new_name {
            table.insert(
                old.to_string(),
                Reference::new(old.section, new_name.clone()).to_string(),
            );
        }
    }

    for value in doc.values_mut() {
        rewrite_ref_strings(value, &table);
    }

    for section in Section::ALL {
        let Some(map) = doc.get_mut(section.key()).and_then(Value::as_object_mut) else {
            continue;
        };
        let entries = std::mem::take(map);
        for (name, value) in entries {
            let old = Reference::new(section, name);
            match renames.get(&old) {
                Some(new_name) => {
                    map.insert(new_name.clone(), value);
                }
                None => {
                    map.insert(old.name, value);
                }
            }
        }
    }
}

fn rewrite_ref_strings(value: &mut Value, table: &IndexMap<String, String>) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(raw)) = obj.get_mut("$ref") {
                if let Some(renamed) = table.get(raw.as_str()) {
                    *raw = renamed.clone();
                }
            }
            for (key, child) in obj.iter_mut() {
                if key != "$ref" {
                    rewrite_ref_strings(child, table);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_ref_strings(item, table);
            }
        }
        _ => {}
    }
}

// ===========================================================================
// Tests
// ===========================================================================
