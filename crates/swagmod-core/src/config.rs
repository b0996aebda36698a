//! Configuration: the rename-mapping file and engine options.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Prefix/suffix fragments applied to referenced model names.
///
/// `input_suffix` is additionally appended to names referenced only from
/// request parameters, so request and response variants of a model can be
/// generated as distinct types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenameRule {
    pub prefix: String,
    pub suffix: String,
    pub input_suffix: String,
}

impl RenameRule {
    /// Field-wise concatenation: `self` (the global rule) first, then `other`
    /// (the per-operation override) appended.
    pub fn concat(&self, other: &RenameRule) -> RenameRule {
        RenameRule {
            prefix: format!("{}{}", self.prefix, other.prefix),
            suffix: format!("{}{}", self.suffix, other.suffix),
            input_suffix: format!("{}{}", self.input_suffix, other.input_suffix),
        }
    }

    /// Idempotence guard: does `name` already carry this rule's fragments?
    ///
    /// Empty fragments impose no constraint, so an all-empty rule matches
    /// every name (the rename becomes a record-only walk).
    pub(crate) fn already_applied(&self, name: &str) -> bool {
        let prefix_ok = self.prefix.is_empty() || name.starts_with(&self.prefix);
        let suffix_ok = self.suffix.is_empty()
            || name.ends_with(&self.suffix)
            || (!self.input_suffix.is_empty() && name.ends_with(&self.input_suffix));
        prefix_ok && suffix_ok
    }
}

/// The rename-mapping config file: optional global fragments plus
/// per-path per-method overrides.
///
/// ## Serialization format
///
/// Top-level keys `prefix`, `suffix`, `inputSuffix` and `packageName` are
/// reserved; every other key is treated as an API path mapping HTTP methods
/// to [`RenameRule`] overrides:
///
/// ```json
/// {
///   "prefix": "FOS",
///   "inputSuffix": "Input",
///   "/search": { "get": { "suffix": "Search" } }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenameMapping {
    pub prefix: String,
    pub suffix: String,
    pub input_suffix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(flatten)]
    pub paths: IndexMap<String, IndexMap<String, RenameRule>>,
}

impl RenameMapping {
    fn global_rule(&self) -> RenameRule {
        RenameRule {
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            input_suffix: self.input_suffix.clone(),
        }
    }

    /// The rule in effect for one operation: global fragments with the
    /// per-operation override concatenated (not replaced).
    pub fn effective_rule(&self, path: &str, method: &str) -> RenameRule {
        let global = self.global_rule();
        match self.paths.get(path).and_then(|methods| methods.get(method)) {
            Some(op) => global.concat(op),
            None => global,
        }
    }
}

/// How the engine reacts to structural anomalies (dangling refs, malformed
/// pointers, conflicting rename rules).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Skip the anomalous node with a warning (the original tool's behavior).
    #[default]
    Lenient,
    /// Abort the run on the first anomaly.
    Strict,
}

/// Options for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ModifyOptions {
    pub mode: Mode,
}
