//! Typed `$ref` pointers into the named sections of a Swagger v2 document.
//!
//! Every internal reference this engine cares about has the two-segment form
//! `#/<section>/<name>` where `<section>` is one of `definitions`,
//! `parameters` or `responses`. Deeper pointers (`#/definitions/Foo/properties/bar`)
//! are valid JSON Pointers but are never produced by the rewriting passes, so
//! [`Reference::parse`] rejects them and callers fall back to leaving such
//! nodes untouched.

use std::fmt;

use serde::Serialize;

/// The three name-keyed sections a `$ref` may point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Definitions,
    Parameters,
    Responses,
}

impl Section {
    /// All sections, in the order the pipeline visits them.
    pub const ALL: [Section; 3] = [Section::Definitions, Section::Responses, Section::Parameters];

    /// The JSON key of this section in the document root.
    pub fn key(self) -> &'static str {
        match self {
            Section::Definitions => "definitions",
            Section::Parameters => "parameters",
            Section::Responses => "responses",
        }
    }

    fn from_key(key: &str) -> Option<Section> {
        match key {
            "definitions" => Some(Section::Definitions),
            "parameters" => Some(Section::Parameters),
            "responses" => Some(Section::Responses),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A parsed `#/<section>/<name>` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub section: Section,
    pub name: String,
}

impl Reference {
    pub fn new(section: Section, name: impl Into<String>) -> Self {
        Self {
            section,
            name: name.into(),
        }
    }

    /// Parse a raw `$ref` string. Returns `None` for anything that is not a
    /// two-segment pointer into a known section (external refs, deep
    /// pointers, unknown sections).
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix("#/")?;
        let (section, name) = rest.split_once('/')?;
        if name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self {
            section: Section::from_key(section)?,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#/{}/{}", self.section.key(), self.name)
    }
}

impl Serialize for Reference {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
