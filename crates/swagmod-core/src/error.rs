//! Error types for document modification.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModifyError {
    #[error("document root is not a JSON object")]
    NotAnObject,

    #[error("malformed $ref at {path}: {reference}")]
    MalformedRef { path: String, reference: String },

    #[error("dangling $ref at {path}: {reference}")]
    DanglingRef { path: String, reference: String },

    #[error("rename collision on {name}: already claimed by {first}, also wanted by {second}")]
    RenameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("conflicting rename rules for {reference}: {first} vs {second}")]
    ConflictingRename {
        reference: String,
        first: String,
        second: String,
    },
}
