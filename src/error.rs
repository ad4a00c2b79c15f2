//! Error types for the mesh-swap engine.

use crate::host::{GroupId, ObjectId};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using SwapError.
pub type Result<T> = std::result::Result<T, SwapError>;

/// Main error type for mesh-swap operations.
#[derive(Error, Debug)]
pub enum SwapError {
    /// The selection contains no mesh objects.
    #[error("No mesh objects selected")]
    NoSelection,

    /// The asset library file is not at the resolved path.
    #[error("Mesh swap library not found: {}", .0.display())]
    LibraryMissing(PathBuf),

    /// The canonical name is not in any swap category.
    #[error("No swap category for '{0}'")]
    UnknownSwapName(String),

    /// Appending or linking a library asset failed.
    #[error("Failed to load '{name}' from library: {reason}")]
    AssetLoadFailed { name: String, reason: String },

    /// A host object handle no longer resolves.
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// A group handle does not refer to a linked group definition.
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// A mesh operation was asked of an object without mesh data.
    #[error("Object {0} is not a mesh")]
    NotAMesh(ObjectId),

    /// The swap category table is malformed.
    #[error("Invalid swap table: {0}")]
    InvalidSwapTable(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
