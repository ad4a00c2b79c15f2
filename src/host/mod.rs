//! The host scene API the swap engine runs against.
//!
//! The engine never touches scene data directly. Everything goes through the
//! [`Host`] trait, which a content-creation application (or the in-memory
//! [`MemoryScene`]) implements.

pub mod geometry;
pub mod memory;

pub use geometry::{Mesh, Polygon};
pub use memory::{GroupDefinition, MemoryLibrary, MemoryScene, ObjectData, SceneObject};

use crate::error::Result;
use glam::Mat4;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Handle to a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a group definition in host data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u32);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "group #{}", self.0)
    }
}

/// Result of linking a group definition from a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedGroup {
    /// The long-lived group definition.
    pub group: GroupId,
    /// Instance object the host placed as a side effect of linking, if any.
    pub transient: Option<ObjectId>,
}

/// Severity of a message sent to the host's report channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    Info,
    Warning,
    Error,
}

/// Scene operations the swap engine needs from its host.
pub trait Host {
    /// Selected objects, in selection order.
    fn selected_objects(&self) -> Vec<ObjectId>;

    /// Name of an object.
    fn object_name(&self, object: ObjectId) -> Option<&str>;

    /// Mesh data of a mesh object. `None` for non-mesh or missing objects.
    fn mesh(&self, object: ObjectId) -> Option<&Mesh>;

    /// Whether the object is a mesh object.
    fn is_mesh(&self, object: ObjectId) -> bool {
        self.mesh(object).is_some()
    }

    /// World transform of an object.
    fn transform(&self, object: ObjectId) -> Option<Mat4>;

    /// Replace the world transform of an object.
    fn set_transform(&mut self, object: ObjectId, transform: Mat4) -> Result<()>;

    /// Remove an object from the scene.
    fn delete_object(&mut self, object: ObjectId) -> Result<()>;

    /// Append a named object from a library file into the scene.
    fn append_object(&mut self, library: &Path, name: &str) -> Result<ObjectId>;

    /// Link a named group definition from a library file.
    fn link_group(&mut self, library: &Path, name: &str) -> Result<LinkedGroup>;

    /// Place an instance of a group definition.
    fn instance_group(&mut self, group: GroupId, transform: Mat4) -> Result<ObjectId>;

    /// Duplicate an object, returning the copy.
    fn duplicate_object(&mut self, object: ObjectId) -> Result<ObjectId>;

    /// Make an object the active object, or clear the active object.
    fn set_active(&mut self, object: Option<ObjectId>);

    /// Clear the selection.
    fn deselect_all(&mut self);

    /// Join `others` into `root`. The joined objects are removed from the scene.
    fn join(&mut self, root: ObjectId, others: &[ObjectId]) -> Result<()>;

    /// Resolve a user-supplied path. `//`-prefixed paths are document-relative.
    fn resolve_path(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }

    /// Whether a library file exists at `path`.
    fn library_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Send a message to the user through the host's report channel.
    fn report(&mut self, level: ReportLevel, message: &str);
}
