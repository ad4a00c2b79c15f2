//! An in-memory [`Host`] implementation.
//!
//! `MemoryScene` models just enough of a content-creation scene for the swap
//! engine: mesh objects, group instances, group definitions, selection, and
//! libraries registered by path. Scenes and libraries round-trip through JSON,
//! which is what the command-line tool reads and writes.

use super::{GroupId, Host, LinkedGroup, Mesh, ObjectId, ReportLevel};
use crate::error::{Result, SwapError};
use crate::naming::{canonical_name, unique_name};
use glam::Mat4;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Payload of a scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectData {
    /// A mesh object.
    Mesh(Mesh),
    /// An instance of a group definition (by group name).
    GroupInstance(String),
}

/// A scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    #[serde(default = "identity")]
    pub transform: Mat4,
    pub data: ObjectData,
}

fn identity() -> Mat4 {
    Mat4::IDENTITY
}

impl SceneObject {
    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            ObjectData::GroupInstance(_) => None,
        }
    }

    /// Name of the instanced group, for group-instance objects.
    pub fn instanced_group(&self) -> Option<&str> {
        match &self.data {
            ObjectData::GroupInstance(group) => Some(group),
            ObjectData::Mesh(_) => None,
        }
    }
}

/// A group definition in host data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub name: String,
    pub mesh: Mesh,
}

/// Contents of an asset library file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryLibrary {
    /// Appendable objects by name.
    #[serde(default)]
    pub objects: BTreeMap<String, Mesh>,
    /// Linkable group definitions by name.
    #[serde(default)]
    pub groups: BTreeMap<String, Mesh>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, name: impl Into<String>, mesh: Mesh) -> Self {
        self.objects.insert(name.into(), mesh);
        self
    }

    pub fn with_group(mut self, name: impl Into<String>, mesh: Mesh) -> Self {
        self.groups.insert(name.into(), mesh);
        self
    }

    /// Read a library from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// An in-memory scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryScene {
    #[serde(default)]
    objects: Vec<SceneObject>,
    #[serde(default)]
    groups: Vec<GroupDefinition>,
    #[serde(default)]
    selection: Vec<ObjectId>,
    #[serde(default)]
    active: Option<ObjectId>,
    /// Next free object id. Ids are never reused within a scene.
    #[serde(default)]
    next_id: u32,
    /// Directory of the host document, for `//` paths.
    #[serde(default)]
    document_dir: Option<PathBuf>,
    #[serde(skip)]
    libraries: HashMap<PathBuf, MemoryLibrary>,
    #[serde(skip)]
    reports: Vec<(ReportLevel, String)>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document directory used to resolve `//` paths.
    pub fn with_document_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.document_dir = Some(dir.into());
        self
    }

    /// Read a scene from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Serialize the scene to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Make a library available under a file path.
    pub fn register_library(&mut self, path: impl Into<PathBuf>, library: MemoryLibrary) {
        self.libraries.insert(path.into(), library);
    }

    /// Read a JSON library from disk and register it under its path.
    pub fn load_library_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let library = MemoryLibrary::from_file(path)?;
        self.register_library(path, library);
        Ok(())
    }

    /// Add a mesh object and return its handle.
    pub fn add_mesh_object(&mut self, name: &str, mesh: Mesh, transform: Mat4) -> ObjectId {
        self.insert_object(name, transform, ObjectData::Mesh(mesh))
    }

    /// Add an object to the selection.
    pub fn select(&mut self, object: ObjectId) {
        if self.object(object).is_some() && !self.selection.contains(&object) {
            self.selection.push(object);
        }
    }

    pub fn object(&self, object: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == object)
    }

    /// Find an object by exact name.
    pub fn object_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// All objects, in creation order.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Group definitions present in host data.
    pub fn groups(&self) -> &[GroupDefinition] {
        &self.groups
    }

    pub fn active(&self) -> Option<ObjectId> {
        self.active
    }

    /// Messages sent to the report channel.
    pub fn reports(&self) -> &[(ReportLevel, String)] {
        &self.reports
    }

    fn object_mut(&mut self, object: ObjectId) -> Result<&mut SceneObject> {
        self.objects
            .iter_mut()
            .find(|o| o.id == object)
            .ok_or(SwapError::ObjectNotFound(object))
    }

    fn allocate_id(&mut self) -> ObjectId {
        let after_existing = self.objects.iter().map(|o| o.id.0 + 1).max().unwrap_or(0);
        let id = self.next_id.max(after_existing);
        self.next_id = id + 1;
        ObjectId(id)
    }

    fn insert_object(&mut self, name: &str, transform: Mat4, data: ObjectData) -> ObjectId {
        let id = self.allocate_id();
        let name = unique_name(name, |candidate| {
            self.objects.iter().any(|o| o.name == candidate)
        });
        self.objects.push(SceneObject {
            id,
            name,
            transform,
            data,
        });
        id
    }

    fn find_group(&self, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .position(|g| g.name == name)
            .map(|index| GroupId(index as u32))
    }

    fn library(&self, path: &Path, name: &str) -> Result<&MemoryLibrary> {
        self.libraries
            .get(path)
            .ok_or_else(|| SwapError::AssetLoadFailed {
                name: name.to_string(),
                reason: format!("library {} is not loaded", path.display()),
            })
    }
}

impl Host for MemoryScene {
    fn selected_objects(&self) -> Vec<ObjectId> {
        self.selection.clone()
    }

    fn object_name(&self, object: ObjectId) -> Option<&str> {
        self.object(object).map(|o| o.name.as_str())
    }

    fn mesh(&self, object: ObjectId) -> Option<&Mesh> {
        self.object(object).and_then(SceneObject::mesh)
    }

    fn transform(&self, object: ObjectId) -> Option<Mat4> {
        self.object(object).map(|o| o.transform)
    }

    fn set_transform(&mut self, object: ObjectId, transform: Mat4) -> Result<()> {
        self.object_mut(object)?.transform = transform;
        Ok(())
    }

    fn delete_object(&mut self, object: ObjectId) -> Result<()> {
        let index = self
            .objects
            .iter()
            .position(|o| o.id == object)
            .ok_or(SwapError::ObjectNotFound(object))?;
        self.objects.remove(index);
        self.selection.retain(|&id| id != object);
        if self.active == Some(object) {
            self.active = None;
        }
        Ok(())
    }

    fn append_object(&mut self, library: &Path, name: &str) -> Result<ObjectId> {
        let mesh = self
            .library(library, name)?
            .objects
            .get(name)
            .cloned()
            .ok_or_else(|| SwapError::AssetLoadFailed {
                name: name.to_string(),
                reason: "no such object in library".to_string(),
            })?;
        Ok(self.insert_object(name, Mat4::IDENTITY, ObjectData::Mesh(mesh)))
    }

    fn link_group(&mut self, library: &Path, name: &str) -> Result<LinkedGroup> {
        let mesh = self
            .library(library, name)?
            .groups
            .get(name)
            .cloned()
            .ok_or_else(|| SwapError::AssetLoadFailed {
                name: name.to_string(),
                reason: "no such group in library".to_string(),
            })?;

        let group = match self.find_group(name) {
            Some(existing) => existing,
            None => {
                self.groups.push(GroupDefinition {
                    name: name.to_string(),
                    mesh,
                });
                GroupId(self.groups.len() as u32 - 1)
            }
        };

        // Linking drops an instance of the group at the origin
        let transient = self.instance_group(group, Mat4::IDENTITY)?;
        Ok(LinkedGroup {
            group,
            transient: Some(transient),
        })
    }

    fn instance_group(&mut self, group: GroupId, transform: Mat4) -> Result<ObjectId> {
        let name = self
            .groups
            .get(group.0 as usize)
            .map(|g| g.name.clone())
            .ok_or(SwapError::GroupNotFound(group))?;
        Ok(self.insert_object(&name, transform, ObjectData::GroupInstance(name.clone())))
    }

    fn duplicate_object(&mut self, object: ObjectId) -> Result<ObjectId> {
        let source = self
            .object(object)
            .cloned()
            .ok_or(SwapError::ObjectNotFound(object))?;
        let base = canonical_name(&source.name).to_string();
        Ok(self.insert_object(&base, source.transform, source.data))
    }

    fn set_active(&mut self, object: Option<ObjectId>) {
        self.active = object;
    }

    fn deselect_all(&mut self) {
        self.selection.clear();
    }

    fn join(&mut self, root: ObjectId, others: &[ObjectId]) -> Result<()> {
        let root_inverse = self
            .transform(root)
            .ok_or(SwapError::ObjectNotFound(root))?
            .inverse();

        let mut joined = Mesh::new();
        for &other in others.iter().filter(|&&other| other != root) {
            let object = self.object(other).ok_or(SwapError::ObjectNotFound(other))?;
            if let Some(mesh) = object.mesh() {
                let mut mesh = mesh.clone();
                mesh.transform(&(root_inverse * object.transform));
                joined.merge(&mesh);
            }
        }

        match &mut self.object_mut(root)?.data {
            ObjectData::Mesh(mesh) => mesh.merge(&joined),
            ObjectData::GroupInstance(_) => return Err(SwapError::NotAMesh(root)),
        }

        for &other in others.iter().filter(|&&other| other != root) {
            self.delete_object(other)?;
        }
        Ok(())
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        let text = path.to_string_lossy();
        match (text.strip_prefix("//"), &self.document_dir) {
            (Some(relative), Some(dir)) => dir.join(relative),
            _ => path.to_path_buf(),
        }
    }

    fn library_exists(&self, path: &Path) -> bool {
        self.libraries.contains_key(path) || path.is_file()
    }

    fn report(&mut self, level: ReportLevel, message: &str) {
        self.reports.push((level, message.to_string()));
    }
}
