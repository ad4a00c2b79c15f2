//! Asset library resolution and loading.

use super::{SwapCategory, SwapTable};
use crate::error::{Result, SwapError};
use crate::host::{GroupId, Host, ObjectId};
use crate::naming::variant_name;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default file name of the mesh-swap asset library.
pub const LIBRARY_FILE: &str = "asset_meshSwap.blend";

/// Resolve the user-supplied library path to an absolute library file path.
///
/// `path` may name the library file itself or the directory holding it.
/// Fails with [`SwapError::LibraryMissing`] if the host cannot find the file.
pub fn resolve_library_path<H: Host + ?Sized>(
    host: &H,
    path: &Path,
    file_name: &str,
) -> Result<PathBuf> {
    let mut resolved = host.resolve_path(path);
    if resolved.is_relative() {
        resolved = std::env::current_dir()?.join(resolved);
    }

    let is_library_file = resolved
        .file_name()
        .map(|name| name.to_string_lossy().ends_with(file_name))
        .unwrap_or(false);
    let library = if is_library_file {
        resolved
    } else {
        resolved.join(file_name)
    };

    if host.library_exists(&library) {
        Ok(library)
    } else {
        Err(SwapError::LibraryMissing(library))
    }
}

/// Path of the swap table that sits next to a library file.
pub fn table_path(library: &Path) -> PathBuf {
    library.with_extension("json")
}

/// A replacement asset loaded from the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryAsset {
    /// An appended object, used as the template for per-cell duplicates.
    Object { name: String, object: ObjectId },
    /// A linked group definition and its loaded variants, variant 0 first.
    Group { name: String, variants: Vec<GroupId> },
}

impl LibraryAsset {
    pub fn name(&self) -> &str {
        match self {
            LibraryAsset::Object { name, .. } | LibraryAsset::Group { name, .. } => name,
        }
    }

    /// Whether the asset is placed as group instances.
    pub fn grouped(&self) -> bool {
        matches!(self, LibraryAsset::Group { .. })
    }
}

/// Loads replacement assets from one library file.
///
/// Group definitions are cached, so every source object with the same
/// canonical name shares them within one run.
pub struct LibraryLoader<'a> {
    library: PathBuf,
    table: &'a SwapTable,
    groups: HashMap<String, Vec<GroupId>>,
}

impl<'a> LibraryLoader<'a> {
    pub fn new(library: PathBuf, table: &'a SwapTable) -> Self {
        Self {
            library,
            table,
            groups: HashMap::new(),
        }
    }

    /// Path of the library file.
    pub fn library(&self) -> &Path {
        &self.library
    }

    /// Load the replacement for `name`. Groups are linked, objects appended.
    pub fn load<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        name: &str,
        category: SwapCategory,
    ) -> Result<LibraryAsset> {
        match category {
            SwapCategory::GroupSwap => {
                let variants = self.load_group(host, name)?;
                Ok(LibraryAsset::Group {
                    name: name.to_string(),
                    variants,
                })
            }
            SwapCategory::ObjectSwap => {
                let object = host.append_object(&self.library, name)?;
                Ok(LibraryAsset::Object {
                    name: name.to_string(),
                    object,
                })
            }
            SwapCategory::Ignored | SwapCategory::EraseOnly => Err(SwapError::AssetLoadFailed {
                name: name.to_string(),
                reason: format!("{} names have no library asset", category),
            }),
        }
    }

    fn load_group<H: Host + ?Sized>(&mut self, host: &mut H, name: &str) -> Result<Vec<GroupId>> {
        if let Some(cached) = self.groups.get(name) {
            return Ok(cached.clone());
        }

        let count = self.table.variant_count(name);
        let mut variants = Vec::with_capacity(count as usize);
        for index in 0..count {
            let variant = variant_name(name, index);
            match self.link(host, &variant) {
                Ok(group) => variants.push(group),
                // The base asset is required; extra variants are optional
                Err(err) if index == 0 => return Err(err),
                Err(err) => {
                    tracing::warn!("Variant {} unavailable, using {} variant(s): {}", variant, index, err);
                    break;
                }
            }
        }

        self.groups.insert(name.to_string(), variants.clone());
        Ok(variants)
    }

    fn link<H: Host + ?Sized>(&self, host: &mut H, name: &str) -> Result<GroupId> {
        let linked = host.link_group(&self.library, name)?;
        if let Some(transient) = linked.transient {
            host.delete_object(transient)?;
        }
        Ok(linked.group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Mesh, MemoryLibrary, MemoryScene, ObjectData};
    use glam::Vec3;

    fn cube() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_cube(Vec3::ZERO);
        mesh
    }

    fn scene_with_library(library: MemoryLibrary) -> (MemoryScene, PathBuf) {
        let mut scene = MemoryScene::new();
        let path = PathBuf::from("/library/asset_meshSwap.blend");
        scene.register_library(&path, library);
        (scene, path)
    }

    #[test]
    fn test_resolve_directory_and_file_paths() {
        let (scene, path) = scene_with_library(MemoryLibrary::new());
        assert_eq!(
            resolve_library_path(&scene, Path::new("/library"), LIBRARY_FILE).unwrap(),
            path
        );
        assert_eq!(
            resolve_library_path(&scene, &path, LIBRARY_FILE).unwrap(),
            path
        );
    }

    #[test]
    fn test_resolve_missing_library() {
        let scene = MemoryScene::new();
        let err = resolve_library_path(&scene, Path::new("/nowhere"), LIBRARY_FILE).unwrap_err();
        assert!(matches!(err, SwapError::LibraryMissing(p) if p == Path::new("/nowhere/asset_meshSwap.blend")));
    }

    #[test]
    fn test_resolve_on_disk_library() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LIBRARY_FILE), b"{}").unwrap();
        let scene = MemoryScene::new();
        let resolved = resolve_library_path(&scene, dir.path(), LIBRARY_FILE).unwrap();
        assert_eq!(resolved, dir.path().join(LIBRARY_FILE));
        assert_eq!(table_path(&resolved), dir.path().join("asset_meshSwap.json"));
    }

    #[test]
    fn test_group_load_preloads_variants_and_removes_transients() {
        let library = MemoryLibrary::new()
            .with_group("torch", cube())
            .with_group("torch.1", cube())
            .with_group("torch.2", cube());
        let (mut scene, path) = scene_with_library(library);
        let table = SwapTable::default();
        let mut loader = LibraryLoader::new(path, &table);

        let asset = loader.load(&mut scene, "torch", SwapCategory::GroupSwap).unwrap();

        assert!(asset.grouped());
        assert!(matches!(&asset, LibraryAsset::Group { variants, .. } if variants.len() == 3));
        assert_eq!(scene.groups().len(), 3);
        assert!(scene.objects().is_empty());

        // Cached on second load
        let again = loader.load(&mut scene, "torch", SwapCategory::GroupSwap).unwrap();
        assert_eq!(again, asset);
        assert_eq!(scene.groups().len(), 3);
    }

    #[test]
    fn test_missing_variants_shrink_the_set() {
        let library = MemoryLibrary::new().with_group("torch", cube());
        let (mut scene, path) = scene_with_library(library);
        let table = SwapTable::default();
        let mut loader = LibraryLoader::new(path, &table);

        let asset = loader.load(&mut scene, "torch", SwapCategory::GroupSwap).unwrap();
        assert!(matches!(asset, LibraryAsset::Group { variants, .. } if variants.len() == 1));
    }

    #[test]
    fn test_object_load_appends_template() {
        let library = MemoryLibrary::new().with_object("cobweb", cube());
        let (mut scene, path) = scene_with_library(library);
        let table = SwapTable::default();
        let mut loader = LibraryLoader::new(path, &table);

        let asset = loader.load(&mut scene, "cobweb", SwapCategory::ObjectSwap).unwrap();
        let LibraryAsset::Object { object, .. } = asset else {
            panic!("expected an object asset");
        };
        assert!(matches!(scene.object(object).unwrap().data, ObjectData::Mesh(_)));
    }

    #[test]
    fn test_missing_asset_fails() {
        let (mut scene, path) = scene_with_library(MemoryLibrary::new());
        let table = SwapTable::default();
        let mut loader = LibraryLoader::new(path, &table);

        assert!(matches!(
            loader.load(&mut scene, "cobweb", SwapCategory::ObjectSwap),
            Err(SwapError::AssetLoadFailed { .. })
        ));
        assert!(loader.load(&mut scene, "torch", SwapCategory::GroupSwap).is_err());
    }
}
