//! Face scanning.
//!
//! Copies everything the swap needs out of a source mesh into plain values,
//! so the source object can be deleted before the library asset arrives.

use crate::error::{Result, SwapError};
use crate::host::{Host, ObjectId};
use crate::naming::canonical_name;
use crate::types::FaceRecord;
use glam::Mat4;

/// Everything kept from a source object once it is scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSnapshot {
    /// Object name as it was in the scene.
    pub name: String,
    /// Lower-cased canonical name used for library lookups.
    pub canonical: String,
    /// World transform of the source object.
    pub transform: Mat4,
    /// One record per polygon, in polygon order.
    pub faces: Vec<FaceRecord>,
}

/// Snapshot a mesh object's name, transform, and faces.
pub fn snapshot_object<H: Host + ?Sized>(host: &H, object: ObjectId) -> Result<SourceSnapshot> {
    let name = host
        .object_name(object)
        .ok_or(SwapError::ObjectNotFound(object))?
        .to_string();
    let transform = host
        .transform(object)
        .ok_or(SwapError::ObjectNotFound(object))?;
    let faces = scan_faces(host, object)?;

    Ok(SourceSnapshot {
        canonical: canonical_name(&name).to_lowercase(),
        name,
        transform,
        faces,
    })
}

/// Record normal, local center, and world center of every polygon.
pub fn scan_faces<H: Host + ?Sized>(host: &H, object: ObjectId) -> Result<Vec<FaceRecord>> {
    let mesh = host.mesh(object).ok_or(SwapError::ObjectNotFound(object))?;
    let transform = host
        .transform(object)
        .ok_or(SwapError::ObjectNotFound(object))?;

    Ok(mesh
        .polygons
        .iter()
        .map(|polygon| {
            let local_center = mesh.polygon_center(polygon);
            FaceRecord::new(
                mesh.polygon_normal(polygon),
                transform.transform_point3(local_center),
                local_center,
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryScene, Mesh};
    use glam::Vec3;

    #[test]
    fn test_scan_cube() {
        let mut mesh = Mesh::new();
        mesh.add_cube(Vec3::ZERO);
        let mut scene = MemoryScene::new();
        let id = scene.add_mesh_object(
            "Cobweb.003",
            mesh,
            Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)),
        );

        let snapshot = snapshot_object(&scene, id).unwrap();

        assert_eq!(snapshot.name, "Cobweb.003");
        assert_eq!(snapshot.canonical, "cobweb");
        assert_eq!(snapshot.faces.len(), 6);
        let first = snapshot.faces[0];
        assert!(first.normal.abs_diff_eq(Vec3::X, 1e-5));
        assert!(first.local_center.abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-5));
        assert!(first.world_center.abs_diff_eq(Vec3::new(10.5, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_snapshot_outlives_source() {
        let mut mesh = Mesh::new();
        mesh.add_cube(Vec3::ZERO);
        let mut scene = MemoryScene::new();
        let id = scene.add_mesh_object("torch", mesh, Mat4::IDENTITY);

        let snapshot = snapshot_object(&scene, id).unwrap();
        scene.delete_object(id).unwrap();

        assert_eq!(snapshot.faces.len(), 6);
        assert!(scan_faces(&scene, id).is_err());
    }
}
