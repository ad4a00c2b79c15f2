//! Placement of library assets into detected block cells.

use super::variant::choose_variant;
use crate::error::Result;
use crate::host::{Host, ObjectId};
use crate::library::LibraryAsset;
use crate::types::BlockCell;
use glam::Mat4;
use rand::Rng;
use tracing::warn;

/// World transform for a placement in `cell` of an object with `source` transform.
///
/// The cell position goes through the source transform; the wall offset and
/// tilt of the cell's orientation are applied in world space on top.
pub fn placement_transform(source: &Mat4, cell: &BlockCell) -> Mat4 {
    let world = source.transform_point3(cell.position.as_vec3());
    Mat4::from_rotation_translation(
        cell.orientation.rotation(),
        world + cell.orientation.offset(),
    )
}

/// Place one copy of `asset` per cell.
///
/// Group assets become one instance per cell, each of a randomly chosen
/// variant. Object assets are duplicated per cell and the duplicates joined
/// into the first one; the appended template is removed either way. Returns
/// the objects left in the scene.
///
/// On failure every object created so far is removed again.
pub fn place_cells<H: Host + ?Sized, R: Rng + ?Sized>(
    host: &mut H,
    cells: &[BlockCell],
    source: &Mat4,
    asset: &LibraryAsset,
    rng: &mut R,
) -> Result<Vec<ObjectId>> {
    let mut created = Vec::with_capacity(cells.len());
    let result = match asset {
        LibraryAsset::Group { variants, .. } => {
            place_group(host, cells, source, variants, rng, &mut created)
        }
        LibraryAsset::Object { object, .. } => {
            place_objects(host, cells, source, *object, &mut created)
        }
    };

    match result {
        Ok(placed) => Ok(placed),
        Err(err) => {
            let mut leftovers = created;
            if let LibraryAsset::Object { object, .. } = asset {
                if host.object_name(*object).is_some() {
                    leftovers.push(*object);
                }
            }
            for object in leftovers {
                if let Err(cleanup) = host.delete_object(object) {
                    warn!("Could not remove {} after failed placement: {}", object, cleanup);
                }
            }
            Err(err)
        }
    }
}

fn place_group<H: Host + ?Sized, R: Rng + ?Sized>(
    host: &mut H,
    cells: &[BlockCell],
    source: &Mat4,
    variants: &[crate::host::GroupId],
    rng: &mut R,
    created: &mut Vec<ObjectId>,
) -> Result<Vec<ObjectId>> {
    if variants.is_empty() {
        return Ok(Vec::new());
    }
    for cell in cells {
        let index = choose_variant(rng, variants.len() as u32) as usize;
        let instance = host.instance_group(variants[index], placement_transform(source, cell))?;
        created.push(instance);
    }
    Ok(created.clone())
}

fn place_objects<H: Host + ?Sized>(
    host: &mut H,
    cells: &[BlockCell],
    source: &Mat4,
    template: ObjectId,
    created: &mut Vec<ObjectId>,
) -> Result<Vec<ObjectId>> {
    for cell in cells {
        let duplicate = host.duplicate_object(template)?;
        created.push(duplicate);
        host.set_transform(duplicate, placement_transform(source, cell))?;
    }

    host.delete_object(template)?;

    let Some(&root) = created.first() else {
        return Ok(Vec::new());
    };
    host.set_active(Some(root));
    host.join(root, created)?;
    Ok(vec![root])
}
