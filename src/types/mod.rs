//! Shared types used throughout the library.

mod orientation;

pub use orientation::{Axis, Orientation, WALL_LIFT, WALL_OFFSET, WALL_TILT};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A block cell position in a source object's local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Round a local-space point componentwise to the nearest cell.
    pub fn from_local(point: Vec3) -> Self {
        let rounded = point.round();
        Self {
            x: rounded.x as i32,
            y: rounded.y as i32,
            z: rounded.z as i32,
        }
    }

    /// The cell center as a local-space point.
    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl std::fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A snapshot of one polygon of a source mesh.
///
/// Plain values only: the source object is deleted before these are consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRecord {
    /// Unit face normal in local space.
    pub normal: Vec3,
    /// Face center in world space.
    pub world_center: Vec3,
    /// Face center in the source object's local space.
    pub local_center: Vec3,
}

impl FaceRecord {
    pub fn new(normal: Vec3, world_center: Vec3, local_center: Vec3) -> Self {
        Self {
            normal,
            world_center,
            local_center,
        }
    }
}

/// An occupied block cell with its placement orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockCell {
    pub position: BlockPosition,
    pub orientation: Orientation,
}

impl BlockCell {
    pub fn new(position: BlockPosition, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn upright(position: BlockPosition) -> Self {
        Self::new(position, Orientation::Upright)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_local_rounds_to_nearest_cell() {
        assert_eq!(
            BlockPosition::from_local(Vec3::new(0.4, -0.4, 1.6)),
            BlockPosition::new(0, 0, 2)
        );
        assert_eq!(
            BlockPosition::from_local(Vec3::new(-2.9, 3.1, -0.0)),
            BlockPosition::new(-3, 3, 0)
        );
    }
}
