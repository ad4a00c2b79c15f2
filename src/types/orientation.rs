//! Orientation codes and rotation axes for placed blocks.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Outward offset applied to wall-mounted placements, in block units.
pub const WALL_OFFSET: f32 = 0.28;
/// Upward offset applied to wall-mounted placements, in block units.
pub const WALL_LIFT: f32 = 0.12;
/// Tilt of wall-mounted placements (25 degrees).
pub const WALL_TILT: f32 = 0.436332;

/// Normal components below this are treated as zero.
const NORMAL_EPSILON: f32 = 1e-3;

/// Whether a block cell is upright or mounted against one of four walls.
///
/// The numeric codes are stable: `0` upright, `1..=4` wall-mounted on the
/// +X, +Y, -X and -Y faces respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Upright,
    PosX,
    PosY,
    NegX,
    NegY,
}

impl Orientation {
    /// All five orientations in code order.
    pub const ALL: [Orientation; 5] = [
        Orientation::Upright,
        Orientation::PosX,
        Orientation::PosY,
        Orientation::NegX,
        Orientation::NegY,
    ];

    /// The numeric orientation code.
    pub fn code(&self) -> u8 {
        match self {
            Orientation::Upright => 0,
            Orientation::PosX => 1,
            Orientation::PosY => 2,
            Orientation::NegX => 3,
            Orientation::NegY => 4,
        }
    }

    /// Parse a numeric orientation code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Derive the orientation from a face normal.
    ///
    /// Purely vertical normals are upright; otherwise the sign of the dominant
    /// horizontal component picks the wall.
    pub fn from_normal(normal: Vec3) -> Self {
        let (x, y) = (normal.x, normal.y);
        if x.abs() < NORMAL_EPSILON && y.abs() < NORMAL_EPSILON {
            return Orientation::Upright;
        }
        if x.abs() >= y.abs() {
            if x > 0.0 {
                Orientation::PosX
            } else {
                Orientation::NegX
            }
        } else if y > 0.0 {
            Orientation::PosY
        } else {
            Orientation::NegY
        }
    }

    /// Whether this is a wall mount.
    pub fn is_wall(&self) -> bool {
        *self != Orientation::Upright
    }

    /// Get the opposite wall. Upright is its own opposite.
    pub fn opposite(&self) -> Orientation {
        match self {
            Orientation::Upright => Orientation::Upright,
            Orientation::PosX => Orientation::NegX,
            Orientation::PosY => Orientation::NegY,
            Orientation::NegX => Orientation::PosX,
            Orientation::NegY => Orientation::PosY,
        }
    }

    /// World-space translation applied on top of the cell position.
    pub fn offset(&self) -> Vec3 {
        match self {
            Orientation::Upright => Vec3::ZERO,
            Orientation::PosX => Vec3::new(WALL_OFFSET, 0.0, WALL_LIFT),
            Orientation::PosY => Vec3::new(0.0, WALL_OFFSET, WALL_LIFT),
            Orientation::NegX => Vec3::new(-WALL_OFFSET, 0.0, WALL_LIFT),
            Orientation::NegY => Vec3::new(0.0, -WALL_OFFSET, WALL_LIFT),
        }
    }

    /// Rotation axis and signed angle in radians, if any.
    pub fn tilt(&self) -> Option<(Axis, f32)> {
        match self {
            Orientation::Upright => None,
            Orientation::PosX => Some((Axis::Y, WALL_TILT)),
            Orientation::PosY => Some((Axis::X, WALL_TILT)),
            Orientation::NegX => Some((Axis::Y, -WALL_TILT)),
            Orientation::NegY => Some((Axis::X, -WALL_TILT)),
        }
    }

    /// The tilt as a quaternion.
    pub fn rotation(&self) -> Quat {
        match self.tilt() {
            Some((axis, angle)) => Quat::from_axis_angle(axis.unit_vector(), angle),
            None => Quat::IDENTITY,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Upright => write!(f, "upright"),
            Orientation::PosX => write!(f, "+x"),
            Orientation::PosY => write!(f, "+y"),
            Orientation::NegX => write!(f, "-x"),
            Orientation::NegY => write!(f, "-y"),
        }
    }
}

/// The three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Get the unit vector for this axis.
    pub fn unit_vector(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}
