//! Block cell detection from scanned faces.
//!
//! Exported block faces have local centers on half-integer coordinates when
//! they sit on a cell boundary. Such a face belongs to the cell behind it,
//! half a block against its normal. A wall-mounted block shows a single
//! boundary face toward its wall; a free-standing cube shows faces on
//! opposite sides.

use crate::types::{BlockCell, BlockPosition, FaceRecord, Orientation};
use glam::Vec3;
use std::collections::HashMap;

/// How close a fractional part must be to 0.5 to count as a boundary.
pub const EDGE_EPSILON: f32 = 0.01;

/// Faces in the bottom part of a cell, below this fraction, are dropped.
pub const BOTTOM_FRACTION: f32 = 0.3;

/// Whether a local face center lies on a boundary between two block cells.
///
/// True iff any component has a fractional part of 0.5, for positive and
/// negative coordinates alike.
pub fn on_block_edge(center: Vec3) -> bool {
    center
        .to_array()
        .iter()
        .any(|c| (c.fract().abs() - 0.5).abs() < EDGE_EPSILON)
}

/// Whether a local face center is in the bottom third of its cell (Z up).
pub fn in_bottom_third(center: Vec3) -> bool {
    let shifted = center.z + 0.5;
    shifted - shifted.floor() < BOTTOM_FRACTION
}

/// Horizontal boundary directions seen for one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Mount {
    first: Option<Orientation>,
    seen: u8,
}

impl Mount {
    fn bit(wall: Orientation) -> u8 {
        1 << wall.code()
    }

    fn add(&mut self, wall: Orientation) {
        self.first.get_or_insert(wall);
        self.seen |= Self::bit(wall);
    }

    fn enclosed(&self) -> bool {
        let both = |wall: Orientation| {
            let mask = Self::bit(wall) | Self::bit(wall.opposite());
            self.seen & mask == mask
        };
        both(Orientation::PosX) || both(Orientation::PosY)
    }

    /// First wall seen, unless two opposite walls make the cell free-standing.
    fn resolve(&self) -> Orientation {
        match self.first {
            Some(wall) if !self.enclosed() => wall,
            _ => Orientation::Upright,
        }
    }
}

/// Reduces faces to a deduplicated, insertion-ordered list of block cells.
#[derive(Debug, Default)]
pub struct CellAggregator {
    order: Vec<BlockPosition>,
    mounts: HashMap<BlockPosition, Mount>,
}

impl CellAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one face. Returns the cell it was attributed to, if kept.
    pub fn add_face(&mut self, face: &FaceRecord) -> Option<BlockPosition> {
        let local = face.local_center;
        if in_bottom_third(local) {
            return None;
        }

        let (position, wall) = if on_block_edge(local) {
            (
                BlockPosition::from_local(local - face.normal * 0.5),
                Orientation::from_normal(face.normal),
            )
        } else {
            (BlockPosition::from_local(local), Orientation::Upright)
        };

        let mount = self.mounts.entry(position).or_insert_with(|| {
            self.order.push(position);
            Mount::default()
        });

        if wall.is_wall() {
            mount.add(wall);
        }
        Some(position)
    }

    /// Number of distinct cells seen so far.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The cells in first-seen order with their resolved orientation.
    pub fn finish(self) -> Vec<BlockCell> {
        self.order
            .iter()
            .map(|position| {
                let orientation = self
                    .mounts
                    .get(position)
                    .map_or(Orientation::Upright, Mount::resolve);
                BlockCell::new(*position, orientation)
            })
            .collect()
    }
}

/// Aggregate a face list into block cells.
pub fn aggregate_cells(faces: &[FaceRecord]) -> Vec<BlockCell> {
    let mut aggregator = CellAggregator::new();
    for face in faces {
        aggregator.add_face(face);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Mesh;

    fn faces_of(mesh: &Mesh) -> Vec<FaceRecord> {
        mesh.polygons
            .iter()
            .map(|p| {
                let center = mesh.polygon_center(p);
                FaceRecord::new(mesh.polygon_normal(p), center, center)
            })
            .collect()
    }

    fn face(normal: Vec3, center: Vec3) -> FaceRecord {
        FaceRecord::new(normal, center, center)
    }

    #[test]
    fn test_half_integers_are_edges() {
        for k in -4..=4 {
            let h = k as f32 + 0.5;
            assert!(on_block_edge(Vec3::new(h, 0.0, 0.0)), "{}", h);
            assert!(on_block_edge(Vec3::new(0.0, h, 0.0)), "{}", h);
            assert!(on_block_edge(Vec3::new(0.0, 0.0, h)), "{}", h);
            assert!(on_block_edge(Vec3::splat(h)));
        }
        assert!(on_block_edge(Vec3::new(-0.5 + 1e-4, 3.0, 3.0)));
    }

    #[test]
    fn test_integers_and_offgrid_are_not_edges() {
        for k in -4..=4 {
            assert!(!on_block_edge(Vec3::splat(k as f32)));
        }
        assert!(!on_block_edge(Vec3::new(0.4375, -0.25, 1.0625)));
        assert!(!on_block_edge(Vec3::new(0.45, 0.0, 0.0)));
    }

    #[test]
    fn test_bottom_third() {
        assert!(in_bottom_third(Vec3::new(0.0, 0.0, -0.5)));
        assert!(in_bottom_third(Vec3::new(0.0, 0.0, 0.5)));
        assert!(in_bottom_third(Vec3::new(0.0, 0.0, -0.25)));
        assert!(!in_bottom_third(Vec3::new(0.0, 0.0, 0.0)));
        assert!(!in_bottom_third(Vec3::new(0.0, 0.0, -0.1875)));
        assert!(!in_bottom_third(Vec3::new(0.0, 0.0, 2.25)));
    }

    #[test]
    fn test_single_cube_is_one_upright_cell() {
        let mut mesh = Mesh::new();
        mesh.add_cube(Vec3::ZERO);

        let cells = aggregate_cells(&faces_of(&mesh));

        assert_eq!(cells, vec![BlockCell::upright(BlockPosition::new(0, 0, 0))]);
    }

    #[test]
    fn test_two_cubes_in_a_row() {
        let mut mesh = Mesh::new();
        mesh.add_cube(Vec3::ZERO);
        mesh.add_cube(Vec3::new(1.0, 0.0, 0.0));

        let cells = aggregate_cells(&faces_of(&mesh));

        assert_eq!(
            cells,
            vec![
                BlockCell::upright(BlockPosition::new(0, 0, 0)),
                BlockCell::upright(BlockPosition::new(1, 0, 0)),
            ]
        );
    }

    #[test]
    fn test_culled_row_stays_upright() {
        let mut mesh = Mesh::new();
        mesh.add_cube(Vec3::ZERO);
        mesh.add_cube(Vec3::new(1.0, 0.0, 0.0));
        // Exporters cull the faces shared by neighbouring blocks
        let faces: Vec<FaceRecord> = faces_of(&mesh)
            .into_iter()
            .filter(|f| (f.local_center.x - 0.5).abs() > 1e-4)
            .collect();

        let cells = aggregate_cells(&faces);

        assert_eq!(
            cells,
            vec![
                BlockCell::upright(BlockPosition::new(0, 0, 0)),
                BlockCell::upright(BlockPosition::new(1, 0, 0)),
            ]
        );
    }

    #[test]
    fn test_late_opposite_pair_encloses() {
        let faces = [
            face(Vec3::NEG_X, Vec3::new(-0.5, 0.0, 0.0)),
            face(Vec3::Y, Vec3::new(0.0, 0.5, 0.0)),
            face(Vec3::NEG_Y, Vec3::new(0.0, -0.5, 0.0)),
        ];
        assert_eq!(aggregate_cells(&faces)[0].orientation, Orientation::Upright);
    }

    #[test]
    fn test_offset_cube_positions() {
        let mut mesh = Mesh::new();
        mesh.add_cube(Vec3::new(-3.0, 2.0, 5.0));
        let cells = aggregate_cells(&faces_of(&mesh));
        assert_eq!(cells, vec![BlockCell::upright(BlockPosition::new(-3, 2, 5))]);
    }

    #[test]
    fn test_wall_face_sets_orientation() {
        let mut mesh = Mesh::new();
        // Thin stick inside the cell, plus a plate on the +x boundary
        mesh.add_rect(Vec3::new(0.0625, 0.0, 0.0), Vec3::X, 0.0625);
        mesh.add_rect(Vec3::new(-0.0625, 0.0, 0.0), Vec3::NEG_X, 0.0625);
        mesh.add_rect(Vec3::new(0.5, 0.0, 0.0), Vec3::X, 0.25);

        let cells = aggregate_cells(&faces_of(&mesh));

        assert_eq!(
            cells,
            vec![BlockCell::new(BlockPosition::new(0, 0, 0), Orientation::PosX)]
        );
    }

    #[test]
    fn test_edge_face_belongs_to_cell_behind_it() {
        let faces = [
            face(Vec3::NEG_Y, Vec3::new(4.0, -2.5, 0.0)),
            face(Vec3::Y, Vec3::new(-1.0, 7.5, 1.0)),
        ];
        for f in &faces {
            let mut aggregator = CellAggregator::new();
            let position = aggregator.add_face(f).unwrap();
            assert_eq!(position, BlockPosition::from_local(f.local_center - f.normal * 0.5));
        }
        let cells = aggregate_cells(&faces);
        assert_eq!(cells[0], BlockCell::new(BlockPosition::new(4, -2, 0), Orientation::NegY));
        assert_eq!(cells[1], BlockCell::new(BlockPosition::new(-1, 7, 1), Orientation::PosY));
    }

    #[test]
    fn test_first_wall_wins_and_opposite_walls_enclose() {
        let perpendicular = [
            face(Vec3::Y, Vec3::new(0.0, 0.5, 0.0)),
            face(Vec3::X, Vec3::new(0.5, 0.0, 0.0)),
        ];
        assert_eq!(aggregate_cells(&perpendicular)[0].orientation, Orientation::PosY);

        let opposite = [
            face(Vec3::Y, Vec3::new(0.0, 0.5, 0.0)),
            face(Vec3::NEG_Y, Vec3::new(0.0, -0.5, 0.0)),
            face(Vec3::X, Vec3::new(0.5, 0.0, 0.0)),
        ];
        assert_eq!(aggregate_cells(&opposite)[0].orientation, Orientation::Upright);
    }

    #[test]
    fn test_duplicate_faces_are_suppressed() {
        let faces = [
            face(Vec3::Z, Vec3::new(0.25, 0.0, 0.0)),
            face(Vec3::Z, Vec3::new(-0.25, 0.0, 0.0)),
            face(Vec3::Z, Vec3::new(0.0, 0.25, 0.0)),
        ];
        let mut aggregator = CellAggregator::new();
        for f in &faces {
            aggregator.add_face(f);
        }
        assert_eq!(aggregator.len(), 1);
    }

    #[test]
    fn test_bottom_faces_are_dropped() {
        let mut aggregator = CellAggregator::new();
        assert!(aggregator
            .add_face(&face(Vec3::NEG_Z, Vec3::new(0.0, 0.0, -0.5)))
            .is_none());
        assert!(aggregator.is_empty());
    }
}
