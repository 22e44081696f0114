use crate::resources::Geometry;

use super::Vertex3;

/// Triangle list over the eight corners of [`cube`].
///
/// Outward faces wind clockwise; build the pipeline with
/// `FrontFace::Cw` when culling back faces.
pub const CUBE_INDICES: [u32; 36] = [
    0, 1, 3, 3, 1, 2, //
    1, 5, 2, 2, 5, 6, //
    5, 4, 6, 6, 4, 7, //
    4, 0, 7, 7, 0, 3, //
    3, 2, 7, 7, 2, 6, //
    4, 5, 0, 0, 5, 1,
];

/// Axis-aligned cube spanning [-1, 1] on every axis.
pub fn cube() -> Geometry {
    Geometry::from_vertices(&[
        Vertex3::new(-1.0, -1.0, -1.0),
        Vertex3::new(1.0, -1.0, -1.0),
        Vertex3::new(1.0, 1.0, -1.0),
        Vertex3::new(-1.0, 1.0, -1.0),
        Vertex3::new(-1.0, -1.0, 1.0),
        Vertex3::new(1.0, -1.0, 1.0),
        Vertex3::new(1.0, 1.0, 1.0),
        Vertex3::new(-1.0, 1.0, 1.0),
    ])
    .with_indices(CUBE_INDICES.to_vec())
}
