use std::f32::consts::TAU;

use crate::resources::Geometry;

use super::Vertex2;

/// Unit circle as an indexed triangle fan around the origin.
///
/// Vertex 0 is the centre; the rim has `segments` vertices (at least 3).
pub fn circle(segments: u32) -> Geometry {
    let segments = segments.max(3);

    let mut vertices = Vec::with_capacity(segments as usize + 1);
    vertices.push(Vertex2::new(0.0, 0.0));
    for i in 0..segments {
        let a = TAU * i as f32 / segments as f32;
        vertices.push(Vertex2::new(a.cos(), a.sin()));
    }

    let mut indices = Vec::with_capacity(segments as usize * 3);
    for i in 0..segments {
        let rim = 1 + i;
        let next = 1 + (i + 1) % segments;
        indices.extend_from_slice(&[0, rim, next]);
    }

    Geometry::from_vertices(&vertices).with_indices(indices)
}
