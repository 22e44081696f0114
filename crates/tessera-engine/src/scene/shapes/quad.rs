use crate::resources::Geometry;

use super::TexVertex;

/// Full unit quad with texture coordinates (v grows downward), two triangles.
pub fn textured_quad() -> Geometry {
    let v = |x: f32, y: f32, u: f32, t: f32| TexVertex {
        position: [x, y],
        uv: [u, t],
    };
    Geometry::from_vertices(&[
        v(-1.0, -1.0, 0.0, 1.0),
        v(1.0, -1.0, 1.0, 1.0),
        v(1.0, 1.0, 1.0, 0.0),
        v(-1.0, 1.0, 0.0, 0.0),
    ])
    .with_indices(vec![0, 1, 2, 2, 3, 0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_vertices_six_indices() {
        let g = textured_quad();
        assert_eq!(g.stride(), 16);
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.index_count(), Some(6));
    }
}
