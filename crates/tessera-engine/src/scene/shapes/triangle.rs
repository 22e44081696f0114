use crate::resources::Geometry;

use super::Vertex2;

/// Unit triangle: apex at the top, base along y = -1.
pub fn triangle() -> Geometry {
    Geometry::from_vertices(&[
        Vertex2::new(0.0, 1.0),
        Vertex2::new(1.0, -1.0),
        Vertex2::new(-1.0, -1.0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_unindexed_vertices() {
        let g = triangle();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.index_count(), None);
        assert_eq!(g.vertex_bytes().len(), 24);
    }
}
