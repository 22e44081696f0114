//! Primitive geometry builders and the vertex formats they emit.

mod circle;
mod cube;
mod quad;
mod triangle;

pub use circle::circle;
pub use cube::{cube, CUBE_INDICES};
pub use quad::textured_quad;
pub use triangle::triangle;

use bytemuck::{Pod, Zeroable};

use crate::pipeline::VertexLayout;

/// 2D position at location 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex2 {
    pub position: [f32; 2],
}

impl Vertex2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y] }
    }

    pub fn layout() -> VertexLayout {
        VertexLayout::of::<Self>().attribute(0, 0, wgpu::VertexFormat::Float32x2)
    }
}

/// 2D position at location 0, texture coordinate at location 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl TexVertex {
    pub fn layout() -> VertexLayout {
        VertexLayout::of::<Self>()
            .attribute(0, 0, wgpu::VertexFormat::Float32x2)
            .attribute(1, 8, wgpu::VertexFormat::Float32x2)
    }
}

/// 3D position at location 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex3 {
    pub position: [f32; 3],
}

impl Vertex3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }

    pub fn layout() -> VertexLayout {
        VertexLayout::of::<Self>().attribute(0, 0, wgpu::VertexFormat::Float32x3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_match_vertex_sizes() {
        assert_eq!(Vertex2::layout().stride, 8);
        assert_eq!(TexVertex::layout().stride, 16);
        assert_eq!(Vertex3::layout().stride, 12);
        assert!(TexVertex::layout().validate("tex").is_ok());
    }
}
