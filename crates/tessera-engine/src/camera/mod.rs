//! Perspective camera.
//!
//! Right-handed, depth mapped to `0..1` as wgpu expects. The camera is plain
//! data; applications upload [`CameraUniform`] themselves.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

pub const DEFAULT_NEAR: f32 = 0.01;
pub const DEFAULT_FAR: f32 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera {
    /// Camera at the origin looking down -X with +Y up.
    pub fn new(fov_y: f32, aspect: f32) -> Self {
        Self::with_planes(fov_y, aspect, DEFAULT_NEAR, DEFAULT_FAR)
    }

    pub fn with_planes(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_X,
            up: Vec3::Y,
        }
    }

    pub fn look_at(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.position = position;
        self.target = target;
        self.up = up;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
        }
    }
}

/// Column-major view-projection matrix, as a WGSL `mat4x4<f32>` uniform.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}
