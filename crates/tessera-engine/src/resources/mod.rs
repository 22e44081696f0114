//! GPU resource allocation.
//!
//! [`ResourcePool`] borrows the device and queue from a
//! [`Context`](crate::device::Context) and hands out owned handles. Nothing is
//! tracked or released automatically: callers keep what they create for as
//! long as the scene lives.

mod bind_group;
mod buffer;
mod geometry;
mod pool;
mod texture;
mod uniform;

pub use bind_group::BindResource;
pub use buffer::{BufferKind, GpuBuffer};
pub use geometry::{Geometry, GeometryKey, GeometryPool, GpuGeometry, Refresh};
pub use pool::ResourcePool;
pub use texture::{GpuTexture, TextureUpload};
pub use uniform::{UniformBlock, UniformMirror};
