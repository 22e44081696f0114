//! Tessera engine crate.
//!
//! Windowed wgpu rendering: a device/surface [`device::Context`], WGSL shader
//! loading with up-front validation, pipelines with declared bind-group
//! layouts, a resource pool, a retained [`scene::Scene`] and a frame renderer
//! driven by an event scheduler.

pub mod camera;
pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod paint;
pub mod pipeline;
pub mod render;
pub mod resources;
pub mod scene;
pub mod schedule;
pub mod shader;
pub mod time;
pub mod window;

#[cfg(test)]
mod testing;

pub use error::{RenderError, Result};
