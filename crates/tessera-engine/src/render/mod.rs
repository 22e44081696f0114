//! Frame rendering.
//!
//! Each frame is one render pass over the scene's drawables, in insertion
//! order. The pass is planned into [`DrawOp`]s first and then replayed against
//! a wgpu render pass, so the command stream can be inspected without a device.

mod pass;
mod plan;
mod renderer;

pub use pass::PassConfig;
pub use plan::{DrawOp, FrameStats};
pub use renderer::FrameRenderer;
