//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window, builds the [`Context`](crate::device::Context)
//! against it and drives the scheduler from window events.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
