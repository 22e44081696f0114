//! Shader module loading.
//!
//! Sources are opaque WGSL text obtained from a [`ShaderProvider`]. The loader
//! parses and validates them before they reach the device, so compile failures
//! come back as [`RenderError::ShaderCompile`](crate::error::RenderError) with
//! the full diagnostic report instead of a backend panic.

mod loader;
mod reflect;
mod source;

pub use loader::{CompiledStage, ShaderLoader, ShaderPair};
pub use reflect::ReflectedBinding;
pub use source::{DirShaders, EmbeddedShaders, ShaderProvider, ShaderSource};
