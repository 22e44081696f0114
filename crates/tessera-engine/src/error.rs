//! Error taxonomy for the rendering core.
//!
//! Every variant is terminal for the operation that produced it: nothing in
//! this crate retries a failed GPU call.

use thiserror::Error;

/// Result alias used across the engine.
pub type Result<T, E = RenderError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum RenderError {
    /// No surface, adapter, device or presentable format could be obtained.
    #[error("GPU rendering is not supported here: {0}")]
    Unsupported(String),

    /// A shader provider has no source registered under the given name.
    #[error("shader source `{0}` not found")]
    ShaderNotFound(String),

    /// WGSL failed to parse or validate. `diagnostics` is the rendered report.
    #[error("failed to compile shader `{name}`:\n{diagnostics}")]
    ShaderCompile { name: String, diagnostics: String },

    /// Invalid buffer/texture/layout parameters.
    #[error("invalid resource `{label}`: {reason}")]
    ResourceCreation { label: String, reason: String },

    /// Pixel buffer length does not match the texture extent.
    #[error("texture upload expects {expected} bytes, got {actual}")]
    TextureUpload { expected: usize, actual: usize },

    /// Bind group or shader bindings do not match the declared layout.
    #[error("binding mismatch in group {group}: {reason}")]
    BindingMismatch { group: u32, reason: String },

    /// Surface texture acquisition failed for this frame.
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

impl RenderError {
    pub(crate) fn resource(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceCreation {
            label: label.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn binding(group: u32, reason: impl Into<String>) -> Self {
        Self::BindingMismatch {
            group,
            reason: reason.into(),
        }
    }
}
