//! Render pipeline construction.
//!
//! Bind-group layouts are declared explicitly with [`BindGroupShape`] and
//! checked against the bindings reflected from the shaders when the pipeline
//! is built. Vertex layouts are checked for overlap and stride overflow.

mod builder;
mod layout;
mod vertex;

pub use builder::{Pipeline, PipelineBuilder};
pub use layout::{BindGroupShape, BindingKind, BindingSlot};
pub use vertex::VertexLayout;
