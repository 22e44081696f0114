//! Retained scene state.
//!
//! Responsibilities:
//! - own registered pipelines and the persistent geometry pool
//! - record drawables in submission order, checked against their pipeline
//! - provide primitive geometry builders under `scene::shapes`
//! - place individual objects with a [`Transform`]

mod drawable;
mod key;
mod list;
mod transform;

pub mod shapes;

pub use drawable::{scale_for_aspect, AspectScale, Drawable, GeometrySource, ScaleBlock};
pub use key::PipelineId;
pub use list::Scene;
pub use transform::{ModelUniform, Transform};
