use crate::error::{RenderError, Result};
use crate::pipeline::BindingKind;

use super::{BufferKind, GpuBuffer, GpuTexture};

/// A resource placed at a bind group slot.
#[derive(Debug, Clone, Copy)]
pub enum BindResource<'a> {
    Buffer(&'a GpuBuffer),
    TextureView(&'a wgpu::TextureView),
    Sampler(&'a wgpu::Sampler),
}

impl<'a> BindResource<'a> {
    /// Texture view and sampler of a [`GpuTexture`], in that order.
    pub fn texture(texture: &'a GpuTexture) -> [BindResource<'a>; 2] {
        [
            BindResource::TextureView(&texture.view),
            BindResource::Sampler(&texture.sampler),
        ]
    }

    pub(crate) fn kind(&self) -> Result<BindingKind> {
        match self {
            BindResource::Buffer(b) => match b.kind() {
                BufferKind::Uniform => Ok(BindingKind::Uniform),
                BufferKind::Storage => Ok(BindingKind::Storage { read_only: false }),
                other => Err(RenderError::resource(
                    b.label(),
                    format!("{other:?} buffers cannot be bound to a bind group"),
                )),
            },
            BindResource::TextureView(_) => Ok(BindingKind::Texture),
            BindResource::Sampler(_) => Ok(BindingKind::Sampler),
        }
    }

    pub(crate) fn as_wgpu(&self) -> wgpu::BindingResource<'a> {
        match *self {
            BindResource::Buffer(b) => b.raw.as_entire_binding(),
            BindResource::TextureView(v) => wgpu::BindingResource::TextureView(v),
            BindResource::Sampler(s) => wgpu::BindingResource::Sampler(s),
        }
    }
}
