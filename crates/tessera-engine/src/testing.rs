//! Headless device and small fixtures shared by tests.

use crate::device::GpuInit;
use crate::pipeline::{BindGroupShape, Pipeline, PipelineBuilder};
use crate::scene::shapes::Vertex2;
use crate::shader::{ShaderLoader, ShaderSource};

pub(crate) const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

pub(crate) const SCALED_VS: &str = r#"
    struct Scale { scale: vec2<f32>, offset: vec2<f32> };
    @group(0) @binding(0) var<uniform> u: Scale;

    @vertex
    fn vs_main(@location(0) pos: vec2<f32>) -> @builtin(position) vec4<f32> {
        return vec4<f32>(pos * u.scale + u.offset, 0.0, 1.0);
    }
"#;

pub(crate) const FLAT_FS: &str = r#"
    @fragment
    fn fs_main() -> @location(0) vec4<f32> {
        return vec4<f32>(1.0, 0.5, 0.0, 1.0);
    }
"#;

/// Device on the no-op backend with the default engine requirements.
pub(crate) fn noop_device() -> (wgpu::Device, wgpu::Queue) {
    wgpu::Device::noop(&GpuInit::default().device_descriptor())
}

/// `Vertex2` pipeline with one vertex-stage uniform at group 0.
pub(crate) fn scaled_pipeline(device: &wgpu::Device) -> Pipeline {
    let pair = ShaderLoader::load(
        device,
        &ShaderSource::new("scaled.vert", SCALED_VS),
        &ShaderSource::new("flat.frag", FLAT_FS),
    )
    .unwrap();
    PipelineBuilder::new("scaled")
        .vertex_layout(Vertex2::layout())
        .bind_group(BindGroupShape::new().uniform(0, wgpu::ShaderStages::VERTEX))
        .build(device, &pair, TARGET_FORMAT)
        .unwrap()
}

/// Offscreen colour target standing in for a surface texture.
pub(crate) fn offscreen_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}
