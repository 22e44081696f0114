use crate::device::Context;
use crate::error::{RenderError, Result};
use crate::resources::GpuGeometry;
use crate::scene::{GeometrySource, Scene};

use super::plan::{plan_into, DrawSpec};
use super::{DrawOp, FrameStats, PassConfig};

/// Renders a [`Scene`] into the context's surface, one pass per frame.
///
/// The op and spec buffers are reused across frames.
#[derive(Debug, Default)]
pub struct FrameRenderer {
    pass: PassConfig,
    specs: Vec<DrawSpec>,
    ops: Vec<DrawOp>,
}

impl FrameRenderer {
    pub fn new(pass: PassConfig) -> Self {
        Self {
            pass,
            specs: Vec::new(),
            ops: Vec::new(),
        }
    }

    pub fn pass_config(&self) -> &PassConfig {
        &self.pass
    }

    /// Ops recorded for the most recent frame.
    pub fn last_ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Acquires the surface, records the scene and submits it.
    ///
    /// Surface acquisition failures are returned as [`RenderError::Surface`]
    /// for the caller to classify.
    pub fn render(&mut self, ctx: &Context<'_>, scene: &mut Scene) -> Result<FrameStats> {
        let mut frame = ctx.begin_frame()?;
        let aspect = ctx.extent().aspect();
        let stats = self.record(ctx.queue(), aspect, scene, &mut frame.encoder, &frame.view)?;
        ctx.submit(frame);

        log::trace!(
            "frame: {} draws, {} instances, aspect {:.4}",
            stats.draw_calls,
            stats.instances,
            aspect
        );
        Ok(stats)
    }

    /// Syncs aspect-scaled uniforms for `aspect` and records one pass over
    /// `scene` into `encoder`, targeting `view`.
    pub(crate) fn record(
        &mut self,
        queue: &wgpu::Queue,
        aspect: f32,
        scene: &mut Scene,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) -> Result<FrameStats> {
        for drawable in scene.drawables_mut() {
            if let Some(scale) = drawable.aspect_scale.as_mut() {
                scale.sync(queue, aspect);
            }
        }

        self.specs.clear();
        for drawable in scene.drawables() {
            self.specs.push(DrawSpec::resolve(scene, drawable)?);
        }
        self.ops.clear();
        let stats = plan_into(&mut self.ops, self.specs.iter().copied());

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(self.pass.label.as_str()),
            color_attachments: &[Some(self.pass.color_attachment(view))],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        replay(&mut rpass, &self.ops, scene)?;

        Ok(stats)
    }
}

fn replay(rpass: &mut wgpu::RenderPass<'_>, ops: &[DrawOp], scene: &Scene) -> Result<()> {
    let drawables = scene.drawables();

    for op in ops {
        match op {
            DrawOp::SetPipeline(id) => {
                let pipeline = scene.pipeline(*id).ok_or_else(|| {
                    RenderError::resource(format!("{id:?}"), "pipeline is not registered")
                })?;
                rpass.set_pipeline(pipeline.raw());
            }
            DrawOp::SetBindGroup { group, drawable } => {
                let bind_group = drawables
                    .get(*drawable)
                    .and_then(|d| d.bind_groups.get(*group as usize))
                    .ok_or_else(|| RenderError::binding(*group, "bind group missing at replay"))?;
                rpass.set_bind_group(*group, bind_group, &[]);
            }
            DrawOp::SetVertexBuffer { drawable } => {
                let geometry = resident(scene, *drawable)?;
                rpass.set_vertex_buffer(0, geometry.vertex.raw().slice(..));
            }
            DrawOp::SetIndexBuffer { drawable } => {
                let geometry = resident(scene, *drawable)?;
                let index = geometry.index.as_ref().ok_or_else(|| {
                    RenderError::resource(geometry.vertex.label(), "geometry has no index buffer")
                })?;
                rpass.set_index_buffer(index.raw().slice(..), wgpu::IndexFormat::Uint32);
            }
            DrawOp::Draw {
                vertices,
                instances,
            } => rpass.draw(vertices.clone(), instances.clone()),
            DrawOp::DrawIndexed { indices, instances } => {
                rpass.draw_indexed(indices.clone(), 0, instances.clone())
            }
        }
    }

    Ok(())
}

fn resident(scene: &Scene, drawable: usize) -> Result<&GpuGeometry> {
    let key = match scene.drawables().get(drawable).map(|d| d.geometry) {
        Some(GeometrySource::Pooled(key)) => key,
        _ => {
            return Err(RenderError::resource(
                format!("drawable {drawable}"),
                "no pooled geometry to bind",
            ));
        }
    };
    scene
        .geometry()
        .get(key)
        .ok_or_else(|| RenderError::resource(format!("{key:?}"), "geometry is not resident"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SurfaceExtent;
    use crate::resources::{BindResource, Geometry, GeometryKey, Refresh, ResourcePool};
    use crate::scene::{scale_for_aspect, shapes, AspectScale, Drawable, PipelineId};
    use crate::testing::{noop_device, offscreen_view, scaled_pipeline};

    const KEY: GeometryKey = GeometryKey(0);

    fn push_scaled(
        resources: &ResourcePool<'_>,
        scene: &mut Scene,
        id: PipelineId,
        base: f32,
        offset: [f32; 2],
    ) {
        let scale = AspectScale::new(resources, base, offset, "scale").unwrap();
        let group = resources
            .create_bind_group(
                scene.pipeline(id).unwrap(),
                0,
                &[(0, BindResource::Buffer(scale.buffer()))],
                "scale group",
            )
            .unwrap();
        scene
            .push(Drawable::pooled(id, KEY).bind_group(group).aspect_scale(scale))
            .unwrap();
    }

    fn record_frame(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        renderer: &mut FrameRenderer,
        scene: &mut Scene,
        extent: SurfaceExtent,
    ) -> Result<FrameStats> {
        let view = offscreen_view(device, extent.width(), extent.height());
        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        let stats = renderer.record(queue, extent.aspect(), scene, &mut encoder, &view);
        queue.submit(std::iter::once(encoder.finish()));
        stats
    }

    #[test]
    fn frame_after_resize_uses_new_aspect() {
        let (device, queue) = noop_device();
        let resources = ResourcePool::new(&device, &queue);
        let mut scene = Scene::new();
        let id = scene.add_pipeline(scaled_pipeline(&device));
        scene.upload_geometry(&resources, KEY, &shapes::triangle()).unwrap();
        push_scaled(&resources, &mut scene, id, 0.5, [0.25, 0.0]);

        let mut extent = SurfaceExtent::new(800, 800);
        let mut renderer = FrameRenderer::default();
        record_frame(&device, &queue, &mut renderer, &mut scene, extent).unwrap();
        let block = *scene.drawables()[0].aspect_scale.as_ref().unwrap().block();
        assert_eq!(block.scale, [0.5, 0.5]);

        assert!(extent.resize(1200, 400));
        let stats = record_frame(&device, &queue, &mut renderer, &mut scene, extent).unwrap();

        let block = *scene.drawables()[0].aspect_scale.as_ref().unwrap().block();
        assert_eq!(block.scale, scale_for_aspect(0.5, 3.0));
        assert_eq!(block.scale, [0.5 / 3.0, 0.5]);
        assert_eq!(block.offset, [0.25, 0.0]);
        assert_eq!(stats, FrameStats { draw_calls: 1, instances: 1 });
        assert_eq!(
            renderer.last_ops().last(),
            Some(&DrawOp::Draw {
                vertices: 0..3,
                instances: 0..1
            })
        );
    }

    #[test]
    fn drawables_sharing_a_pipeline_set_it_once() {
        let (device, queue) = noop_device();
        let resources = ResourcePool::new(&device, &queue);
        let mut scene = Scene::new();
        let id = scene.add_pipeline(scaled_pipeline(&device));
        scene.upload_geometry(&resources, KEY, &shapes::triangle()).unwrap();
        for x in [-0.5, 0.0, 0.5] {
            push_scaled(&resources, &mut scene, id, 0.2, [x, 0.0]);
        }

        let mut renderer = FrameRenderer::default();
        let stats =
            record_frame(&device, &queue, &mut renderer, &mut scene, SurfaceExtent::new(640, 480))
                .unwrap();

        assert_eq!(stats.draw_calls, 3);
        let ops = renderer.last_ops();
        let pipelines = ops.iter().filter(|op| matches!(op, DrawOp::SetPipeline(_))).count();
        assert_eq!(pipelines, 1);
        assert!(ops.contains(&DrawOp::SetBindGroup { group: 0, drawable: 2 }));
    }

    #[test]
    fn geometry_reuploaded_with_other_stride_fails_the_frame() {
        let (device, queue) = noop_device();
        let resources = ResourcePool::new(&device, &queue);
        let mut scene = Scene::new();
        let id = scene.add_pipeline(scaled_pipeline(&device));
        scene.upload_geometry(&resources, KEY, &shapes::triangle()).unwrap();
        push_scaled(&resources, &mut scene, id, 0.5, [0.0, 0.0]);

        let wider = Geometry::from_vertices(&[[0.0f32, 0.0, 0.0]; 2]);
        assert_eq!(scene.upload_geometry(&resources, KEY, &wider).unwrap(), Refresh::Create);

        let mut renderer = FrameRenderer::default();
        let result =
            record_frame(&device, &queue, &mut renderer, &mut scene, SurfaceExtent::new(64, 64));
        assert!(matches!(result, Err(RenderError::ResourceCreation { .. })));
    }
}
