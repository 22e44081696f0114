use bytemuck::{Pod, Zeroable};

use crate::error::Result;
use crate::resources::{GeometryKey, GpuBuffer, ResourcePool, UniformBlock};

use super::PipelineId;

/// Where a drawable's vertices come from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GeometrySource {
    /// The vertex stage generates positions from `vertex_index`; no buffers are bound.
    Procedural { vertex_count: u32 },
    /// Buffers resident in the scene's geometry pool.
    Pooled(GeometryKey),
}

/// Uniform block layout consumed by aspect-corrected 2D shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ScaleBlock {
    pub scale: [f32; 2],
    pub offset: [f32; 2],
}

/// Horizontal scale is divided by the aspect ratio; vertical scale is `base`.
#[inline]
pub fn scale_for_aspect(base: f32, aspect: f32) -> [f32; 2] {
    [base / aspect, base]
}

/// Returns the block to write for `aspect`, or `None` if it is already current.
fn rescaled(current: &ScaleBlock, base: f32, aspect: f32) -> Option<ScaleBlock> {
    let scale = scale_for_aspect(base, aspect);
    (current.scale != scale).then_some(ScaleBlock {
        scale,
        offset: current.offset,
    })
}

/// A [`ScaleBlock`] uniform that the renderer keeps in step with the surface
/// aspect ratio.
#[derive(Debug)]
pub struct AspectScale {
    base: f32,
    block: UniformBlock<ScaleBlock>,
}

impl AspectScale {
    pub fn new(
        resources: &ResourcePool<'_>,
        base: f32,
        offset: [f32; 2],
        label: &str,
    ) -> Result<Self> {
        let block = resources.create_uniform(
            ScaleBlock {
                scale: [base, base],
                offset,
            },
            label,
        )?;
        Ok(Self { base, block })
    }

    /// Buffer to place in the drawable's bind group.
    pub fn buffer(&self) -> &GpuBuffer {
        self.block.buffer()
    }

    pub fn base(&self) -> f32 {
        self.base
    }

    pub fn block(&self) -> &ScaleBlock {
        self.block.get()
    }

    pub fn set_offset(&mut self, offset: [f32; 2]) {
        self.block.update(|b| b.offset = offset);
    }

    /// Recomputes the scale for `aspect` and queues a write if anything changed.
    pub(crate) fn sync(&mut self, queue: &wgpu::Queue, aspect: f32) -> bool {
        if let Some(next) = rescaled(self.block.get(), self.base, aspect) {
            self.block.set(next);
        }
        self.block.write(queue)
    }
}

/// One draw call's worth of state: pipeline, bind groups, geometry and instance count.
#[derive(Debug)]
pub struct Drawable {
    pub pipeline: PipelineId,
    pub geometry: GeometrySource,
    /// Bound in order: element `i` is group `i`.
    pub bind_groups: Vec<wgpu::BindGroup>,
    pub aspect_scale: Option<AspectScale>,
    pub instances: u32,
}

impl Drawable {
    pub fn new(pipeline: PipelineId, geometry: GeometrySource) -> Self {
        Self {
            pipeline,
            geometry,
            bind_groups: Vec::new(),
            aspect_scale: None,
            instances: 1,
        }
    }

    pub fn procedural(pipeline: PipelineId, vertex_count: u32) -> Self {
        Self::new(pipeline, GeometrySource::Procedural { vertex_count })
    }

    pub fn pooled(pipeline: PipelineId, key: GeometryKey) -> Self {
        Self::new(pipeline, GeometrySource::Pooled(key))
    }

    pub fn bind_group(mut self, group: wgpu::BindGroup) -> Self {
        self.bind_groups.push(group);
        self
    }

    pub fn aspect_scale(mut self, scale: AspectScale) -> Self {
        self.aspect_scale = Some(scale);
        self
    }

    pub fn instances(mut self, count: u32) -> Self {
        self.instances = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_surface_narrows_horizontal_scale() {
        let [sx, sy] = scale_for_aspect(0.5, 800.0 / 400.0);
        assert_eq!(sx, 0.25);
        assert_eq!(sy, 0.5);
    }

    #[test]
    fn square_surface_keeps_base_scale() {
        assert_eq!(scale_for_aspect(0.8, 1.0), [0.8, 0.8]);
    }

    #[test]
    fn rescale_keeps_offset_and_skips_when_current() {
        let block = ScaleBlock {
            scale: [0.5, 0.5],
            offset: [0.25, -0.5],
        };

        let next = rescaled(&block, 0.5, 2.0).unwrap();
        assert_eq!(next.scale, [0.25, 0.5]);
        assert_eq!(next.offset, [0.25, -0.5]);

        assert!(rescaled(&next, 0.5, 2.0).is_none());
    }

    #[test]
    fn scale_block_is_uniform_sized() {
        assert_eq!(std::mem::size_of::<ScaleBlock>(), 16);
    }

    #[test]
    fn sync_writes_only_on_aspect_change() {
        let (device, queue) = crate::testing::noop_device();
        let resources = ResourcePool::new(&device, &queue);
        let mut scale = AspectScale::new(&resources, 0.6, [0.1, 0.2], "scale").unwrap();

        assert!(scale.sync(&queue, 1.5));
        assert_eq!(scale.block().scale, [0.6 / 1.5, 0.6]);
        assert!(!scale.sync(&queue, 1.5));

        scale.set_offset([0.0, 0.0]);
        assert!(scale.sync(&queue, 1.5));
        assert_eq!(scale.block().offset, [0.0, 0.0]);
    }
}
