use crate::device::validated;
use crate::error::{RenderError, Result};
use crate::shader::{ReflectedBinding, ShaderPair};

use super::{BindGroupShape, VertexLayout};

/// Immutable render pipeline plus the layout contract it was built with.
#[derive(Debug)]
pub struct Pipeline {
    label: String,
    pipeline: wgpu::RenderPipeline,
    bind_group_layouts: Vec<wgpu::BindGroupLayout>,
    shapes: Vec<BindGroupShape>,
    vertex_layout: Option<VertexLayout>,
    format: wgpu::TextureFormat,
}

impl Pipeline {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn group_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn shape(&self, group: u32) -> Option<&BindGroupShape> {
        self.shapes.get(group as usize)
    }

    pub fn bind_group_layout(&self, group: u32) -> Option<&wgpu::BindGroupLayout> {
        self.bind_group_layouts.get(group as usize)
    }

    /// `None` for pipelines whose vertex stage generates geometry procedurally.
    pub fn vertex_layout(&self) -> Option<&VertexLayout> {
        self.vertex_layout.as_ref()
    }
}

/// Builds a [`Pipeline`] from a shader pair and an explicit layout description.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    label: String,
    vertex_layout: Option<VertexLayout>,
    shapes: Vec<BindGroupShape>,
    topology: wgpu::PrimitiveTopology,
    front_face: wgpu::FrontFace,
    cull_mode: Option<wgpu::Face>,
    blend: Option<wgpu::BlendState>,
}

impl PipelineBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            vertex_layout: None,
            shapes: Vec::new(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            blend: Some(wgpu::BlendState::REPLACE),
        }
    }

    pub fn vertex_layout(mut self, layout: VertexLayout) -> Self {
        self.vertex_layout = Some(layout);
        self
    }

    /// Declares the next bind group (group index = call order).
    pub fn bind_group(mut self, shape: BindGroupShape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn topology(mut self, topology: wgpu::PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn front_face(mut self, front_face: wgpu::FrontFace) -> Self {
        self.front_face = front_face;
        self
    }

    pub fn cull_mode(mut self, cull_mode: Option<wgpu::Face>) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    pub fn blend(mut self, blend: Option<wgpu::BlendState>) -> Self {
        self.blend = blend;
        self
    }

    pub fn build(
        self,
        device: &wgpu::Device,
        shaders: &ShaderPair,
        format: wgpu::TextureFormat,
    ) -> Result<Pipeline> {
        if let Some(layout) = &self.vertex_layout {
            layout.validate(&self.label)?;
        }
        for (group, shape) in self.shapes.iter().enumerate() {
            shape.validate(group as u32)?;
        }
        check_shader_bindings(&self.shapes, shaders.bindings())?;

        let bind_group_layouts: Vec<wgpu::BindGroupLayout> = self
            .shapes
            .iter()
            .enumerate()
            .map(|(group, shape)| {
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(&format!("{} bgl {group}", self.label)),
                    entries: &shape.layout_entries(),
                })
            })
            .collect();
        let bgl_refs: Vec<&wgpu::BindGroupLayout> = bind_group_layouts.iter().collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} pipeline layout", self.label)),
            bind_group_layouts: &bgl_refs,
            immediate_size: 0,
        });

        let vertex_buffers: Vec<wgpu::VertexBufferLayout<'_>> =
            self.vertex_layout.iter().map(VertexLayout::as_wgpu).collect();

        let (pipeline, error) = validated(device, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&self.label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shaders.vertex.module,
                    entry_point: Some(&shaders.vertex.entry_point),
                    compilation_options: Default::default(),
                    buffers: &vertex_buffers,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shaders.fragment.module,
                    entry_point: Some(&shaders.fragment.entry_point),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: self.blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: self.topology,
                    strip_index_format: None,
                    front_face: self.front_face,
                    cull_mode: self.cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        });
        if let Some(error) = error {
            return Err(RenderError::resource(&self.label, error.to_string()));
        }

        log::info!(
            "built pipeline `{}` ({} bind groups, {})",
            self.label,
            self.shapes.len(),
            if self.vertex_layout.is_some() { "vertex buffer" } else { "procedural" }
        );

        Ok(Pipeline {
            label: self.label,
            pipeline,
            bind_group_layouts,
            shapes: self.shapes,
            vertex_layout: self.vertex_layout,
            format,
        })
    }
}

/// Every binding a shader stage uses must be declared with the same kind and
/// be visible to that stage.
fn check_shader_bindings<'a>(
    shapes: &[BindGroupShape],
    bindings: impl IntoIterator<Item = (wgpu::ShaderStages, &'a ReflectedBinding)>,
) -> Result<()> {
    for (stage, b) in bindings {
        let Some(shape) = shapes.get(b.group as usize) else {
            return Err(RenderError::binding(
                b.group,
                format!("shader uses @binding({}) but the group is not declared", b.binding),
            ));
        };
        let Some(slot) = shape.get(b.binding) else {
            return Err(RenderError::binding(
                b.group,
                format!("shader uses undeclared @binding({})", b.binding),
            ));
        };
        if slot.kind != b.kind {
            return Err(RenderError::binding(
                b.group,
                format!(
                    "@binding({}) declared as {:?}, shader expects {:?}",
                    b.binding, slot.kind, b.kind
                ),
            ));
        }
        if !slot.visibility.contains(stage) {
            return Err(RenderError::binding(
                b.group,
                format!("@binding({}) is not visible to {stage:?}", b.binding),
            ));
        }
    }
    Ok(())
}
