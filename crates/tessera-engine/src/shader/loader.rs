use wgpu::naga;

use crate::device::validated;
use crate::error::{RenderError, Result};

use super::reflect::{reflect_bindings, ReflectedBinding};
use super::ShaderSource;

/// One compiled pipeline stage.
#[derive(Debug)]
pub struct CompiledStage {
    pub name: String,
    pub module: wgpu::ShaderModule,
    pub entry_point: String,
    pub stage: wgpu::ShaderStages,
    pub bindings: Vec<ReflectedBinding>,
}

/// Vertex + fragment stages consumed by the pipeline builder.
#[derive(Debug)]
pub struct ShaderPair {
    pub vertex: CompiledStage,
    pub fragment: CompiledStage,
}

impl ShaderPair {
    /// Bindings of both stages, tagged with the stage that uses them.
    pub fn bindings(&self) -> impl Iterator<Item = (wgpu::ShaderStages, &ReflectedBinding)> {
        let v = self.vertex.bindings.iter().map(|b| (self.vertex.stage, b));
        let f = self.fragment.bindings.iter().map(|b| (self.fragment.stage, b));
        v.chain(f)
    }
}

/// Stage checked on the CPU, not yet handed to the device.
#[derive(Debug)]
pub(crate) struct CheckedStage {
    pub entry_point: String,
    pub bindings: Vec<ReflectedBinding>,
}

pub struct ShaderLoader;

impl ShaderLoader {
    /// Compiles `vertex` and `fragment` into device modules.
    ///
    /// Both sources are validated first; nothing is created on the device if
    /// either fails. A module the device still rejects, for example one using a
    /// feature the device was not created with, is a [`RenderError::ShaderCompile`]
    /// carrying the device's report.
    pub fn load(
        device: &wgpu::Device,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> Result<ShaderPair> {
        let checked_vs = check_stage(vertex, naga::ShaderStage::Vertex)?;
        let checked_fs = check_stage(fragment, naga::ShaderStage::Fragment)?;

        let pair = ShaderPair {
            vertex: create_stage(device, vertex, checked_vs, wgpu::ShaderStages::VERTEX)?,
            fragment: create_stage(device, fragment, checked_fs, wgpu::ShaderStages::FRAGMENT)?,
        };

        log::debug!(
            "loaded shaders `{}` ({}) + `{}` ({})",
            pair.vertex.name,
            pair.vertex.entry_point,
            pair.fragment.name,
            pair.fragment.entry_point
        );
        Ok(pair)
    }
}

fn create_stage(
    device: &wgpu::Device,
    source: &ShaderSource,
    checked: CheckedStage,
    stage: wgpu::ShaderStages,
) -> Result<CompiledStage> {
    let (module, error) = validated(device, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&source.name),
            source: wgpu::ShaderSource::Wgsl(source.text.as_str().into()),
        })
    });
    if let Some(error) = error {
        return Err(RenderError::ShaderCompile {
            name: source.name.clone(),
            diagnostics: error.to_string(),
        });
    }

    Ok(CompiledStage {
        name: source.name.clone(),
        module,
        entry_point: checked.entry_point,
        stage,
        bindings: checked.bindings,
    })
}

/// Parses and validates WGSL, then locates the entry point for `stage`.
pub(crate) fn check_stage(source: &ShaderSource, stage: naga::ShaderStage) -> Result<CheckedStage> {
    let compile_error = |diagnostics: String| RenderError::ShaderCompile {
        name: source.name.clone(),
        diagnostics,
    };

    let module = naga::front::wgsl::parse_str(&source.text)
        .map_err(|e| compile_error(e.emit_to_string(&source.text)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| compile_error(e.emit_to_string(&source.text)))?;

    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage)
        .map(|ep| ep.name.clone())
        .ok_or_else(|| compile_error(format!("no {stage:?} entry point")))?;

    Ok(CheckedStage {
        entry_point,
        bindings: reflect_bindings(&module),
    })
}
