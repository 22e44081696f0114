use crate::error::{RenderError, Result};
use crate::pipeline::Pipeline;
use crate::resources::{Geometry, GeometryKey, GeometryPool, Refresh, ResourcePool};

use super::{Drawable, GeometrySource, PipelineId};

/// Pipelines, resident geometry and the drawables recorded against them.
///
/// Drawables are replayed in insertion order every frame; the scene itself is
/// retained between frames.
#[derive(Debug, Default)]
pub struct Scene {
    pipelines: Vec<Pipeline>,
    geometry: GeometryPool,
    drawables: Vec<Drawable>,
}

impl Scene {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pipeline(&mut self, pipeline: Pipeline) -> PipelineId {
        let id = PipelineId(self.pipelines.len() as u32);
        log::debug!("scene: pipeline `{}` registered as {:?}", pipeline.label(), id);
        self.pipelines.push(pipeline);
        id
    }

    pub fn pipeline(&self, id: PipelineId) -> Option<&Pipeline> {
        self.pipelines.get(id.index())
    }

    /// Makes `geometry` resident under `key`, reusing buffers where possible.
    pub fn upload_geometry(
        &mut self,
        resources: &ResourcePool<'_>,
        key: GeometryKey,
        geometry: &Geometry,
    ) -> Result<Refresh> {
        self.geometry.upload(resources, key, geometry)
    }

    pub fn geometry(&self) -> &GeometryPool {
        &self.geometry
    }

    /// Records a drawable after checking it against its pipeline.
    pub fn push(&mut self, drawable: Drawable) -> Result<()> {
        let Some(pipeline) = self.pipeline(drawable.pipeline) else {
            return Err(RenderError::resource(
                format!("{:?}", drawable.pipeline),
                "pipeline is not registered with this scene",
            ));
        };

        let geometry = match drawable.geometry {
            GeometrySource::Procedural { vertex_count } => GeometryFacts::Procedural { vertex_count },
            GeometrySource::Pooled(key) => GeometryFacts::Pooled {
                key,
                stride: self.geometry.get(key).map(|g| g.stride),
            },
        };

        check_draw(
            &DrawFacts {
                pipeline: pipeline.label(),
                groups: pipeline.group_count(),
                stride: pipeline.vertex_layout().map(|l| l.stride),
            },
            drawable.bind_groups.len(),
            drawable.instances,
            geometry,
        )?;

        self.drawables.push(drawable);
        Ok(())
    }

    #[inline]
    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    #[inline]
    pub fn drawables_mut(&mut self) -> &mut [Drawable] {
        &mut self.drawables
    }
}

struct DrawFacts<'a> {
    pipeline: &'a str,
    groups: usize,
    /// `None` when the pipeline consumes no vertex buffer.
    stride: Option<u64>,
}

#[derive(Debug, Copy, Clone)]
enum GeometryFacts {
    Procedural { vertex_count: u32 },
    /// `stride` is `None` when nothing is resident under `key`.
    Pooled { key: GeometryKey, stride: Option<u64> },
}

fn check_draw(
    facts: &DrawFacts<'_>,
    bind_groups: usize,
    instances: u32,
    geometry: GeometryFacts,
) -> Result<()> {
    if bind_groups != facts.groups {
        return Err(RenderError::binding(
            bind_groups.min(facts.groups) as u32,
            format!(
                "pipeline `{}` declares {} bind groups, drawable supplies {}",
                facts.pipeline, facts.groups, bind_groups
            ),
        ));
    }
    if instances == 0 {
        return Err(RenderError::resource(facts.pipeline, "drawable has zero instances"));
    }

    match (geometry, facts.stride) {
        (GeometryFacts::Procedural { vertex_count: 0 }, _) => Err(RenderError::resource(
            facts.pipeline,
            "procedural drawable has zero vertices",
        )),
        (GeometryFacts::Procedural { .. }, None) => Ok(()),
        (GeometryFacts::Procedural { .. }, Some(_)) => Err(RenderError::resource(
            facts.pipeline,
            "pipeline expects a vertex buffer but the drawable is procedural",
        )),
        (GeometryFacts::Pooled { key, stride: None }, _) => Err(RenderError::resource(
            facts.pipeline,
            format!("no geometry resident under {key:?}"),
        )),
        (GeometryFacts::Pooled { .. }, None) => Err(RenderError::resource(
            facts.pipeline,
            "pipeline declares no vertex layout but the drawable binds geometry",
        )),
        (GeometryFacts::Pooled { stride: Some(got), .. }, Some(want)) if got != want => {
            Err(RenderError::resource(
                facts.pipeline,
                format!("geometry stride {got} does not match vertex layout stride {want}"),
            ))
        }
        (GeometryFacts::Pooled { .. }, Some(_)) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(groups: usize, stride: Option<u64>) -> DrawFacts<'static> {
        DrawFacts {
            pipeline: "test",
            groups,
            stride,
        }
    }

    fn pooled(stride: Option<u64>) -> GeometryFacts {
        GeometryFacts::Pooled {
            key: GeometryKey(0),
            stride,
        }
    }

    #[test]
    fn matching_draw_passes() {
        assert!(check_draw(&facts(1, Some(8)), 1, 1, pooled(Some(8))).is_ok());
        assert!(
            check_draw(&facts(0, None), 0, 1, GeometryFacts::Procedural { vertex_count: 3 })
                .is_ok()
        );
    }

    #[test]
    fn bind_group_count_mismatch_is_binding_error() {
        let err = check_draw(&facts(2, Some(8)), 1, 1, pooled(Some(8))).unwrap_err();
        assert!(matches!(err, RenderError::BindingMismatch { group: 1, .. }));
    }

    #[test]
    fn stride_mismatch_is_rejected() {
        let err = check_draw(&facts(0, Some(12)), 0, 1, pooled(Some(8))).unwrap_err();
        assert!(matches!(err, RenderError::ResourceCreation { .. }));
    }

    #[test]
    fn missing_geometry_is_rejected() {
        assert!(check_draw(&facts(0, Some(8)), 0, 1, pooled(None)).is_err());
    }

    #[test]
    fn procedural_needs_procedural_pipeline() {
        let procedural = GeometryFacts::Procedural { vertex_count: 3 };
        assert!(check_draw(&facts(0, Some(8)), 0, 1, procedural).is_err());
        assert!(check_draw(&facts(0, None), 0, 1, pooled(Some(8))).is_err());
    }

    #[test]
    fn empty_draws_are_rejected() {
        assert!(check_draw(&facts(0, Some(8)), 0, 0, pooled(Some(8))).is_err());
        assert!(
            check_draw(&facts(0, None), 0, 1, GeometryFacts::Procedural { vertex_count: 0 })
                .is_err()
        );
    }
}
