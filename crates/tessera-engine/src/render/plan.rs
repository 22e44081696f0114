use std::ops::Range;

use crate::error::{RenderError, Result};
use crate::scene::{Drawable, GeometrySource, PipelineId, Scene};

/// One recorded render pass command.
///
/// `drawable` fields index into [`Scene::drawables`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    SetPipeline(PipelineId),
    SetBindGroup { group: u32, drawable: usize },
    SetVertexBuffer { drawable: usize },
    SetIndexBuffer { drawable: usize },
    Draw { vertices: Range<u32>, instances: Range<u32> },
    DrawIndexed { indices: Range<u32>, instances: Range<u32> },
}

/// Counters for one rendered frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub instances: u32,
}

/// Geometry as seen by the planner.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum PlannedGeometry {
    Procedural { vertex_count: u32 },
    Vertices { count: u32 },
    Indexed { count: u32 },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct DrawSpec {
    pub pipeline: PipelineId,
    pub bind_groups: u32,
    pub geometry: PlannedGeometry,
    pub instances: u32,
}

impl DrawSpec {
    pub(crate) fn resolve(scene: &Scene, drawable: &Drawable) -> Result<Self> {
        let geometry = match drawable.geometry {
            GeometrySource::Procedural { vertex_count } => {
                PlannedGeometry::Procedural { vertex_count }
            }
            GeometrySource::Pooled(key) => {
                let resident = scene.geometry().get(key).ok_or_else(|| {
                    RenderError::resource(format!("{key:?}"), "geometry is not resident")
                })?;
                // Geometry may have been re-uploaded since the drawable was pushed.
                let stride = scene
                    .pipeline(drawable.pipeline)
                    .and_then(|p| p.vertex_layout())
                    .map(|l| l.stride);
                if stride != Some(resident.stride) {
                    return Err(RenderError::resource(
                        format!("{key:?}"),
                        format!(
                            "resident stride {} does not match pipeline vertex stride {stride:?}",
                            resident.stride
                        ),
                    ));
                }
                match resident.index_count {
                    Some(count) => PlannedGeometry::Indexed { count },
                    None => PlannedGeometry::Vertices {
                        count: resident.vertex_count,
                    },
                }
            }
        };

        Ok(Self {
            pipeline: drawable.pipeline,
            bind_groups: drawable.bind_groups.len() as u32,
            geometry,
            instances: drawable.instances,
        })
    }
}

/// Appends the ops for `specs` to `ops`, in order.
///
/// The pipeline is only re-set when it changes between consecutive drawables.
/// Bind groups are set in slot order for every drawable.
pub(crate) fn plan_into(
    ops: &mut Vec<DrawOp>,
    specs: impl IntoIterator<Item = DrawSpec>,
) -> FrameStats {
    let mut stats = FrameStats::default();
    let mut current: Option<PipelineId> = None;

    for (drawable, spec) in specs.into_iter().enumerate() {
        if current != Some(spec.pipeline) {
            ops.push(DrawOp::SetPipeline(spec.pipeline));
            current = Some(spec.pipeline);
        }

        for group in 0..spec.bind_groups {
            ops.push(DrawOp::SetBindGroup { group, drawable });
        }

        let instances = 0..spec.instances;
        match spec.geometry {
            PlannedGeometry::Procedural { vertex_count } => ops.push(DrawOp::Draw {
                vertices: 0..vertex_count,
                instances,
            }),
            PlannedGeometry::Vertices { count } => {
                ops.push(DrawOp::SetVertexBuffer { drawable });
                ops.push(DrawOp::Draw {
                    vertices: 0..count,
                    instances,
                });
            }
            PlannedGeometry::Indexed { count } => {
                ops.push(DrawOp::SetVertexBuffer { drawable });
                ops.push(DrawOp::SetIndexBuffer { drawable });
                ops.push(DrawOp::DrawIndexed {
                    indices: 0..count,
                    instances,
                });
            }
        }

        stats.draw_calls = stats.draw_calls.saturating_add(1);
        stats.instances = stats.instances.saturating_add(spec.instances);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(pipeline: u32, bind_groups: u32, geometry: PlannedGeometry, instances: u32) -> DrawSpec {
        DrawSpec {
            pipeline: PipelineId(pipeline),
            bind_groups,
            geometry,
            instances,
        }
    }

    fn draws(ops: &[DrawOp]) -> Vec<&DrawOp> {
        ops.iter()
            .filter(|op| matches!(op, DrawOp::Draw { .. } | DrawOp::DrawIndexed { .. }))
            .collect()
    }

    #[test]
    fn triangle_is_one_three_vertex_draw() {
        let mut ops = Vec::new();
        let stats = plan_into(
            &mut ops,
            [spec(0, 0, PlannedGeometry::Vertices { count: 3 }, 1)],
        );

        assert_eq!(stats, FrameStats { draw_calls: 1, instances: 1 });
        assert_eq!(
            ops,
            vec![
                DrawOp::SetPipeline(PipelineId(0)),
                DrawOp::SetVertexBuffer { drawable: 0 },
                DrawOp::Draw {
                    vertices: 0..3,
                    instances: 0..1
                },
            ]
        );
    }

    #[test]
    fn cube_is_one_indexed_draw_of_36() {
        let mut ops = Vec::new();
        plan_into(&mut ops, [spec(0, 1, PlannedGeometry::Indexed { count: 36 }, 1)]);

        assert_eq!(
            draws(&ops),
            vec![&DrawOp::DrawIndexed {
                indices: 0..36,
                instances: 0..1
            }]
        );
        assert!(ops.contains(&DrawOp::SetIndexBuffer { drawable: 0 }));
        assert!(ops.contains(&DrawOp::SetBindGroup { group: 0, drawable: 0 }));
    }

    #[test]
    fn instanced_draw_keeps_per_instance_vertex_count() {
        let mut ops = Vec::new();
        let stats = plan_into(
            &mut ops,
            [spec(0, 1, PlannedGeometry::Procedural { vertex_count: 3 }, 100)],
        );

        assert_eq!(stats.instances, 100);
        assert_eq!(
            draws(&ops),
            vec![&DrawOp::Draw {
                vertices: 0..3,
                instances: 0..100
            }]
        );
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::SetVertexBuffer { .. })));
    }

    #[test]
    fn pipeline_is_set_only_on_change() {
        let tri = PlannedGeometry::Procedural { vertex_count: 3 };
        let mut ops = Vec::new();
        let stats = plan_into(
            &mut ops,
            [spec(0, 0, tri, 1), spec(0, 0, tri, 1), spec(1, 0, tri, 1)],
        );

        let sets: Vec<_> = ops
            .iter()
            .filter(|op| matches!(op, DrawOp::SetPipeline(_)))
            .collect();
        assert_eq!(
            sets,
            vec![
                &DrawOp::SetPipeline(PipelineId(0)),
                &DrawOp::SetPipeline(PipelineId(1))
            ]
        );
        assert_eq!(stats.draw_calls, 3);
    }

    #[test]
    fn bind_groups_are_set_in_slot_order() {
        let mut ops = Vec::new();
        plan_into(&mut ops, [spec(0, 3, PlannedGeometry::Procedural { vertex_count: 6 }, 1)]);

        let groups: Vec<u32> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::SetBindGroup { group, .. } => Some(*group),
                _ => None,
            })
            .collect();
        assert_eq!(groups, vec![0, 1, 2]);
    }

    #[test]
    fn instance_totals_saturate() {
        let tri = PlannedGeometry::Procedural { vertex_count: 3 };
        let mut ops = Vec::new();
        let stats = plan_into(&mut ops, [spec(0, 0, tri, u32::MAX), spec(0, 0, tri, 2)]);
        assert_eq!(stats.instances, u32::MAX);
        assert_eq!(stats.draw_calls, 2);
    }

    #[test]
    fn empty_scene_plans_nothing() {
        let mut ops = Vec::new();
        let stats = plan_into(&mut ops, []);
        assert!(ops.is_empty());
        assert_eq!(stats, FrameStats::default());
    }
}
