use wgpu::naga;

use crate::pipeline::BindingKind;

/// A `@group(g) @binding(b)` resource declared by a shader stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ReflectedBinding {
    pub group: u32,
    pub binding: u32,
    pub kind: BindingKind,
}

/// Collects the resource bindings a module declares, sorted by (group, binding).
///
/// Resource kinds the engine cannot bind (binding arrays, acceleration
/// structures) are skipped with a debug message.
pub(crate) fn reflect_bindings(module: &naga::Module) -> Vec<ReflectedBinding> {
    let mut out = Vec::new();

    for (_, var) in module.global_variables.iter() {
        let Some(rb) = var.binding.as_ref() else { continue };

        let kind = match var.space {
            naga::AddressSpace::Uniform => Some(BindingKind::Uniform),
            naga::AddressSpace::Storage { access } => Some(BindingKind::Storage {
                read_only: !access.contains(naga::StorageAccess::STORE),
            }),
            naga::AddressSpace::Handle => match module.types[var.ty].inner {
                naga::TypeInner::Image { .. } => Some(BindingKind::Texture),
                naga::TypeInner::Sampler { .. } => Some(BindingKind::Sampler),
                _ => None,
            },
            _ => None,
        };

        match kind {
            Some(kind) => out.push(ReflectedBinding {
                group: rb.group,
                binding: rb.binding,
                kind,
            }),
            None => log::debug!(
                "skipping unsupported binding {:?} at @group({}) @binding({})",
                var.name,
                rb.group,
                rb.binding
            ),
        }
    }

    out.sort_by_key(|b| (b.group, b.binding));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> naga::Module {
        naga::front::wgsl::parse_str(src).unwrap()
    }

    #[test]
    fn reflects_uniform_texture_and_sampler() {
        let module = parse(
            r#"
            struct Scale { scale: vec2<f32>, offset: vec2<f32> };
            @group(0) @binding(0) var<uniform> u: Scale;
            @group(1) @binding(1) var samp: sampler;
            @group(1) @binding(0) var tex: texture_2d<f32>;

            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return textureSample(tex, samp, u.offset) * u.scale.x;
            }
            "#,
        );

        let bindings = reflect_bindings(&module);
        assert_eq!(
            bindings,
            vec![
                ReflectedBinding { group: 0, binding: 0, kind: BindingKind::Uniform },
                ReflectedBinding { group: 1, binding: 0, kind: BindingKind::Texture },
                ReflectedBinding { group: 1, binding: 1, kind: BindingKind::Sampler },
            ]
        );
    }

    #[test]
    fn storage_access_controls_read_only() {
        let module = parse(
            r#"
            @group(0) @binding(0) var<storage, read> src: array<f32>;
            @group(0) @binding(1) var<storage, read_write> dst: array<f32>;

            @compute @workgroup_size(1)
            fn main() { dst[0] = src[0]; }
            "#,
        );

        let bindings = reflect_bindings(&module);
        assert_eq!(bindings[0].kind, BindingKind::Storage { read_only: true });
        assert_eq!(bindings[1].kind, BindingKind::Storage { read_only: false });
    }

    #[test]
    fn no_bindings_for_procedural_shader() {
        let module = parse(
            r#"
            @vertex
            fn vs_main(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
                return vec4<f32>(f32(i), 0.0, 0.0, 1.0);
            }
            "#,
        );
        assert!(reflect_bindings(&module).is_empty());
    }
}
