use crate::error::{RenderError, Result};

/// Resource kind expected at a binding slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BindingKind {
    Uniform,
    Storage { read_only: bool },
    /// Filterable float 2D texture.
    Texture,
    /// Filtering sampler.
    Sampler,
}

impl BindingKind {
    /// Whether a resource of kind `provided` can fill a slot declared as `self`.
    ///
    /// Storage buffers fit either access mode; the access is a property of the
    /// binding, not of the buffer.
    pub fn accepts(self, provided: BindingKind) -> bool {
        match (self, provided) {
            (BindingKind::Storage { .. }, BindingKind::Storage { .. }) => true,
            (declared, provided) => declared == provided,
        }
    }

    fn binding_type(self) -> wgpu::BindingType {
        match self {
            BindingKind::Uniform => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            BindingKind::Storage { read_only } => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            BindingKind::Texture => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            BindingKind::Sampler => {
                wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
            }
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BindingSlot {
    pub slot: u32,
    pub kind: BindingKind,
    pub visibility: wgpu::ShaderStages,
}

/// Declared layout of one bind group: an ordered list of `{slot, kind}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindGroupShape {
    slots: Vec<BindingSlot>,
}

impl BindGroupShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(mut self, slot: u32, kind: BindingKind, visibility: wgpu::ShaderStages) -> Self {
        self.slots.push(BindingSlot {
            slot,
            kind,
            visibility,
        });
        self
    }

    pub fn uniform(self, slot: u32, visibility: wgpu::ShaderStages) -> Self {
        self.slot(slot, BindingKind::Uniform, visibility)
    }

    pub fn texture(self, slot: u32, visibility: wgpu::ShaderStages) -> Self {
        self.slot(slot, BindingKind::Texture, visibility)
    }

    pub fn sampler(self, slot: u32, visibility: wgpu::ShaderStages) -> Self {
        self.slot(slot, BindingKind::Sampler, visibility)
    }

    pub fn slots(&self) -> &[BindingSlot] {
        &self.slots
    }

    pub fn get(&self, slot: u32) -> Option<&BindingSlot> {
        self.slots.iter().find(|s| s.slot == slot)
    }

    /// Rejects duplicate slot indices.
    pub(crate) fn validate(&self, group: u32) -> Result<()> {
        for (i, a) in self.slots.iter().enumerate() {
            if self.slots[i + 1..].iter().any(|b| b.slot == a.slot) {
                return Err(RenderError::binding(
                    group,
                    format!("slot {} declared twice", a.slot),
                ));
            }
        }
        Ok(())
    }

    /// Checks bind group entries against this shape.
    ///
    /// Every declared slot must be provided exactly once with the declared
    /// kind, and nothing else may be provided.
    pub(crate) fn check_entries(&self, group: u32, entries: &[(u32, BindingKind)]) -> Result<()> {
        for (i, (slot, kind)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(s, _)| s == slot) {
                return Err(RenderError::binding(group, format!("slot {slot} bound twice")));
            }
            let Some(declared) = self.get(*slot) else {
                return Err(RenderError::binding(
                    group,
                    format!("slot {slot} is not part of the layout"),
                ));
            };
            if !declared.kind.accepts(*kind) {
                return Err(RenderError::binding(
                    group,
                    format!("slot {slot} expects {:?}, got {kind:?}", declared.kind),
                ));
            }
        }

        if let Some(missing) = self
            .slots
            .iter()
            .find(|d| !entries.iter().any(|(s, _)| *s == d.slot))
        {
            return Err(RenderError::binding(
                group,
                format!("slot {} ({:?}) left unbound", missing.slot, missing.kind),
            ));
        }

        Ok(())
    }

    pub(crate) fn layout_entries(&self) -> Vec<wgpu::BindGroupLayoutEntry> {
        self.slots
            .iter()
            .map(|s| wgpu::BindGroupLayoutEntry {
                binding: s.slot,
                visibility: s.visibility,
                ty: s.kind.binding_type(),
                count: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::ShaderStages as S;

    fn textured() -> BindGroupShape {
        BindGroupShape::new()
            .uniform(0, S::VERTEX)
            .texture(1, S::FRAGMENT)
            .sampler(2, S::FRAGMENT)
    }

    #[test]
    fn matching_entries_pass() {
        let entries = [
            (2, BindingKind::Sampler),
            (0, BindingKind::Uniform),
            (1, BindingKind::Texture),
        ];
        textured().check_entries(0, &entries).unwrap();
    }

    #[test]
    fn wrong_kind_is_mismatch() {
        let entries = [
            (0, BindingKind::Uniform),
            (1, BindingKind::Sampler),
            (2, BindingKind::Sampler),
        ];
        let err = textured().check_entries(1, &entries).unwrap_err();
        assert!(matches!(err, RenderError::BindingMismatch { group: 1, .. }));
    }

    #[test]
    fn missing_and_extra_slots_are_mismatches() {
        let missing = [(0, BindingKind::Uniform), (1, BindingKind::Texture)];
        assert!(textured().check_entries(0, &missing).is_err());

        let extra = [
            (0, BindingKind::Uniform),
            (1, BindingKind::Texture),
            (2, BindingKind::Sampler),
            (3, BindingKind::Uniform),
        ];
        assert!(textured().check_entries(0, &extra).is_err());
    }

    #[test]
    fn storage_buffers_fit_either_access_mode() {
        let shape = BindGroupShape::new().slot(
            0,
            BindingKind::Storage { read_only: true },
            S::VERTEX,
        );
        shape
            .check_entries(0, &[(0, BindingKind::Storage { read_only: false })])
            .unwrap();
        assert!(shape.check_entries(0, &[(0, BindingKind::Uniform)]).is_err());
    }

    #[test]
    fn duplicate_entries_are_mismatches() {
        let shape = BindGroupShape::new().uniform(0, S::VERTEX);
        let dup = [(0, BindingKind::Uniform), (0, BindingKind::Uniform)];
        assert!(shape.check_entries(0, &dup).is_err());
    }

    #[test]
    fn duplicate_declarations_are_rejected() {
        let shape = BindGroupShape::new().uniform(0, S::VERTEX).texture(0, S::FRAGMENT);
        assert!(shape.validate(0).is_err());
        assert!(textured().validate(0).is_ok());
    }

    #[test]
    fn layout_entries_follow_declaration_order() {
        let entries = textured().layout_entries();
        let slots: Vec<u32> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(slots, vec![0, 1, 2]);
        assert_eq!(entries[0].visibility, S::VERTEX);
    }
}
