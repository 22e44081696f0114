use crate::error::{RenderError, Result};

/// Interleaved vertex buffer layout.
///
/// Must describe the exact byte layout the vertex buffer is filled with; a
/// wrong stride or offset renders garbage rather than failing, so the builder
/// checks what it can (stride overflow, overlap, duplicate locations) and the
/// scene checks that uploaded geometry uses the same stride.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    pub stride: u64,
    pub step_mode: wgpu::VertexStepMode,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    pub fn new(stride: u64) -> Self {
        Self {
            stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Vec::new(),
        }
    }

    /// Layout whose stride is `size_of::<V>()`.
    pub fn of<V: bytemuck::Pod>() -> Self {
        Self::new(std::mem::size_of::<V>() as u64)
    }

    pub fn attribute(mut self, location: u32, offset: u64, format: wgpu::VertexFormat) -> Self {
        self.attributes.push(wgpu::VertexAttribute {
            format,
            offset,
            shader_location: location,
        });
        self
    }

    pub fn instanced(mut self) -> Self {
        self.step_mode = wgpu::VertexStepMode::Instance;
        self
    }

    pub(crate) fn validate(&self, label: &str) -> Result<()> {
        if self.stride == 0 {
            return Err(RenderError::resource(label, "vertex stride is zero"));
        }

        let mut spans: Vec<(u64, u64, u32)> = Vec::with_capacity(self.attributes.len());
        for a in &self.attributes {
            let end = a.offset + a.format.size();
            if end > self.stride {
                return Err(RenderError::resource(
                    label,
                    format!(
                        "attribute @location({}) ends at byte {end}, past stride {}",
                        a.shader_location, self.stride
                    ),
                ));
            }
            if spans.iter().any(|(_, _, loc)| *loc == a.shader_location) {
                return Err(RenderError::resource(
                    label,
                    format!("@location({}) used twice", a.shader_location),
                ));
            }
            spans.push((a.offset, end, a.shader_location));
        }

        spans.sort_by_key(|s| s.0);
        for w in spans.windows(2) {
            if w[1].0 < w[0].1 {
                return Err(RenderError::resource(
                    label,
                    format!("@location({}) overlaps @location({})", w[1].2, w[0].2),
                ));
            }
        }

        Ok(())
    }

    pub(crate) fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: self.step_mode,
            attributes: &self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::VertexFormat as F;

    #[test]
    fn position_color_layout_is_valid() {
        let layout = VertexLayout::new(20)
            .attribute(0, 0, F::Float32x2)
            .attribute(1, 8, F::Float32x3);
        layout.validate("pc").unwrap();
        assert_eq!(layout.as_wgpu().array_stride, 20);
    }

    #[test]
    fn attribute_past_stride_is_rejected() {
        let layout = VertexLayout::new(12).attribute(0, 4, F::Float32x3);
        assert!(matches!(
            layout.validate("bad"),
            Err(RenderError::ResourceCreation { .. })
        ));
    }

    #[test]
    fn overlapping_attributes_are_rejected() {
        let layout = VertexLayout::new(16)
            .attribute(0, 0, F::Float32x2)
            .attribute(1, 4, F::Float32x2);
        assert!(layout.validate("overlap").is_err());
    }

    #[test]
    fn duplicate_locations_are_rejected() {
        let layout = VertexLayout::new(16)
            .attribute(0, 0, F::Float32x2)
            .attribute(0, 8, F::Float32x2);
        assert!(layout.validate("dup").is_err());
    }

    #[test]
    fn stride_from_type() {
        assert_eq!(VertexLayout::of::<[f32; 3]>().stride, 12);
    }
}
