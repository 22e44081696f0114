use crate::paint::Color;

/// Colour attachment settings for the single frame pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassConfig {
    pub label: String,
    pub clear: Color,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            label: "tessera frame pass".to_string(),
            clear: Color::rgb(0.3, 0.3, 0.3),
        }
    }
}

impl PassConfig {
    pub fn with_clear(mut self, clear: Color) -> Self {
        self.clear = clear;
        self
    }

    /// Attachment writing to `view`: clear to `clear`, then store.
    pub(crate) fn color_attachment<'a>(
        &self,
        view: &'a wgpu::TextureView,
    ) -> wgpu::RenderPassColorAttachment<'a> {
        wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear.to_wgpu()),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        }
    }
}
