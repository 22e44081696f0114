/// Surface texture acquired for one frame and the encoder recording into it.
///
/// Dropping a frame without presenting it discards the recorded commands.
pub struct GpuFrame {
    surface_texture: wgpu::SurfaceTexture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    pub(crate) fn new(device: &wgpu::Device, surface_texture: wgpu::SurfaceTexture) -> Self {
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tessera frame encoder"),
        });
        Self {
            surface_texture,
            view,
            encoder,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn encoder_mut(&mut self) -> &mut wgpu::CommandEncoder {
        &mut self.encoder
    }

    /// Submits the encoder and presents the surface texture.
    pub(crate) fn present(self, queue: &wgpu::Queue) {
        let Self {
            surface_texture,
            view,
            encoder,
        } = self;
        queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }
}
