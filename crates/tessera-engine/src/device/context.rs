use winit::window::Window;

use crate::error::{RenderError, Result};
use crate::resources::ResourcePool;

use super::surface;
use super::{GpuFrame, GpuInit, SurfaceErrorAction, SurfaceExtent};

/// Device, queue and the configured window surface.
///
/// The instance and adapter are only needed while connecting and are not kept.
/// The context tracks the surface extent, reconfigures on resize and hands out
/// frames to record into.
///
/// Every GPU object created through a context is only valid while the context
/// lives. There is no process-wide instance; callers pass `&Context` around.
pub struct Context<'w> {
    /// Surface bound to the window; the window must outlive the context.
    surface: wgpu::Surface<'w>,

    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    extent: SurfaceExtent,
}

impl<'w> Context<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        let extent = SurfaceExtent::new(size.width, size.height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::Unsupported(format!("failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::Unsupported(format!("no suitable GPU adapter: {e}")))?;

        let info = adapter.get_info();
        log::info!("using adapter `{}` ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&init.device_descriptor())
            .await
            .map_err(|e| RenderError::Unsupported(format!("failed to create device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, init.prefer_srgb)
            .ok_or_else(|| RenderError::Unsupported("surface reports no formats".into()))?;
        let alpha_mode = surface::choose_alpha_mode(&caps.alpha_modes, init.alpha_mode);
        let config = init.surface_config(format, alpha_mode, extent);

        surface.configure(&device, &config);
        log::info!(
            "surface configured: {:?} {}x{}",
            format,
            extent.width(),
            extent.height()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            extent,
        })
    }

    /// Returns the active surface format. Fixed for the life of the context.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn extent(&self) -> SurfaceExtent {
        self.extent
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Resource allocation front-end bound to this context's device and queue.
    pub fn resources(&self) -> ResourcePool<'_> {
        ResourcePool::new(&self.device, &self.queue)
    }

    /// Reconfigures the surface after a resize.
    ///
    /// Sides are clamped to 1. Returns `false` without touching the surface when
    /// the clamped size equals the current one; otherwise the surface is
    /// reconfigured and any previously acquired view is stale.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.extent.resize(width, height) {
            return false;
        }

        self.config.width = self.extent.width();
        self.config.height = self.extent.height();
        self.surface.configure(&self.device, &self.config);

        log::debug!(
            "surface resized to {}x{} (aspect {:.4})",
            self.extent.width(),
            self.extent.height(),
            self.extent.aspect()
        );
        true
    }

    /// Acquires the next surface texture and opens an encoder for it.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        Ok(GpuFrame::new(&self.device, surface_texture))
    }

    /// Submits the frame's commands and presents it.
    pub fn submit(&self, frame: GpuFrame) {
        frame.present(&self.queue);
    }

    /// Converts a `SurfaceError` into a higher-level action, reconfiguring when needed.
    pub fn handle_surface_error(&mut self, err: &wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = surface::classify_surface_error(err);
        if action == SurfaceErrorAction::Reconfigured {
            self.surface.configure(&self.device, &self.config);
        }
        log::warn!("surface error {err:?} -> {action:?}");
        action
    }
}
