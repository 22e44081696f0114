use anyhow::{anyhow, Context as _, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::App;
use crate::device::{Context, GpuInit, SurfaceErrorAction};
use crate::error::RenderError;
use crate::render::FrameRenderer;
use crate::scene::Scene;
use crate::schedule::{Directive, FrameTick, LoopEvent, ResizeEvent, Scheduler};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tessera".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, builds the scene through `app` and runs the event loop
    /// until the window closes, Escape is pressed or a fatal error occurs.
    ///
    /// A fatal error is logged once and returned.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,
    scheduler: Scheduler,
    renderer: FrameRenderer,
    scene: Scene,

    window: Window,

    #[borrows(window)]
    #[covariant]
    ctx: Context<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            fatal: None,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let mut entry = WindowEntryTryBuilder {
            clock: FrameClock::new(),
            scheduler: Scheduler::new(self.app.loop_mode()),
            renderer: FrameRenderer::new(self.app.pass_config()),
            scene: Scene::new(),
            window,
            ctx_builder: |w| pollster::block_on(Context::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let app = &mut self.app;
        entry.with_mut(|fields| -> Result<()> {
            *fields.scene = app.setup(fields.ctx).context("scene setup failed")?;
            Ok(())
        })?;

        log::info!(
            "window `{}` ready ({:?} loop)",
            self.config.title,
            self.app.loop_mode()
        );
        Ok(entry)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if let Some(entry) = self.entry.as_mut() {
            entry.with_scheduler_mut(|s| s.halt());
        }
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: LoopEvent) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if let Err(err) = drive(&mut self.app, entry, event) {
            self.fail(event_loop, err);
        }
    }
}

/// Feeds one event through the scheduler and carries out its directives.
fn drive<A: App>(app: &mut A, entry: &mut WindowEntry, event: LoopEvent) -> Result<()> {
    entry.with_mut(|fields| {
        let directives = fields.scheduler.handle(event, fields.ctx);

        for directive in directives.iter() {
            match directive {
                Directive::Render => {
                    let tick = match event {
                        LoopEvent::Tick(tick) => tick,
                        LoopEvent::Resize(_) => FrameTick::from(fields.clock.tick()),
                    };
                    app.update(fields.scene, fields.ctx, &tick);
                    render_frame(fields.renderer, fields.ctx, fields.scene, fields.window)?;
                }
                Directive::ScheduleNext => fields.window.request_redraw(),
            }
        }
        Ok(())
    })
}

fn render_frame(
    renderer: &mut FrameRenderer,
    ctx: &mut Context<'_>,
    scene: &mut Scene,
    window: &Window,
) -> Result<()> {
    match renderer.render(ctx, scene) {
        Ok(_) => Ok(()),
        Err(RenderError::Surface(err)) => match ctx.handle_surface_error(&err) {
            SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                window.request_redraw();
                Ok(())
            }
            SurfaceErrorAction::Fatal => Err(anyhow!("unrecoverable surface error: {err}")),
        },
        Err(err) => Err(anyhow::Error::new(err).context("frame rendering failed")),
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.fatal.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Redraws are requested by the scheduler only.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event: key, .. }
                if key.state == ElementState::Pressed
                    && key.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                self.entry = None;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.dispatch(
                    event_loop,
                    LoopEvent::Resize(ResizeEvent::new(size.width, size.height)),
                );
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let Some(size) = self
                    .entry
                    .as_ref()
                    .map(|e| e.with_window(|w| w.inner_size()))
                else {
                    return;
                };
                self.dispatch(
                    event_loop,
                    LoopEvent::Resize(ResizeEvent::new(size.width, size.height)),
                );
            }

            WindowEvent::RedrawRequested => {
                let Some(tick) = self
                    .entry
                    .as_mut()
                    .map(|e| e.with_clock_mut(|c| FrameTick::from(c.tick())))
                else {
                    return;
                };
                self.dispatch(event_loop, LoopEvent::Tick(tick));
            }

            _ => {}
        }
    }
}
