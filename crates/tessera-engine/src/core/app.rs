use crate::device::Context;
use crate::render::PassConfig;
use crate::scene::Scene;
use crate::schedule::{FrameTick, LoopMode};

/// Application contract driven by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// Builds the scene once the context exists. An error here is fatal.
    fn setup(&mut self, ctx: &Context<'_>) -> anyhow::Result<Scene>;

    fn loop_mode(&self) -> LoopMode {
        LoopMode::Static
    }

    fn pass_config(&self) -> PassConfig {
        PassConfig::default()
    }

    /// Called before every rendered frame, after any resize has been applied.
    fn update(&mut self, scene: &mut Scene, ctx: &Context<'_>, tick: &FrameTick) {
        let _ = (scene, ctx, tick);
    }
}
