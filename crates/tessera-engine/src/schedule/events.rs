use crate::time::FrameTime;

/// New drawable size in physical pixels. Either side may be zero (minimised).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ResizeEvent {
    pub width: u32,
    pub height: u32,
}

impl ResizeEvent {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size with both sides clamped to at least 1.
    #[inline]
    pub fn clamped(self) -> (u32, u32) {
        (self.width.max(1), self.height.max(1))
    }
}

/// A display refresh opportunity.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTick {
    /// Seconds since the loop started.
    pub elapsed: f32,
    /// Seconds since the previous tick (clamped).
    pub dt: f32,
    pub frame_index: u64,
}

impl From<FrameTime> for FrameTick {
    fn from(t: FrameTime) -> Self {
        Self {
            elapsed: t.elapsed,
            dt: t.dt,
            frame_index: t.frame_index,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LoopEvent {
    Resize(ResizeEvent),
    Tick(FrameTick),
}
