use crate::device::Context;

use super::{FrameTick, LoopEvent, ResizeEvent};

/// Something whose drawable size follows the window.
pub trait ResizeTarget {
    /// Applies the new size. Returns `false` when nothing changed.
    fn resize(&mut self, width: u32, height: u32) -> bool;
}

impl ResizeTarget for Context<'_> {
    fn resize(&mut self, width: u32, height: u32) -> bool {
        Context::resize(self, width, height)
    }
}

/// How frames are produced.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LoopMode {
    /// Render once, then only after a resize.
    #[default]
    Static,
    /// Render every tick and keep requesting the next one.
    Animated,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Directive {
    /// Render a frame now.
    Render,
    /// Request another tick.
    ScheduleNext,
}

/// Directives produced for one event.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Directives {
    render: bool,
    schedule_next: bool,
}

impl Directives {
    pub const NONE: Self = Self {
        render: false,
        schedule_next: false,
    };

    #[inline]
    pub fn render(self) -> bool {
        self.render
    }

    #[inline]
    pub fn schedule_next(self) -> bool {
        self.schedule_next
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        !self.render && !self.schedule_next
    }

    /// Directives in execution order: render before scheduling.
    pub fn iter(self) -> impl Iterator<Item = Directive> {
        [
            self.render.then_some(Directive::Render),
            self.schedule_next.then_some(Directive::ScheduleNext),
        ]
        .into_iter()
        .flatten()
    }
}

/// Turns resize and tick events into render directives.
#[derive(Debug, Clone)]
pub struct Scheduler {
    mode: LoopMode,
    halted: bool,
}

impl Scheduler {
    pub fn new(mode: LoopMode) -> Self {
        Self {
            mode,
            halted: false,
        }
    }

    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    /// Stops further [`Directive::ScheduleNext`]. The loop winds down after the
    /// tick already in flight.
    pub fn halt(&mut self) {
        if !self.halted {
            log::debug!("scheduler halted");
        }
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn handle(&mut self, event: LoopEvent, target: &mut impl ResizeTarget) -> Directives {
        match event {
            LoopEvent::Resize(resize) => self.on_resize(resize, target),
            LoopEvent::Tick(tick) => self.on_tick(&tick),
        }
    }

    /// Forwards the clamped size to `target`.
    ///
    /// Static loops re-render synchronously when the size changed; animated
    /// loops pick the new aspect up on their next tick.
    pub fn on_resize(&mut self, event: ResizeEvent, target: &mut impl ResizeTarget) -> Directives {
        let (width, height) = event.clamped();
        if !target.resize(width, height) {
            return Directives::NONE;
        }

        match self.mode {
            LoopMode::Static => Directives {
                render: true,
                schedule_next: false,
            },
            LoopMode::Animated => Directives::NONE,
        }
    }

    pub fn on_tick(&mut self, tick: &FrameTick) -> Directives {
        log::trace!("tick {} (dt {:.4}s)", tick.frame_index, tick.dt);
        Directives {
            render: true,
            schedule_next: self.mode == LoopMode::Animated && !self.halted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Surface {
        size: (u32, u32),
        calls: Vec<(u32, u32)>,
    }

    impl ResizeTarget for Surface {
        fn resize(&mut self, width: u32, height: u32) -> bool {
            self.calls.push((width, height));
            if self.size == (width, height) {
                return false;
            }
            self.size = (width, height);
            true
        }
    }

    fn tick(frame_index: u64) -> FrameTick {
        FrameTick {
            elapsed: 0.0,
            dt: 1.0 / 60.0,
            frame_index,
        }
    }

    #[test]
    fn static_resize_renders_once() {
        let mut s = Scheduler::new(LoopMode::Static);
        let mut target = Surface::default();

        let d = s.on_resize(ResizeEvent::new(800, 400), &mut target);
        assert_eq!(d.iter().collect::<Vec<_>>(), vec![Directive::Render]);
        assert_eq!(target.size, (800, 400));
    }

    #[test]
    fn unchanged_resize_is_a_no_op() {
        let mut s = Scheduler::new(LoopMode::Static);
        let mut target = Surface {
            size: (800, 400),
            calls: Vec::new(),
        };

        assert!(s.on_resize(ResizeEvent::new(800, 400), &mut target).is_empty());
    }

    #[test]
    fn zero_sizes_are_clamped_before_forwarding() {
        let mut s = Scheduler::new(LoopMode::Static);
        let mut target = Surface::default();

        s.handle(LoopEvent::Resize(ResizeEvent::new(0, 0)), &mut target);
        assert_eq!(target.calls, vec![(1, 1)]);
    }

    #[test]
    fn animated_resize_defers_to_next_tick() {
        let mut s = Scheduler::new(LoopMode::Animated);
        let mut target = Surface::default();
        assert!(s.on_resize(ResizeEvent::new(640, 480), &mut target).is_empty());
        assert_eq!(target.size, (640, 480));
    }

    #[test]
    fn animated_ticks_render_and_reschedule_until_halted() {
        let mut s = Scheduler::new(LoopMode::Animated);

        let d = s.on_tick(&tick(0));
        assert!(d.render() && d.schedule_next());
        assert_eq!(
            d.iter().collect::<Vec<_>>(),
            vec![Directive::Render, Directive::ScheduleNext]
        );

        s.halt();
        let d = s.on_tick(&tick(1));
        assert!(d.render());
        assert!(!d.schedule_next());
    }

    #[test]
    fn static_ticks_never_reschedule() {
        let mut s = Scheduler::new(LoopMode::Static);
        let d = s.on_tick(&tick(0));
        assert!(d.render());
        assert!(!d.schedule_next());
    }
}
