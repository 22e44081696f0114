//! Frame scheduling.
//!
//! The window runtime translates platform events into [`LoopEvent`]s; the
//! [`Scheduler`] turns them into [`Directives`] (render now, schedule another
//! frame). Resizes are applied to a [`ResizeTarget`] before any directive is
//! returned, so a render that follows always sees the new extent.

mod events;
mod scheduler;

pub use events::{FrameTick, LoopEvent, ResizeEvent};
pub use scheduler::{Directive, Directives, LoopMode, ResizeTarget, Scheduler};
