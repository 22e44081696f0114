//! Colour model shared by pass configuration and applications.

pub mod color;

pub use color::Color;
