//! Morph engine crate.
//!
//! Owns the platform + GPU runtime (window, device, input, timing, logging)
//! and the two GPU passes of the particle morph: the simulation pass that
//! blends position maps into an offscreen target, and the display pass that
//! draws one sprite per particle from it.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
