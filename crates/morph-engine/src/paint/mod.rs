//! Color model shared by the runtime (clear color) and the particle renderer.

pub mod color;

pub use color::{Color, ColorParseError};
