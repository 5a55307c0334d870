//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers, bind groups).
//! The particle renderers live in [`particles`]; [`targets`] holds the
//! position textures they exchange.

mod ctx;
pub mod particles;
pub mod targets;

pub use ctx::{RenderCtx, RenderTarget};
