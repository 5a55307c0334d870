//! Time subsystem.
//!
//! Provides frame timing utilities without coupling to the runtime:
//! - one `FrameClock` per window, `tick()` once per presented frame
//! - `FpsMeter` to report average frame rate over a window of time

mod fps;
mod frame_clock;

pub use fps::FpsMeter;
pub use frame_clock::{FrameClock, FrameTime};
