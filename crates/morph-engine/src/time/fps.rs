use std::time::{Duration, Instant};

use super::FrameTime;

/// Averages frame rate over fixed reporting windows.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    window: Duration,
    started: Option<Instant>,
    frames: u32,
}

impl FpsMeter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            started: None,
            frames: 0,
        }
    }

    /// Records a frame. Returns the average fps once per elapsed window.
    pub fn record(&mut self, time: &FrameTime) -> Option<f32> {
        let started = *self.started.get_or_insert(time.now);
        self.frames += 1;

        let elapsed = time.now.saturating_duration_since(started);
        if elapsed < self.window {
            return None;
        }

        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.started = Some(time.now);
        self.frames = 0;
        Some(fps)
    }
}
