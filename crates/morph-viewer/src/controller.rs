use std::f64::consts::FRAC_PI_2;

use morph_engine::core::AppControl;
use morph_engine::input::{InputFrame, Key, MouseButton};
use morph_engine::render::particles::BLEND_SPEED;

/// Blend time added per rendered frame while animating.
pub const BLEND_STEP: f64 = 0.01;

/// Blend time one click adds to the target: a quarter period of
/// `|sin(BLEND_SPEED * t)|`, i.e. one full transition between the models.
pub const CLICK_SPAN: f64 = FRAC_PI_2 / BLEND_SPEED as f64;

/// Period of `|sin(BLEND_SPEED * t)|`.
const BLEND_PERIOD: f64 = 2.0 * CLICK_SPAN;

/// Simulated blend time.
///
/// Idle until the first click; afterwards the time grows by [`BLEND_STEP`]
/// per frame until it reaches `clicks * CLICK_SPAN`, then holds. Clicks are
/// never capped, so every click extends the target by another span.
///
/// Time is kept in `f64`; the shader only sees it reduced modulo the blend
/// period, so the `f32` uniform stays precise however long the clock runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlendClock {
    time: f64,
    clicks: u32,
    animating: bool,
}

impl BlendClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&mut self) {
        self.clicks = self.clicks.saturating_add(1);
        self.animating = true;
    }

    /// Advances one frame and returns the time to upload as `u_time`.
    pub fn advance(&mut self) -> f32 {
        if self.animating {
            self.time = (self.time + BLEND_STEP).min(self.target());
        }
        self.shader_time()
    }

    /// Back to the idle state at time 0.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Current time folded into one blend period.
    pub fn shader_time(&self) -> f32 {
        self.time.rem_euclid(BLEND_PERIOD) as f32
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn target(&self) -> f64 {
        f64::from(self.clicks) * CLICK_SPAN
    }

    /// Whether the clock has reached its target and is holding.
    pub fn is_holding(&self) -> bool {
        self.time >= self.target()
    }

    /// Blend factor the simulation pass derives from the current time.
    pub fn blend(&self) -> f32 {
        (self.shader_time() * BLEND_SPEED).sin().abs()
    }
}

/// Maps per-frame input onto the blend clock.
///
/// Every left click and every Space press counts as a click, even when
/// several land in the same frame. `R` resets the clock; Escape exits.
#[derive(Debug, Default)]
pub struct InteractionController {
    clock: BlendClock,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_input(&mut self, frame: &InputFrame) -> AppControl {
        if frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        if frame.key_pressed(Key::R) {
            self.clock.reset();
            log::info!("morph reset");
        }

        let clicks = frame.presses(MouseButton::Left) + frame.key_presses(Key::Space);
        if clicks > 0 {
            for _ in 0..clicks {
                self.clock.click();
            }
            log::debug!(
                "click #{}: blend target {:.3} (time {:.3})",
                self.clock.clicks(),
                self.clock.target(),
                self.clock.time()
            );
        }

        AppControl::Continue
    }

    /// Advances the clock one frame; returns the blend time to render with.
    pub fn advance(&mut self) -> f32 {
        self.clock.advance()
    }

    pub fn clock(&self) -> &BlendClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use morph_engine::input::{ButtonState, InputEvent, InputState, Modifiers, PointerButtonEvent};

    use super::*;

    fn run_frames(clock: &mut BlendClock, frames: usize) {
        for _ in 0..frames {
            clock.advance();
        }
    }

    fn frames_per_span() -> usize {
        (CLICK_SPAN / BLEND_STEP).ceil() as usize
    }

    #[test]
    fn no_clicks_keeps_first_model() {
        let mut clock = BlendClock::new();
        run_frames(&mut clock, 10_000);
        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.blend(), 0.0);
        assert!(!clock.is_animating());
    }

    #[test]
    fn one_click_transitions_fully_then_holds() {
        let mut clock = BlendClock::new();
        clock.click();

        clock.advance();
        assert!((clock.time() - BLEND_STEP).abs() < 1e-6);

        run_frames(&mut clock, frames_per_span() + 50);
        assert_eq!(clock.time(), CLICK_SPAN);
        assert!(clock.is_holding());
        assert!((clock.blend() - 1.0).abs() < 1e-5);

        run_frames(&mut clock, 100);
        assert_eq!(clock.time(), CLICK_SPAN);
    }

    #[test]
    fn clicks_accumulate_without_bound() {
        let mut clock = BlendClock::new();
        for _ in 0..3 {
            clock.click();
        }
        assert_eq!(clock.target(), 3.0 * CLICK_SPAN);

        run_frames(&mut clock, 3 * frames_per_span() + 10);
        assert!((clock.time() - 3.0 * CLICK_SPAN).abs() < 1e-3);
    }

    #[test]
    fn blend_stays_in_unit_range() {
        let mut clock = BlendClock::new();
        for _ in 0..20 {
            clock.click();
        }
        for _ in 0..20 * frames_per_span() {
            let b = clock.blend();
            assert!((0.0..=1.0).contains(&b));
            clock.advance();
        }
    }

    #[test]
    fn clock_keeps_moving_past_f32_precision() {
        // 2^18: from here on an `f32` time no longer grows by one step.
        let mut clock = BlendClock {
            time: 262_144.0,
            clicks: 70_000,
            animating: true,
        };
        for _ in 0..100 {
            let before = clock.time();
            clock.advance();
            assert!((clock.time() - before - BLEND_STEP).abs() < 1e-9);
        }
        assert!(!clock.is_holding());
    }

    #[test]
    fn shader_time_stays_in_one_period() {
        for clicks in [1u32, 2, 7, 70_001] {
            let mut clock = BlendClock::new();
            for _ in 0..clicks {
                clock.click();
            }
            clock.time = clock.target() - 0.25;
            for _ in 0..50 {
                let t = clock.advance();
                assert!((0.0..(2.0 * CLICK_SPAN) as f32 + 1e-3).contains(&t));

                let full = (clock.time() * f64::from(BLEND_SPEED)).sin().abs() as f32;
                assert!((clock.blend() - full).abs() < 1e-4, "time {}", clock.time());
            }
            assert!(clock.is_holding());
            // Odd click counts hold on the second model, even ones on the first.
            let expected = if clicks % 2 == 1 { 1.0 } else { 0.0 };
            assert!((clock.blend() - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut clock = BlendClock::new();
        clock.click();
        run_frames(&mut clock, 20);
        clock.reset();
        assert_eq!(clock, BlendClock::new());
    }

    fn frame_with(events: Vec<InputEvent>) -> InputFrame {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        for ev in events {
            state.apply_event(&mut frame, ev);
        }
        frame
    }

    fn left(state: ButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x: 0.0,
            y: 0.0,
            modifiers: Modifiers::default(),
        })
    }

    fn key(key: Key) -> InputEvent {
        key_event(key, ButtonState::Pressed)
    }

    fn key_up(key: Key) -> InputEvent {
        key_event(key, ButtonState::Released)
    }

    fn key_event(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            modifiers: Modifiers::default(),
            repeat: false,
        }
    }

    #[test]
    fn left_click_and_space_both_count() {
        let mut ctl = InteractionController::new();
        let frame = frame_with(vec![
            left(ButtonState::Pressed),
            left(ButtonState::Released),
            left(ButtonState::Pressed),
            key(Key::Space),
        ]);
        assert_eq!(ctl.handle_input(&frame), AppControl::Continue);
        assert_eq!(ctl.clock().clicks(), 3);
        assert!(ctl.clock().is_animating());
    }

    #[test]
    fn repeated_space_presses_in_one_frame_each_count() {
        let mut ctl = InteractionController::new();
        let frame = frame_with(vec![
            key(Key::Space),
            key_up(Key::Space),
            key(Key::Space),
            key_up(Key::Space),
            key(Key::Space),
        ]);
        ctl.handle_input(&frame);
        assert_eq!(ctl.clock().clicks(), 3);
        assert_eq!(ctl.clock().target(), 3.0 * CLICK_SPAN);
    }

    #[test]
    fn reset_key_and_escape() {
        let mut ctl = InteractionController::new();
        ctl.handle_input(&frame_with(vec![left(ButtonState::Pressed)]));
        ctl.advance();
        assert!(ctl.clock().time() > 0.0);

        ctl.handle_input(&frame_with(vec![key(Key::R)]));
        assert_eq!(ctl.clock().time(), 0.0);
        assert_eq!(ctl.clock().clicks(), 0);

        assert_eq!(ctl.handle_input(&frame_with(vec![key(Key::Escape)])), AppControl::Exit);
    }
}
