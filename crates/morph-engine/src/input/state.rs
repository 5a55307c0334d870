use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton, PointerButtonEvent, PointerMoveEvent};

/// Current input state for a single window.
///
/// Holds "is down" information and current pointer position.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered to unfocused windows.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, modifiers, repeat } => {
                self.modifiers = *modifiers;
                match state {
                    ButtonState::Pressed if !*repeat => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                            frame.count_key_press(*key);
                        }
                    }
                    ButtonState::Pressed => {}
                    ButtonState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;

                match state {
                    ButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                            frame.count_press(*button);
                        }
                    }
                    ButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: MouseButton, state: ButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state,
            x: 10.0,
            y: 20.0,
            modifiers: Modifiers::default(),
        })
    }

    fn key(key: Key, state: ButtonState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), repeat }
    }

    #[test]
    fn click_is_recorded_once_per_press() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(MouseButton::Left, ButtonState::Pressed));
        state.apply_event(&mut frame, press(MouseButton::Left, ButtonState::Released));
        state.apply_event(&mut frame, press(MouseButton::Left, ButtonState::Pressed));

        assert_eq!(frame.presses(MouseButton::Left), 2);
        assert!(frame.buttons_pressed.contains(&MouseButton::Left));
        assert_eq!(frame.presses(MouseButton::Right), 0);
        assert_eq!(state.pointer_pos, Some((10.0, 20.0)));
    }

    #[test]
    fn held_button_does_not_press_again() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(MouseButton::Left, ButtonState::Pressed));
        state.apply_event(&mut frame, press(MouseButton::Left, ButtonState::Pressed));
        assert_eq!(frame.presses(MouseButton::Left), 1);
    }

    #[test]
    fn key_repeat_is_not_a_new_press() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Space, ButtonState::Pressed, false));
        frame.clear();
        state.apply_event(&mut frame, key(Key::Space, ButtonState::Pressed, true));
        assert!(!frame.key_pressed(Key::Space));
        assert_eq!(frame.key_presses(Key::Space), 0);
        assert!(state.key_down(Key::Space));
    }

    #[test]
    fn key_presses_are_counted_within_a_frame() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Space, ButtonState::Pressed, false));
        state.apply_event(&mut frame, key(Key::Space, ButtonState::Pressed, true));
        state.apply_event(&mut frame, key(Key::Space, ButtonState::Released, false));
        state.apply_event(&mut frame, key(Key::Space, ButtonState::Pressed, false));

        assert_eq!(frame.key_presses(Key::Space), 2);
        assert!(frame.key_pressed(Key::Space));
        assert_eq!(frame.key_presses(Key::R), 0);

        frame.clear();
        assert_eq!(frame.key_presses(Key::Space), 0);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::R, ButtonState::Pressed, false));
        state.apply_event(&mut frame, press(MouseButton::Left, ButtonState::Pressed));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.key_down(Key::R));
        assert!(!state.button_down(MouseButton::Left));
    }

    #[test]
    fn clear_resets_frame_deltas() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(MouseButton::Left, ButtonState::Pressed));
        frame.clear();
        assert_eq!(frame.presses(MouseButton::Left), 0);
        assert!(frame.events.is_empty());
    }
}
