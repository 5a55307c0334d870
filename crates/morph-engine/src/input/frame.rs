use std::collections::HashSet;

use super::types::{InputEvent, Key, MouseButton};

/// Per-frame input deltas.
///
/// `InputState` provides the current state (held keys/buttons, pointer position).
/// `InputFrame` provides events and transition sets for the current frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Number of presses per button this frame. A fast double click within a
    /// single frame counts twice here but once in `buttons_pressed`.
    pub press_counts: Vec<(MouseButton, u32)>,

    /// Non-repeat presses per key this frame, counted like `press_counts`.
    pub key_press_counts: Vec<(Key, u32)>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.press_counts.clear();
        self.key_press_counts.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// How many times `button` went down during this frame.
    pub fn presses(&self, button: MouseButton) -> u32 {
        count_of(&self.press_counts, button)
    }

    /// How many times `key` went down during this frame, auto-repeat excluded.
    pub fn key_presses(&self, key: Key) -> u32 {
        count_of(&self.key_press_counts, key)
    }

    pub(crate) fn count_press(&mut self, button: MouseButton) {
        bump(&mut self.press_counts, button);
    }

    pub(crate) fn count_key_press(&mut self, key: Key) {
        bump(&mut self.key_press_counts, key);
    }
}

fn count_of<T: PartialEq>(counts: &[(T, u32)], item: T) -> u32 {
    counts.iter().find(|(t, _)| *t == item).map_or(0, |(_, n)| *n)
}

fn bump<T: PartialEq>(counts: &mut Vec<(T, u32)>, item: T) {
    match counts.iter_mut().find(|(t, _)| *t == item) {
        Some((_, n)) => *n += 1,
        None => counts.push((item, 1)),
    }
}
