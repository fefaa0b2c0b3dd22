//! Input events and the per-entity input snapshot.

use std::collections::HashSet;

use crate::geometry::Point;

/// Keys the game cares about.  Anything else arrives as `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Escape,
    Other,
}

/// The movement keys, in the order their commands are issued.
pub const MOVEMENT_KEYS: [Key; 4] = [Key::Char('w'), Key::Char('s'), Key::Char('a'), Key::Char('d')];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseDown,
    Quit,
}

/// Supplies at most one pending event per frame plus the pointer position.
pub trait InputSource {
    fn poll_event(&mut self) -> Option<InputEvent>;

    /// Current pointer position in screen pixels.
    fn pointer(&self) -> Point;
}

/// What an entity knows about input this frame.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    last_pressed: Option<Key>,
    last_released: Option<Key>,
    current: Option<InputEvent>,
}

impl InputState {
    /// Store the frame's event.  It is applied by [`InputState::apply_current`].
    pub fn set_current(&mut self, event: Option<InputEvent>) {
        self.current = event;
    }

    pub fn current(&self) -> Option<InputEvent> {
        self.current
    }

    /// Fold the current event into the held-key table.
    pub fn apply_current(&mut self) {
        match self.current {
            Some(InputEvent::KeyDown(key)) => {
                self.held.insert(key);
                self.last_pressed = Some(key);
            }
            Some(InputEvent::KeyUp(key)) => {
                self.held.remove(&key);
                self.last_released = Some(key);
            }
            _ => {}
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn last_pressed(&self) -> Option<Key> {
        self.last_pressed
    }

    pub fn last_released(&self) -> Option<Key> {
        self.last_released
    }

    pub fn trigger_pulled(&self) -> bool {
        self.current == Some(InputEvent::MouseDown)
    }

    pub fn movement_keys_held(&self) -> usize {
        MOVEMENT_KEYS.iter().filter(|k| self.is_held(**k)).count()
    }

    /// True when `key` is held and no other movement key is.
    pub fn only_movement_key(&self, key: Key) -> bool {
        self.is_held(key) && self.movement_keys_held() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: &mut InputState, event: InputEvent) {
        state.set_current(Some(event));
        state.apply_current();
    }

    #[test]
    fn key_down_and_up_update_snapshot() {
        let mut s = InputState::default();
        apply(&mut s, InputEvent::KeyDown(Key::Char('w')));
        assert!(s.is_held(Key::Char('w')));
        assert_eq!(s.last_pressed(), Some(Key::Char('w')));

        apply(&mut s, InputEvent::KeyUp(Key::Char('w')));
        assert!(!s.is_held(Key::Char('w')));
        assert_eq!(s.last_released(), Some(Key::Char('w')));
    }

    #[test]
    fn only_movement_key_requires_a_single_key() {
        let mut s = InputState::default();
        apply(&mut s, InputEvent::KeyDown(Key::Char('w')));
        assert!(s.only_movement_key(Key::Char('w')));
        apply(&mut s, InputEvent::KeyDown(Key::Char('d')));
        assert!(!s.only_movement_key(Key::Char('w')));
        assert_eq!(s.movement_keys_held(), 2);
    }

    #[test]
    fn mouse_down_is_a_trigger_only_for_its_frame() {
        let mut s = InputState::default();
        apply(&mut s, InputEvent::MouseDown);
        assert!(s.trigger_pulled());
        s.set_current(None);
        assert!(!s.trigger_pulled());
    }
}
