//! Keep track of keyboard state between update ticks.

use hashbrown::HashMap;
use winit::keyboard::KeyCode;

use crate::event::KeyboardEvent;

/// State of a single key.
#[derive(Debug, Default, Clone, Copy)]
struct KeyState {
    /// Whether the key is being held down this update tick.
    is_down: bool,
    /// Whether the key was being held down the previous update tick.
    was_down_previous_tick: bool,
}

impl KeyState {
    /// Create a new state.
    const fn new(is_down: bool) -> Self {
        Self {
            is_down,
            was_down_previous_tick: false,
        }
    }

    /// Handle the state changes using the update tick to respond to changes.
    fn update(&mut self) {
        self.was_down_previous_tick = self.is_down;
    }

    /// Whether the key goes from released to pressed.
    const fn pressed(self) -> bool {
        !self.was_down_previous_tick && self.is_down
    }

    /// Whether the key goes from pressed to released.
    const fn released(self) -> bool {
        self.was_down_previous_tick && !self.is_down
    }
}

/// Keyboard state tracker.
///
/// Keyboard events are fed in as they arrive, [`Input::update`] must be called once after every update tick.
#[derive(Debug, Default)]
pub(crate) struct Input {
    /// All keys that have been touched.
    keys: HashMap<KeyCode, KeyState>,
}

impl Input {
    /// Register a keyboard event.
    #[inline]
    pub(crate) fn handle_event(&mut self, event: &KeyboardEvent) {
        let is_down = event.is_pressed();

        self.keys
            .entry(event.keycode)
            .and_modify(|state| state.is_down = is_down)
            .or_insert_with(|| KeyState::new(is_down));
    }

    /// Advance all keys by one update tick.
    #[inline]
    pub(crate) fn update(&mut self) {
        self.keys.values_mut().for_each(KeyState::update);
    }

    /// Whether the key is down.
    #[inline]
    #[must_use]
    pub(crate) fn key_held(&self, key: KeyCode) -> bool {
        self.keys.get(&key).is_some_and(|state| state.is_down)
    }

    /// Whether the key went down since the previous update tick.
    #[inline]
    #[must_use]
    pub(crate) fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys.get(&key).is_some_and(|state| state.pressed())
    }

    /// Whether the key went up since the previous update tick.
    #[inline]
    #[must_use]
    pub(crate) fn key_released(&self, key: KeyCode) -> bool {
        self.keys.get(&key).is_some_and(|state| state.released())
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::KeyCode;

    use super::Input;
    use crate::event::{ButtonState, KeyboardEvent};

    fn key(keycode: KeyCode, state: ButtonState) -> KeyboardEvent {
        KeyboardEvent {
            keycode,
            state,
            repeat: false,
        }
    }

    #[test]
    fn press_hold_release() {
        let mut input = Input::default();
        assert!(!input.key_held(KeyCode::KeyW));

        input.handle_event(&key(KeyCode::KeyW, ButtonState::Pressed));
        assert!(input.key_pressed(KeyCode::KeyW));
        assert!(input.key_held(KeyCode::KeyW));

        input.update();
        assert!(!input.key_pressed(KeyCode::KeyW));
        assert!(input.key_held(KeyCode::KeyW));

        input.handle_event(&key(KeyCode::KeyW, ButtonState::Released));
        assert!(input.key_released(KeyCode::KeyW));
        assert!(!input.key_held(KeyCode::KeyW));

        input.update();
        assert!(!input.key_released(KeyCode::KeyW));
    }

    #[test]
    fn tap_within_single_tick_is_not_seen() {
        let mut input = Input::default();
        input.handle_event(&key(KeyCode::Space, ButtonState::Pressed));
        input.handle_event(&key(KeyCode::Space, ButtonState::Released));

        assert!(!input.key_pressed(KeyCode::Space));
        assert!(!input.key_released(KeyCode::Space));
    }
}
