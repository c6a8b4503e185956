//! Events dispatched to the [`crate::Game`] callbacks.

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Whether a button went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    /// Button went down.
    Pressed,
    /// Button went up.
    Released,
}

impl From<ElementState> for ButtonState {
    #[inline]
    fn from(state: ElementState) -> Self {
        match state {
            ElementState::Pressed => Self::Pressed,
            ElementState::Released => Self::Released,
        }
    }
}

/// A key on the keyboard changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyboardEvent {
    /// Physical key, independent of the keyboard layout.
    pub keycode: KeyCode,
    /// Whether the key went down or up.
    pub state: ButtonState,
    /// Key is held down and the OS repeats the press.
    pub repeat: bool,
}

impl KeyboardEvent {
    /// Convert a winit keyboard event.
    ///
    /// Returns `None` for keys without a known physical key code.
    #[inline]
    #[must_use]
    pub fn from_winit(event: &KeyEvent) -> Option<Self> {
        let PhysicalKey::Code(keycode) = event.physical_key else {
            return None;
        };

        Some(Self {
            keycode,
            state: event.state.into(),
            repeat: event.repeat,
        })
    }

    /// Whether the key went down.
    #[inline]
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.state == ButtonState::Pressed
    }
}

/// Something happened to the window itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEventKind {
    /// Close button was clicked.
    Close,
    /// Window was minimized or fully hidden.
    Minimized,
    /// Window is visible again.
    Restored,
}
