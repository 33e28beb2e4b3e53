use std::collections::HashSet;

use sdl2::{event::Event, keyboard::Scancode};

/// Snapshot of the keys held down this frame.
///
/// Built after the event queue is drained, so it reflects the continuous key state rather than
/// discrete key events.
#[derive(Default)]
pub struct KeyboardState {
    pub down: HashSet<Scancode>,
}

impl KeyboardState {
    /// Captures the held keys from SDL's keyboard state.
    pub fn capture(pump: &sdl2::EventPump) -> Self {
        Self::from_scancodes(pump.keyboard_state().pressed_scancodes())
    }

    pub fn from_scancodes(scancodes: impl IntoIterator<Item = Scancode>) -> Self {
        Self {
            down: scancodes.into_iter().collect(),
        }
    }

    /// Returns `true` if any of the given keys is held.
    pub fn any_down(&self, scancodes: &[Scancode]) -> bool {
        scancodes.iter().any(|scancode| self.down.contains(scancode))
    }
}

/// Context handed to the update step once per frame.
pub struct UpdateContext<'a> {
    pub keyboard: &'a KeyboardState,
    pub delta_time: f32,
}

impl<'a> UpdateContext<'a> {
    /// Creates a new `UpdateContext` from the given keyboard state and delta time in seconds.
    pub fn new(keyboard: &'a KeyboardState, delta_time: f32) -> Self {
        Self {
            keyboard,
            delta_time,
        }
    }
}

/// Returns `true` for the events that end the frame loop: a window close or an Escape press.
pub fn is_quit_event(event: &Event) -> bool {
    matches!(
        event,
        Event::Quit { .. }
            | Event::KeyDown {
                scancode: Some(Scancode::Escape),
                ..
            }
    )
}
