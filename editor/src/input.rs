//! Pointer input tracking
//!
//! Translates raw windowing events into the press/drag/release
//! [`MouseEvent`]s consumed by the makers.

use glam::Vec2;
use std::collections::HashSet;
use tracing::trace;
use winit::event::{ElementState, MouseButton};

/// A pointer event in viewport coordinates
///
/// `press_pos` is the position at which the active button went down; for a
/// press event it equals `pos`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Current pointer position
    pub pos: Vec2,
    /// Position of the most recent press
    pub press_pos: Vec2,
    /// The engaged button
    pub button: MouseButton,
}

/// Tracks the current state of the pointer
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Pointer position in viewport coordinates
    pub mouse_position: Vec2,
    /// Position of the most recent button press
    pub press_position: Vec2,
    /// Currently pressed mouse buttons
    pub buttons_pressed: HashSet<MouseButton>,
    // Button driving the current gesture, if any.
    active_button: Option<MouseButton>,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the pointer position
    ///
    /// Returns a drag event while a button is held, `None` for plain hover.
    pub fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<MouseEvent> {
        self.mouse_position = Vec2::new(x, y);
        let button = self.active_button?;
        trace!(x = x, y = y, "Pointer drag");
        Some(MouseEvent {
            pos: self.mouse_position,
            press_pos: self.press_position,
            button,
        })
    }

    /// Handle a button transition, returning the synthesized event
    ///
    /// A press records the press position and arms dragging; releasing the
    /// active button ends the gesture.
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) -> MouseEvent {
        match state {
            ElementState::Pressed => {
                self.buttons_pressed.insert(button);
                self.press_position = self.mouse_position;
                self.active_button = Some(button);
                trace!(button = ?button, "Mouse button pressed");
            }
            ElementState::Released => {
                self.buttons_pressed.remove(&button);
                if self.active_button == Some(button) {
                    self.active_button = None;
                }
                trace!(button = ?button, "Mouse button released");
            }
        }
        MouseEvent {
            pos: self.mouse_position,
            press_pos: self.press_position,
            button,
        }
    }

    /// Check if a mouse button is currently pressed
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_records_position() {
        let mut state = InputState::new();
        state.handle_cursor_moved(100.0, 200.0);

        let event = state.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(event.pos, Vec2::new(100.0, 200.0));
        assert_eq!(event.press_pos, Vec2::new(100.0, 200.0));
        assert!(state.is_mouse_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_drag_keeps_press_position() {
        let mut state = InputState::new();
        state.handle_cursor_moved(10.0, 10.0);
        state.handle_mouse_button(MouseButton::Left, ElementState::Pressed);

        let drag = state.handle_cursor_moved(50.0, 60.0).unwrap();
        assert_eq!(drag.pos, Vec2::new(50.0, 60.0));
        assert_eq!(drag.press_pos, Vec2::new(10.0, 10.0));
        assert_eq!(drag.button, MouseButton::Left);
    }

    #[test]
    fn test_hover_is_not_a_drag() {
        let mut state = InputState::new();
        assert!(state.handle_cursor_moved(5.0, 5.0).is_none());

        state.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        state.handle_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(state.handle_cursor_moved(6.0, 6.0).is_none());
        assert!(!state.is_mouse_button_pressed(MouseButton::Left));
    }
}
