//! Input snapshot
//!
//! The host polls the window system and feeds key/button transitions and
//! pointer motion in here once per frame; gameplay code only ever reads the
//! resulting snapshot (held state, just-pressed edges, pointer position).
//! Call [`Input::end_frame`] after the update pass to retire the per-frame
//! edge sets.

use glam::Vec2;
use rustc_hash::FxHashSet;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Movement key bindings for player and camera controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub strafe_left: KeyCode,
    pub strafe_right: KeyCode,
}

impl MoveBindings {
    /// WASD layout.
    #[must_use]
    pub const fn wasd() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            strafe_left: KeyCode::KeyA,
            strafe_right: KeyCode::KeyD,
        }
    }

    /// Arrow-key layout.
    #[must_use]
    pub const fn arrows() -> Self {
        Self {
            forward: KeyCode::ArrowUp,
            backward: KeyCode::ArrowDown,
            strafe_left: KeyCode::ArrowLeft,
            strafe_right: KeyCode::ArrowRight,
        }
    }
}

impl Default for MoveBindings {
    fn default() -> Self {
        Self::wasd()
    }
}

/// Per-frame input state.
#[derive(Debug, Default)]
pub struct Input {
    pressed_keys: FxHashSet<KeyCode>,
    just_pressed_keys: FxHashSet<KeyCode>,
    pressed_buttons: FxHashSet<MouseButton>,
    just_pressed_buttons: FxHashSet<MouseButton>,
    pointer_position: Vec2,
    pointer_delta: Vec2,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Retire the per-frame edge sets. Call once per frame, after update.
    pub fn end_frame(&mut self) {
        self.just_pressed_keys.clear();
        self.just_pressed_buttons.clear();
        self.pointer_delta = Vec2::ZERO;
    }

    /// Feed a keyboard transition from the host.
    pub fn key_event(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed_keys.insert(key) {
                    self.just_pressed_keys.insert(key);
                }
            }
            ElementState::Released => {
                self.pressed_keys.remove(&key);
            }
        }
    }

    /// Feed a mouse button transition from the host.
    pub fn mouse_button_event(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed_buttons.insert(button) {
                    self.just_pressed_buttons.insert(button);
                }
            }
            ElementState::Released => {
                self.pressed_buttons.remove(&button);
            }
        }
    }

    /// Feed an absolute pointer position from the host.
    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer_delta += position - self.pointer_position;
        self.pointer_position = position;
    }

    /// Feed a raw relative pointer delta (mouse-look while captured).
    pub fn pointer_delta_raw(&mut self, delta: Vec2) {
        self.pointer_delta += delta;
    }

    #[must_use]
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// True only on the frame the key went down.
    #[must_use]
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    #[must_use]
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Click edge: true only on the frame the button went down, not while
    /// held. This is what menu buttons test for.
    #[must_use]
    pub fn is_clicked_once(&self, button: MouseButton) -> bool {
        self.just_pressed_buttons.contains(&button)
    }

    #[must_use]
    pub fn pointer_position(&self) -> Vec2 {
        self.pointer_position
    }

    #[must_use]
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_just_pressed_is_an_edge() {
        let mut input = Input::new();
        input.key_event(KeyCode::KeyA, ElementState::Pressed);
        assert!(input.is_key_down(KeyCode::KeyA));
        assert!(input.is_key_just_pressed(KeyCode::KeyA));

        // Next frame: still held, no longer an edge
        input.end_frame();
        assert!(input.is_key_down(KeyCode::KeyA));
        assert!(!input.is_key_just_pressed(KeyCode::KeyA));
    }

    #[test]
    fn test_repeat_press_while_held_is_not_an_edge() {
        let mut input = Input::new();
        input.key_event(KeyCode::Space, ElementState::Pressed);
        input.end_frame();

        // OS key-repeat delivers another Pressed without a Release
        input.key_event(KeyCode::Space, ElementState::Pressed);
        assert!(!input.is_key_just_pressed(KeyCode::Space));
    }

    #[test]
    fn test_click_once_resets_after_frame() {
        let mut input = Input::new();
        input.mouse_button_event(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_clicked_once(MouseButton::Left));

        input.end_frame();
        assert!(input.is_button_down(MouseButton::Left));
        assert!(!input.is_clicked_once(MouseButton::Left));

        input.mouse_button_event(MouseButton::Left, ElementState::Released);
        input.mouse_button_event(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_clicked_once(MouseButton::Left));
    }

    #[test]
    fn test_pointer_delta_accumulates_within_frame() {
        let mut input = Input::new();
        input.pointer_moved(Vec2::new(10.0, 0.0));
        input.pointer_moved(Vec2::new(15.0, 5.0));
        assert_eq!(input.pointer_delta(), Vec2::new(15.0, 5.0));
        assert_eq!(input.pointer_position(), Vec2::new(15.0, 5.0));

        input.end_frame();
        assert_eq!(input.pointer_delta(), Vec2::ZERO);
    }
}
