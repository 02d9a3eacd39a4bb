//! Input handling

use glam::Vec2;
use std::collections::HashSet;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Input state manager
#[derive(Debug)]
pub struct Input {
    /// Currently pressed keys
    pressed_keys: HashSet<KeyCode>,
    /// Keys that were just pressed this frame
    just_pressed_keys: HashSet<KeyCode>,
    /// Keys that were just released this frame
    just_released_keys: HashSet<KeyCode>,
    /// Raw mouse movement accumulated this frame
    mouse_delta: Vec2,
    /// Scroll wheel delta this frame
    scroll_delta: Vec2,
}

impl Input {
    /// Create a new input manager
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            just_pressed_keys: HashSet::new(),
            just_released_keys: HashSet::new(),
            mouse_delta: Vec2::ZERO,
            scroll_delta: Vec2::ZERO,
        }
    }

    /// Call at the end of each frame to clear per-frame state
    pub fn update(&mut self) {
        self.just_pressed_keys.clear();
        self.just_released_keys.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    /// Process a keyboard event
    ///
    /// Returns `true` when the event changed the held state of the key
    /// (key repeat does not).
    pub fn process_keyboard(&mut self, key_code: KeyCode, state: ElementState) -> bool {
        match state {
            ElementState::Pressed => {
                let newly_pressed = self.pressed_keys.insert(key_code);
                if newly_pressed {
                    self.just_pressed_keys.insert(key_code);
                }
                newly_pressed
            }
            ElementState::Released => {
                let was_pressed = self.pressed_keys.remove(&key_code);
                self.just_released_keys.insert(key_code);
                was_pressed
            }
        }
    }

    /// Release every held key, as when the window loses focus
    ///
    /// Returns the keys that were held.
    pub fn release_all(&mut self) -> Vec<KeyCode> {
        let released: Vec<KeyCode> = self.pressed_keys.drain().collect();
        self.just_released_keys.extend(released.iter().copied());
        released
    }

    /// Process raw mouse delta
    pub fn process_mouse_delta(&mut self, delta: Vec2) {
        self.mouse_delta += delta;
    }

    /// Process scroll wheel
    pub fn process_scroll(&mut self, delta: Vec2) {
        self.scroll_delta += delta;
    }

    /// Check if a key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Check if a key was just pressed this frame
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// Check if a key was just released this frame
    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.just_released_keys.contains(&key)
    }

    /// Get mouse movement delta this frame
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Get scroll wheel delta this frame
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut input = Input::new();

        assert!(input.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
        assert!(input.is_key_pressed(KeyCode::KeyW));
        assert!(input.is_key_just_pressed(KeyCode::KeyW));

        input.update();
        assert!(input.is_key_pressed(KeyCode::KeyW));
        assert!(!input.is_key_just_pressed(KeyCode::KeyW));

        assert!(input.process_keyboard(KeyCode::KeyW, ElementState::Released));
        assert!(!input.is_key_pressed(KeyCode::KeyW));
        assert!(input.is_key_just_released(KeyCode::KeyW));
    }

    #[test]
    fn test_release_all_clears_held_keys() {
        let mut input = Input::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);

        let mut released = input.release_all();
        released.sort();
        let mut expected = vec![KeyCode::KeyW, KeyCode::KeyD];
        expected.sort();
        assert_eq!(released, expected);

        assert!(!input.is_key_pressed(KeyCode::KeyW));
        assert!(!input.is_key_pressed(KeyCode::KeyD));
        assert!(input.is_key_just_released(KeyCode::KeyW));
        assert!(input.release_all().is_empty());
    }

    #[test]
    fn test_key_repeat_is_not_a_change() {
        let mut input = Input::new();

        assert!(input.process_keyboard(KeyCode::Space, ElementState::Pressed));
        input.update();
        assert!(!input.process_keyboard(KeyCode::Space, ElementState::Pressed));
        assert!(!input.is_key_just_pressed(KeyCode::Space));
    }

    #[test]
    fn test_mouse_delta_accumulates_and_clears() {
        let mut input = Input::new();

        input.process_mouse_delta(Vec2::new(1.0, 2.0));
        input.process_mouse_delta(Vec2::new(3.0, -1.0));
        assert_eq!(input.mouse_delta(), Vec2::new(4.0, 1.0));

        input.update();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }
}
