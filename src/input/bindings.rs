//! Key bindings for the ball controls
//!
//! Physical keys map to logical actions. The four movement actions compose
//! into a single 2D move axis; `Jump` is a button.
//!
//! # Example
//!
//! ```ignore
//! let mapper = InputMapper::with_defaults();
//!
//! // Called from the input-event callback
//! controller.on_move(mapper.move_axis(&ctx.input));
//! if mapper.is_action_just_pressed(&ctx.input, InputAction::Jump) {
//!     controller.on_jump();
//! }
//! ```

use glam::Vec2;
use rustc_hash::FxHashMap;
use winit::keyboard::KeyCode;

use crate::input::Input;

/// Logical input actions for the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Positive Y on the move axis
    MoveForward,
    /// Negative Y on the move axis
    MoveBackward,
    /// Negative X on the move axis
    MoveLeft,
    /// Positive X on the move axis
    MoveRight,
    /// Jump
    Jump,
}

/// Maps physical inputs to logical actions.
///
/// Supports runtime rebinding and querying of key-to-action mappings.
#[derive(Debug, Clone)]
pub struct InputMapper {
    /// Key to action bindings
    key_bindings: FxHashMap<KeyCode, InputAction>,
    /// Reverse lookup: action to keys
    action_keys: FxHashMap<InputAction, Vec<KeyCode>>,
}

impl InputMapper {
    /// Create an empty input mapper.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key_bindings: FxHashMap::default(),
            action_keys: FxHashMap::default(),
        }
    }

    /// Create an input mapper with WASD, arrow keys and Space.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut mapper = Self::new();

        mapper.bind(KeyCode::KeyW, InputAction::MoveForward);
        mapper.bind(KeyCode::KeyS, InputAction::MoveBackward);
        mapper.bind(KeyCode::KeyA, InputAction::MoveLeft);
        mapper.bind(KeyCode::KeyD, InputAction::MoveRight);

        mapper.bind(KeyCode::ArrowUp, InputAction::MoveForward);
        mapper.bind(KeyCode::ArrowDown, InputAction::MoveBackward);
        mapper.bind(KeyCode::ArrowLeft, InputAction::MoveLeft);
        mapper.bind(KeyCode::ArrowRight, InputAction::MoveRight);

        mapper.bind(KeyCode::Space, InputAction::Jump);

        mapper
    }

    /// Bind a key to an action.
    ///
    /// If the key was previously bound, the old binding is replaced.
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        if let Some(old_action) = self.key_bindings.get(&key)
            && let Some(keys) = self.action_keys.get_mut(old_action)
        {
            keys.retain(|k| *k != key);
        }

        self.key_bindings.insert(key, action);
        self.action_keys.entry(action).or_default().push(key);
    }

    /// Unbind a key.
    pub fn unbind(&mut self, key: KeyCode) {
        if let Some(action) = self.key_bindings.remove(&key)
            && let Some(keys) = self.action_keys.get_mut(&action)
        {
            keys.retain(|k| *k != key);
        }
    }

    /// Get the action for a key.
    #[must_use]
    pub fn get_action(&self, key: KeyCode) -> Option<InputAction> {
        self.key_bindings.get(&key).copied()
    }

    /// Get all keys bound to an action.
    #[must_use]
    pub fn get_keys(&self, action: InputAction) -> &[KeyCode] {
        self.action_keys
            .get(&action)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether any key bound to `action` is held.
    #[must_use]
    pub fn is_action_pressed(&self, input: &Input, action: InputAction) -> bool {
        self.get_keys(action)
            .iter()
            .any(|&key| input.is_key_pressed(key))
    }

    /// Whether any key bound to `action` went down this frame.
    #[must_use]
    pub fn is_action_just_pressed(&self, input: &Input, action: InputAction) -> bool {
        self.get_keys(action)
            .iter()
            .any(|&key| input.is_key_just_pressed(key))
    }

    /// Whether `key` contributes to the move axis.
    #[must_use]
    pub fn is_move_key(&self, key: KeyCode) -> bool {
        matches!(
            self.get_action(key),
            Some(
                InputAction::MoveForward
                    | InputAction::MoveBackward
                    | InputAction::MoveLeft
                    | InputAction::MoveRight
            )
        )
    }

    /// Compose the held movement keys into a 2D axis.
    ///
    /// Opposing directions cancel out. Diagonals are normalized so every
    /// non-zero result has unit length.
    #[must_use]
    pub fn move_axis(&self, input: &Input) -> Vec2 {
        let axis = |negative, positive| {
            let mut value = 0.0;
            if self.is_action_pressed(input, positive) {
                value += 1.0;
            }
            if self.is_action_pressed(input, negative) {
                value -= 1.0;
            }
            value
        };

        Vec2::new(
            axis(InputAction::MoveLeft, InputAction::MoveRight),
            axis(InputAction::MoveBackward, InputAction::MoveForward),
        )
        .normalize_or_zero()
    }
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    fn input_with(keys: &[KeyCode]) -> Input {
        let mut input = Input::new();
        for &key in keys {
            input.process_keyboard(key, ElementState::Pressed);
        }
        input
    }

    #[test]
    fn test_input_mapper_defaults() {
        let mapper = InputMapper::with_defaults();

        assert_eq!(
            mapper.get_action(KeyCode::KeyW),
            Some(InputAction::MoveForward)
        );
        assert_eq!(mapper.get_action(KeyCode::Space), Some(InputAction::Jump));
        let keys = mapper.get_keys(InputAction::MoveForward);
        assert!(keys.contains(&KeyCode::KeyW));
        assert!(keys.contains(&KeyCode::ArrowUp));
    }

    #[test]
    fn test_input_mapper_rebind() {
        let mut mapper = InputMapper::with_defaults();

        mapper.bind(KeyCode::KeyW, InputAction::Jump);
        assert_eq!(mapper.get_action(KeyCode::KeyW), Some(InputAction::Jump));
        assert!(
            !mapper
                .get_keys(InputAction::MoveForward)
                .contains(&KeyCode::KeyW)
        );
    }

    #[test]
    fn test_input_mapper_unbind() {
        let mut mapper = InputMapper::with_defaults();

        mapper.unbind(KeyCode::KeyW);
        assert!(mapper.get_action(KeyCode::KeyW).is_none());
        assert!(!mapper.is_move_key(KeyCode::KeyW));
        assert!(mapper.is_move_key(KeyCode::ArrowUp));
    }

    #[test]
    fn test_move_axis_single_key() {
        let mapper = InputMapper::with_defaults();

        assert_eq!(mapper.move_axis(&input_with(&[KeyCode::KeyW])), Vec2::Y);
        assert_eq!(mapper.move_axis(&input_with(&[KeyCode::KeyA])), Vec2::NEG_X);
        assert_eq!(mapper.move_axis(&input_with(&[])), Vec2::ZERO);
    }

    #[test]
    fn test_move_axis_opposing_keys_cancel() {
        let mapper = InputMapper::with_defaults();

        let axis = mapper.move_axis(&input_with(&[KeyCode::KeyA, KeyCode::KeyD]));
        assert_eq!(axis, Vec2::ZERO);
    }

    #[test]
    fn test_move_axis_diagonal_is_unit() {
        let mapper = InputMapper::with_defaults();

        let axis = mapper.move_axis(&input_with(&[KeyCode::KeyW, KeyCode::KeyD]));
        assert!((axis.length() - 1.0).abs() < 1e-5);
        assert!(axis.x > 0.0 && axis.y > 0.0);
    }

    #[test]
    fn test_jump_action_just_pressed() {
        let mapper = InputMapper::with_defaults();
        let mut input = input_with(&[KeyCode::Space]);

        assert!(mapper.is_action_just_pressed(&input, InputAction::Jump));
        input.update();
        assert!(!mapper.is_action_just_pressed(&input, InputAction::Jump));
        assert!(mapper.is_action_pressed(&input, InputAction::Jump));
    }
}
