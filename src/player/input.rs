use glam::Vec2;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Sprint,
    Crouch,
    Break,
    Place,
}

/// Key and mouse state the player reads once per frame. Mouse deltas use
/// positive y for looking up.
pub trait InputState {
    fn is_key_down(&self, key: Key) -> bool;

    /// True only on the frame the key went down.
    fn just_down(&self, key: Key) -> bool;

    fn mouse_delta(&self) -> Vec2;
}

/// Plain input state for callers without a window layer.
#[derive(Debug, Default, Clone)]
pub struct InputSnapshot {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    mouse_delta: Vec2,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            if self.held.insert(key) {
                self.pressed.insert(key);
            }
        } else {
            self.held.remove(&key);
            self.pressed.remove(&key);
        }
    }

    pub fn handle_mouse_move(&mut self, delta: Vec2) {
        self.mouse_delta += delta;
    }

    /// Clears the per-frame edges and mouse motion.
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.mouse_delta = Vec2::ZERO;
    }
}

impl InputState for InputSnapshot {
    fn is_key_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn just_down(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_just_down_is_edge_triggered() {
        let mut input = InputSnapshot::new();
        input.handle_key(Key::Jump, true);
        assert!(input.just_down(Key::Jump));
        assert!(input.is_key_down(Key::Jump));

        input.reset();
        input.handle_key(Key::Jump, true);
        assert!(!input.just_down(Key::Jump));
        assert!(input.is_key_down(Key::Jump));

        input.handle_key(Key::Jump, false);
        assert!(!input.is_key_down(Key::Jump));
    }

    #[test]
    fn test_mouse_motion_accumulates_until_reset() {
        let mut input = InputSnapshot::new();
        input.handle_mouse_move(Vec2::new(1.0, 2.0));
        input.handle_mouse_move(Vec2::new(3.0, -1.0));
        assert_eq!(input.mouse_delta(), Vec2::new(4.0, 1.0));
        input.reset();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }
}
