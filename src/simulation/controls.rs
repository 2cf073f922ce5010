//! Driving controls and the strategies that populate them.

use serde::{Deserialize, Serialize};

/// Four independent actuation flags read by the physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    /// Accelerate along the heading.
    pub forward: bool,
    /// Accelerate against the heading.
    pub reverse: bool,
    /// Steer counter-clockwise (screen left when moving forward).
    pub left: bool,
    /// Steer clockwise.
    pub right: bool,
}

/// Directional keys delivered by the host input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Maps to `forward`.
    Up,
    /// Maps to `reverse`.
    Down,
    /// Maps to `left`.
    Left,
    /// Maps to `right`.
    Right,
}

impl Controls {
    /// Controls for a traffic car: always accelerating.
    pub fn always_forward() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }

    /// Applies a key press (`pressed = true`) or release to the matching flag.
    pub fn apply_key(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Up => self.forward = pressed,
            Key::Down => self.reverse = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
        }
    }

    /// Writes network outputs in the fixed order forward, left, right, reverse.
    ///
    /// Any output above `0.5` counts as set; missing outputs count as unset.
    pub fn apply_outputs(&mut self, outputs: &[f32]) {
        let flag = |i: usize| outputs.get(i).is_some_and(|&v| v > 0.5);
        self.forward = flag(0);
        self.left = flag(1);
        self.right = flag(2);
        self.reverse = flag(3);
    }
}

/// Which strategy fills a car's controls each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlType {
    /// Controls mirror the input snapshot handed to each update.
    Human,
    /// Controls come from the car's network.
    Ai,
    /// Controls are fixed to always-forward.
    Dummy,
}
