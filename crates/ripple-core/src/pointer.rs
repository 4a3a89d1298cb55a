//! Pointer position tracking between frames

use glam::Vec2;

/// Pointer position now and at the previous frame, in centered space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub current: Vec2,
    pub previous: Vec2,
}

impl PointerState {
    pub fn new(at: Vec2) -> Self {
        Self { current: at, previous: at }
    }

    /// Whether the pointer travelled further than `dead_zone` in either axis
    pub fn moved_beyond(&self, dead_zone: f32) -> bool {
        let delta = (self.current - self.previous).abs();
        delta.x > dead_zone || delta.y > dead_zone
    }

    /// Per-frame read: returns the spawn position if the pointer moved, then
    /// catches `previous` up with `current`. At most one spawn per frame no
    /// matter how far the pointer jumped.
    pub fn take_spawn(&mut self, dead_zone: f32) -> Option<Vec2> {
        let spawn = self.moved_beyond(dead_zone).then_some(self.current);
        self.previous = self.current;
        spawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_inside_dead_zone() {
        let mut pointer = PointerState::new(Vec2::ZERO);
        pointer.current = Vec2::new(0.05, -0.1);
        assert_eq!(pointer.take_spawn(0.1), None);
    }

    #[test]
    fn test_single_axis_is_enough() {
        let mut pointer = PointerState::new(Vec2::ZERO);
        pointer.current = Vec2::new(0.0, 0.2);
        assert_eq!(pointer.take_spawn(0.1), Some(Vec2::new(0.0, 0.2)));
    }

    #[test]
    fn test_large_jump_spawns_once() {
        let mut pointer = PointerState::new(Vec2::ZERO);
        pointer.current = Vec2::new(500.0, 500.0);
        assert!(pointer.take_spawn(0.1).is_some());
        assert!(pointer.take_spawn(0.1).is_none());
        assert_eq!(pointer.previous, pointer.current);
    }
}
