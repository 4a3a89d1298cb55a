//! Fixed-capacity ring of ripple sprites
//!
//! Spawning always overwrites the slot under the cursor, which is the
//! least-recently spawned one, whatever its opacity. Retired sprites keep
//! their slot until the cursor comes back around.

use crate::config::RippleConfig;
use glam::Vec2;

/// State of one ripple sprite in centered space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleSprite {
    pub position: Vec2,
    /// Rotation about the view axis (radians)
    pub rotation: f32,
    pub opacity: f32,
    pub scale: Vec2,
    pub active: bool,
}

impl RippleSprite {
    fn retired() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            opacity: 0.0,
            scale: Vec2::ONE,
            active: false,
        }
    }
}

pub struct RipplePool {
    slots: Vec<RippleSprite>,
    cursor: usize,
    config: RippleConfig,
}

impl RipplePool {
    pub fn new(config: RippleConfig) -> Self {
        Self {
            slots: vec![RippleSprite::retired(); config.max_ripples],
            cursor: 0,
            config,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the next slot to be overwritten
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn slots(&self) -> &[RippleSprite] {
        &self.slots
    }

    /// Write a fresh sprite over the oldest slot
    pub fn spawn(&mut self, position: Vec2) {
        if self.slots.is_empty() {
            return;
        }
        self.slots[self.cursor] = RippleSprite {
            position,
            rotation: 0.0,
            opacity: 1.0,
            scale: Vec2::splat(self.config.initial_scale),
            active: true,
        };
        self.cursor = (self.cursor + 1) % self.slots.len();
    }

    /// Age every active sprite by one frame
    pub fn tick(&mut self) {
        let RippleConfig {
            angular_step,
            decay,
            shrink,
            growth,
            visibility_epsilon,
            ..
        } = self.config;

        for sprite in self.slots.iter_mut().filter(|s| s.active) {
            sprite.rotation += angular_step;
            sprite.opacity *= decay;
            sprite.scale = sprite.scale * shrink + Vec2::splat(growth);
            if sprite.opacity < visibility_epsilon {
                sprite.active = false;
            }
        }
    }

    /// Active sprites in slot order
    pub fn active(&self) -> impl Iterator<Item = &RippleSprite> {
        self.slots.iter().filter(|s| s.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Retire every sprite and rewind the cursor
    pub fn clear(&mut self) {
        self.slots.fill(RippleSprite::retired());
        self.cursor = 0;
    }
}
