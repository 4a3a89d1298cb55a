//! Grouped tunables

use crate::constants::*;
use crate::error::{RippleError, RippleResult};

/// Every knob of the effect in one place. `Default` is the shipped configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleConfig {
    /// Sprite pool capacity
    pub max_ripples: usize,
    /// Opacity multiplier per frame
    pub decay: f32,
    /// Scale multiplier per frame
    pub shrink: f32,
    /// Scale offset per frame
    pub growth: f32,
    /// Scale at spawn
    pub initial_scale: f32,
    /// Rotation rate (radians per frame)
    pub angular_step: f32,
    /// Minimum pointer delta to spawn
    pub dead_zone: f32,
    /// Opacity below which a sprite retires
    pub visibility_epsilon: f32,
    /// UV perturbation magnitude
    pub refraction_strength: f32,
}

impl RippleConfig {
    pub fn validate(&self) -> RippleResult<()> {
        if self.max_ripples == 0 {
            return Err(RippleError::Config("max_ripples must be at least 1".into()));
        }
        if !(self.decay > 0.0 && self.decay < 1.0) {
            return Err(RippleError::Config(format!(
                "decay must be in (0, 1), got {}",
                self.decay
            )));
        }
        if !(self.visibility_epsilon > 0.0 && self.visibility_epsilon < 1.0) {
            return Err(RippleError::Config(format!(
                "visibility_epsilon must be in (0, 1), got {}",
                self.visibility_epsilon
            )));
        }
        if self.dead_zone < 0.0 {
            return Err(RippleError::Config(format!(
                "dead_zone must be non-negative, got {}",
                self.dead_zone
            )));
        }
        Ok(())
    }

    /// Number of ticks until a freshly spawned sprite retires: the first `k`
    /// with `decay^k < visibility_epsilon`
    pub fn lifetime_ticks(&self) -> u32 {
        let eps = self.visibility_epsilon as f64;
        let decay = self.decay as f64;
        (eps.ln() / decay.ln()).floor() as u32 + 1
    }

    /// Scale a sprite approaches as it ages: the fixed point of `s * shrink + growth`
    pub fn asymptotic_scale(&self) -> f32 {
        self.growth / (1.0 - self.shrink)
    }
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            max_ripples: MAX_RIPPLES,
            decay: DECAY,
            shrink: SHRINK,
            growth: GROWTH,
            initial_scale: INITIAL_SCALE,
            angular_step: ANGULAR_STEP,
            dead_zone: DEAD_ZONE,
            visibility_epsilon: VISIBILITY_EPSILON,
            refraction_strength: REFRACTION_STRENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RippleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_pool() {
        let config = RippleConfig { max_ripples: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(RippleError::Config(_))));
    }

    #[test]
    fn test_rejects_non_decaying_opacity() {
        let config = RippleConfig { decay: 1.0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_lifetime() {
        // 0.95^89 ≈ 0.0103, 0.95^90 ≈ 0.0099
        assert_eq!(RippleConfig::default().lifetime_ticks(), 90);
    }

    #[test]
    fn test_lifetime_when_epsilon_is_exact_power() {
        // 0.5^2 == 0.25 is not below epsilon; the sprite retires on tick 3
        let config = RippleConfig {
            decay: 0.5,
            visibility_epsilon: 0.25,
            ..Default::default()
        };
        assert_eq!(config.lifetime_ticks(), 3);

        let mut pool = crate::pool::RipplePool::new(config);
        pool.spawn(glam::Vec2::ZERO);
        for _ in 0..2 {
            pool.tick();
        }
        assert_eq!(pool.active_count(), 1);
        pool.tick();
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_asymptotic_scale() {
        let s = RippleConfig::default().asymptotic_scale();
        assert!((s - 7.75).abs() < 1e-4, "asymptote {}", s);
    }
}
