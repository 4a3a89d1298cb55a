//! Compile-time tunables for the ripple effect

/// Ripple pool capacity (sprites alive at once)
pub const MAX_RIPPLES: usize = 40;

/// Opacity multiplier applied every frame
pub const DECAY: f32 = 0.95;

/// Scale multiplier applied every frame, before the growth offset
pub const SHRINK: f32 = 0.98;

/// Scale offset added every frame (per axis)
pub const GROWTH: f32 = 0.155;

/// Scale of a freshly spawned sprite (per axis)
pub const INITIAL_SCALE: f32 = 1.75;

/// Rotation added every frame (radians)
pub const ANGULAR_STEP: f32 = 0.025;

/// Minimum pointer travel between frames, in either axis, that spawns a ripple
pub const DEAD_ZONE: f32 = 0.1;

/// Sprites below this opacity are retired
pub const VISIBILITY_EPSILON: f32 = 0.01;

/// UV perturbation magnitude of the composite pass
pub const REFRACTION_STRENGTH: f32 = 0.075;

/// Edge length of the unscaled brush quad, in centered-space units
pub const RIPPLE_SIZE: f32 = 120.0;

/// Near plane of the shared orthographic projection
pub const DEPTH_NEAR: f32 = -1000.0;

/// Far plane of the shared orthographic projection
pub const DEPTH_FAR: f32 = 1000.0;
