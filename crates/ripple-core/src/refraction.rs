//! CPU reference of the composite (refraction) shader
//!
//! Same math as `composite.wgsl`, with nearest sampling in place of the
//! shader's bilinear filter: the displacement red channel is both the strength
//! and, through `theta`, the direction of the UV offset. Out-of-range UVs clamp to the edge.
//!
//! The offset direction `(sin θ, cos θ)` is defined in y-up screen space. Texture
//! UVs run top to bottom, so its y component is negated before it is applied.

use glam::Vec2;
use image::{Rgba, RgbaImage};
use std::f32::consts::TAU;

/// Perturbed sampling coordinate for one fragment
pub fn refract_uv(screen_uv: Vec2, displacement: f32, strength: f32) -> Vec2 {
    let theta = displacement * TAU;
    let dir = Vec2::new(theta.sin(), -theta.cos());
    screen_uv + dir * displacement * strength
}

/// Nearest-texel lookup with clamp-to-edge addressing. An empty image reads as
/// transparent black.
pub fn sample_clamped(image: &RgbaImage, uv: Vec2) -> Rgba<u8> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Rgba([0; 4]);
    }
    let x = ((uv.x * w as f32).floor() as i64).clamp(0, w as i64 - 1) as u32;
    let y = ((uv.y * h as f32).floor() as i64).clamp(0, h as i64 - 1) as u32;
    *image.get_pixel(x, y)
}

/// Refract `content` through `displacement` into an image the size of `content`
pub fn composite(displacement: &RgbaImage, content: &RgbaImage, strength: f32) -> RgbaImage {
    let (w, h) = content.dimensions();
    let resolution = Vec2::new(w as f32, h as f32);

    RgbaImage::from_fn(w, h, |x, y| {
        // fragment centers, like @builtin(position)
        let screen_uv = (Vec2::new(x as f32, y as f32) + 0.5) / resolution;
        let d = sample_clamped(displacement, screen_uv)[0] as f32 / 255.0;
        sample_clamped(content, refract_uv(screen_uv, d, strength))
    })
}
