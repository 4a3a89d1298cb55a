//! wgpu backend for the ripple refraction pipeline
//!
//! Three render passes per frame, all through one orthographic projection in
//! centered space:
//! 1. **Displacement**: active ripple sprites, instanced, into offscreen buffer A
//! 2. **Content**: one textured quad per page image into offscreen buffer B
//! 3. **Composite**: full-screen quad sampling B at UVs perturbed by A

pub mod composite_pass;
pub mod content_pass;
pub mod displacement_pass;
pub mod gpu_types;
pub mod renderer;
pub mod targets;
pub mod texture;

pub mod shaders {
    pub const DISPLACEMENT: &str = include_str!("shaders/displacement.wgsl");
    pub const CONTENT: &str = include_str!("shaders/content.wgsl");
    pub const COMPOSITE: &str = include_str!("shaders/composite.wgsl");
}

pub use renderer::Renderer;
pub use texture::{FileTextureSource, TextureStore};
