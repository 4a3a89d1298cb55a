//! GPU-compatible data types

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use ripple_core::{RippleSprite, Viewport};

/// Shared projection, bind group 0 of every pass
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Globals {
    pub projection: [[f32; 4]; 4],
}

impl Globals {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            projection: viewport.projection().to_cols_array_2d(),
        }
    }
}

/// Corner of a quad in centered space
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl QuadVertex {
    pub const SIZE: usize = std::mem::size_of::<Self>();
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }

    /// Two triangles covering a `size` rectangle centered on the origin.
    /// y is up, texture v runs top to bottom.
    pub fn quad(size: Vec2) -> [QuadVertex; 6] {
        let h = size / 2.0;
        let v = |x: f32, y: f32, u: f32, w: f32| QuadVertex { position: [x, y], uv: [u, w] };
        [
            v(-h.x, -h.y, 0.0, 1.0),
            v(h.x, -h.y, 1.0, 1.0),
            v(h.x, h.y, 1.0, 0.0),
            v(-h.x, -h.y, 0.0, 1.0),
            v(h.x, h.y, 1.0, 0.0),
            v(-h.x, h.y, 0.0, 0.0),
        ]
    }
}

/// Per-instance data for the displacement pass
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 2],
    pub scale: [f32; 2],
    pub rotation: f32,
    pub opacity: f32,
    /// Padding
    pub _pad: [f32; 2],
}

impl SpriteInstance {
    pub const SIZE: usize = std::mem::size_of::<Self>();
    const ATTRIBS: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![2 => Float32x2, 3 => Float32x2, 4 => Float32, 5 => Float32];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

impl From<&RippleSprite> for SpriteInstance {
    fn from(sprite: &RippleSprite) -> Self {
        Self {
            position: sprite.position.into(),
            scale: sprite.scale.into(),
            rotation: sprite.rotation,
            opacity: sprite.opacity,
            _pad: [0.0; 2],
        }
    }
}

/// Per-plane offset for the content pass
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PlaneUniform {
    pub offset: [f32; 2],
    pub _pad: [f32; 2],
}

impl PlaneUniform {
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Composite pass parameters
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CompositeUniform {
    /// Surface size in pixels
    pub resolution: [f32; 2],
    pub strength: f32,
    pub _pad: f32,
}

impl CompositeUniform {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn new(viewport: Viewport, strength: f32) -> Self {
        Self {
            resolution: viewport.size().into(),
            strength,
            _pad: 0.0,
        }
    }
}
