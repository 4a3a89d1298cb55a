//! Offscreen color targets
//!
//! Both buffers track the viewport in device pixels. Resizing releases the old
//! texture before the replacement is allocated, so a failed allocation leaves
//! the target empty rather than stale.

use ripple_core::{RippleError, RippleResult, Viewport};

/// Displacement field: raw data, no color conversion
pub const DISPLACEMENT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Content layer: color, stored sRGB-encoded like the surface
pub const CONTENT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

pub struct OffscreenTarget {
    label: &'static str,
    format: wgpu::TextureFormat,
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> RippleResult<Self> {
        let mut target = Self {
            label,
            format,
            texture: None,
            view: None,
            width: 0,
            height: 0,
        };
        target.allocate(device, viewport)?;
        Ok(target)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// `None` after a failed resize, until the next successful one
    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.view.as_ref()
    }

    /// Discard contents and reallocate at the new size
    pub fn resize(&mut self, device: &wgpu::Device, viewport: Viewport) -> RippleResult<()> {
        self.release();
        self.allocate(device, viewport)
    }

    pub fn release(&mut self) {
        self.view = None;
        if let Some(texture) = self.texture.take() {
            texture.destroy();
        }
        self.width = 0;
        self.height = 0;
    }

    fn allocate(&mut self, device: &wgpu::Device, viewport: Viewport) -> RippleResult<()> {
        let width = viewport.width.max(1);
        let height = viewport.height.max(1);
        let fail = |reason: String| RippleError::BufferResize {
            buffer: self.label,
            width,
            height,
            reason,
        };

        let max = device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(fail(format!("exceeds max texture dimension {}", max)));
        }

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(self.label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            texture.destroy();
            return Err(fail(err.to_string()));
        }

        tracing::debug!("Allocated {} target {}x{}", self.label, width, height);
        self.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.texture = Some(texture);
        self.width = width;
        self.height = height;
        Ok(())
    }
}

impl Drop for OffscreenTarget {
    fn drop(&mut self) {
        self.release();
    }
}
