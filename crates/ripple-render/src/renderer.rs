//! Renderer owning the surface, the offscreen buffers and the three passes

use crate::composite_pass::CompositePass;
use crate::content_pass::ContentPass;
use crate::displacement_pass::DisplacementPass;
use crate::gpu_types::{CompositeUniform, Globals};
use crate::targets::{OffscreenTarget, CONTENT_FORMAT, DISPLACEMENT_FORMAT};
use crate::texture::TextureStore;

use anyhow::{Context, Result};
use glam::Vec2;
use image::RgbaImage;
use ripple_core::{
    Frame, Preloaded, RenderBackend, RippleError, RippleResult, TextureId, Viewport,
};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

pub struct Renderer {
    // WGPU state
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    // Shared projection
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,

    // Textures
    textures: TextureStore,
    brush: Option<TextureId>,

    // Offscreen buffers
    displacement_target: OffscreenTarget,
    content_target: OffscreenTarget,

    // Passes
    displacement: DisplacementPass,
    content: ContentPass,
    composite: CompositePass,

    viewport: Viewport,
    released: bool,
}

impl Renderer {
    /// `max_sprites` sizes the displacement pass instance buffer
    pub async fn new(window: Arc<Window>, max_sprites: usize) -> Result<Self> {
        let size = window.inner_size();
        let viewport = Viewport::new(size.width, size.height);

        // WGPU setup
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("create_surface failed")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Ripple Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("request_device failed")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        tracing::info!(
            "Configuring surface: {}x{} {:?}",
            config.width,
            config.height,
            surface_format
        );
        surface.configure(&device, &config);

        // Globals (projection)
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals Buffer"),
            contents: bytemuck::bytes_of(&Globals::new(viewport)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let textures = TextureStore::new(&device);

        // Offscreen buffers
        let displacement_target =
            OffscreenTarget::new(&device, "Displacement Buffer", DISPLACEMENT_FORMAT, viewport)?;
        let content_target =
            OffscreenTarget::new(&device, "Content Buffer", CONTENT_FORMAT, viewport)?;

        // Passes
        let displacement =
            DisplacementPass::new(&device, &globals_layout, textures.layout(), max_sprites);
        let content = ContentPass::new(&device, &globals_layout, textures.layout());
        let mut composite = CompositePass::new(&device, &globals_layout, surface_format, viewport);
        if let (Some(d), Some(c)) = (displacement_target.view(), content_target.view()) {
            composite.bind_targets(&device, d, c);
        }

        Ok(Self {
            surface,
            device,
            queue,
            config,
            globals_buffer,
            globals_bind_group,
            textures,
            brush: None,
            displacement_target,
            content_target,
            displacement,
            content,
            composite,
            viewport,
            released: false,
        })
    }

    /// Upload the preloaded brush and images. Returns the image texture ids in
    /// the order they were requested.
    pub fn upload_assets(&mut self, assets: &Preloaded<RgbaImage>) -> Vec<TextureId> {
        self.brush = Some(self.textures.upload(
            &self.device,
            &self.queue,
            &assets.brush,
            wgpu::TextureFormat::Rgba8Unorm,
            "Brush Texture",
        ));

        let ids: Vec<TextureId> = assets
            .images
            .iter()
            .enumerate()
            .map(|(i, image)| {
                self.textures.upload(
                    &self.device,
                    &self.queue,
                    image,
                    wgpu::TextureFormat::Rgba8UnormSrgb,
                    &format!("Image Texture {}", i),
                )
            })
            .collect();

        tracing::info!("Uploaded {} textures", self.textures.len());
        ids
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn get_info(&self) -> String {
        let (w, h) = self.displacement_target.dimensions();
        format!(
            "Buffers: {}x{} | Textures: {} | Plane rebuilds: {}",
            w,
            h,
            self.textures.len(),
            self.content.rebuild_count()
        )
    }

    fn reconfigure_surface(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

impl RenderBackend for Renderer {
    fn resize(&mut self, viewport: Viewport) -> RippleResult<()> {
        if self.released || viewport.is_empty() {
            return Ok(());
        }
        tracing::info!("Resizing to {}x{}", viewport.width, viewport.height);

        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.reconfigure_surface();

        // Old bind group references the old views: drop it first
        self.composite.unbind_targets();
        self.displacement_target.resize(&self.device, viewport)?;
        self.content_target.resize(&self.device, viewport)?;
        if let (Some(d), Some(c)) = (self.displacement_target.view(), self.content_target.view()) {
            self.composite.bind_targets(&self.device, d, c);
        }

        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&Globals::new(viewport)));
        self.composite.rebuild_quad(&self.device, viewport);
        self.viewport = viewport;
        Ok(())
    }

    fn rebuild_plane(&mut self, index: usize, size: Vec2) {
        if self.released {
            return;
        }
        self.content.rebuild_plane(&self.device, index, size);
    }

    fn render(&mut self, frame: &Frame<'_>) -> RippleResult<()> {
        if self.released {
            return Ok(());
        }

        let (Some(displacement_view), Some(content_view)) =
            (self.displacement_target.view(), self.content_target.view())
        else {
            return Err(RippleError::BufferResize {
                buffer: "offscreen",
                width: frame.viewport.width,
                height: frame.viewport.height,
                reason: "offscreen buffers not allocated".into(),
            });
        };

        let brush = self
            .brush
            .and_then(|id| self.textures.get(id))
            .ok_or_else(|| RippleError::AssetLoad {
                url: "brush".into(),
                reason: "brush texture not uploaded".into(),
            })?;

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                self.surface.configure(&self.device, &self.config);
                return Err(RippleError::Surface(e.to_string()));
            }
            Err(e) => return Err(RippleError::Surface(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Ripple Encoder"),
            });

        // 1. ripples -> displacement field
        self.displacement.encode(
            &self.queue,
            &mut encoder,
            displacement_view,
            &self.globals_bind_group,
            &brush.bind_group,
            frame.sprites,
        );

        // 2. images -> content layer
        self.content.encode(
            &self.queue,
            &mut encoder,
            content_view,
            &self.globals_bind_group,
            &self.textures,
            frame.planes,
        );

        // 3. refraction -> surface
        self.composite.encode(
            &self.queue,
            &mut encoder,
            &view,
            &self.globals_bind_group,
            CompositeUniform::new(frame.viewport, frame.refraction_strength),
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.composite.release();
        self.content.release();
        self.displacement.release();
        self.displacement_target.release();
        self.content_target.release();
        self.textures.release();
        self.brush = None;
        self.globals_buffer.destroy();
        self.released = true;
        tracing::info!("GPU resources released");
    }
}
