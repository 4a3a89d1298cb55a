//! Content pass: page images into buffer B

use crate::gpu_types::{PlaneUniform, QuadVertex};
use crate::shaders;
use crate::targets::CONTENT_FORMAT;
use crate::texture::TextureStore;

use glam::Vec2;
use ripple_core::PlaneDraw;
use wgpu::util::DeviceExt;

/// GPU state of one image plane
struct PlaneGpu {
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct ContentPass {
    pipeline: wgpu::RenderPipeline,
    plane_layout: wgpu::BindGroupLayout,
    planes: Vec<Option<PlaneGpu>>,
    rebuilds: u64,
}

impl ContentPass {
    pub fn new(
        device: &wgpu::Device,
        globals_layout: &wgpu::BindGroupLayout,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Content Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::CONTENT.into()),
        });

        let plane_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Plane Bind Group Layout"),
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

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Content Pipeline Layout"),
            bind_group_layouts: &[globals_layout, &plane_layout, texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Content Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: CONTENT_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            plane_layout,
            planes: Vec::new(),
            rebuilds: 0,
        }
    }

    /// Geometry rebuilds since startup
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Replace the quad of plane `index`. The old vertex buffer is destroyed
    /// before the new one is created; the offset uniform is kept.
    pub fn rebuild_plane(&mut self, device: &wgpu::Device, index: usize, size: Vec2) {
        if self.planes.len() <= index {
            self.planes.resize_with(index + 1, || None);
        }

        let uniform = match self.planes[index].take() {
            Some(old) => {
                old.vertex_buffer.destroy();
                Some((old.uniform_buffer, old.bind_group))
            }
            None => None,
        };

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Plane Quad"),
            contents: bytemuck::cast_slice(&QuadVertex::quad(size)),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let (uniform_buffer, bind_group) = uniform.unwrap_or_else(|| {
            let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Plane Uniform"),
                size: PlaneUniform::SIZE as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Plane Bind Group"),
                layout: &self.plane_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });
            (uniform_buffer, bind_group)
        });

        self.planes[index] = Some(PlaneGpu {
            vertex_buffer,
            uniform_buffer,
            bind_group,
        });
        self.rebuilds += 1;
    }

    /// Clear `target` and draw every plane at its current position
    pub fn encode(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        globals: &wgpu::BindGroup,
        textures: &TextureStore,
        planes: &[PlaneDraw],
    ) {
        for draw in planes {
            if let Some(Some(gpu)) = self.planes.get(draw.index) {
                let uniform = PlaneUniform {
                    offset: draw.position.into(),
                    _pad: [0.0; 2],
                };
                queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
            }
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Content Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, globals, &[]);

        for draw in planes {
            let (Some(Some(gpu)), Some(texture)) =
                (self.planes.get(draw.index), textures.get(draw.texture))
            else {
                tracing::debug!("No GPU state for plane {}", draw.index);
                continue;
            };
            pass.set_bind_group(1, &gpu.bind_group, &[]);
            pass.set_bind_group(2, &texture.bind_group, &[]);
            pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            pass.draw(0..6, 0..1);
        }
    }

    pub fn release(&mut self) {
        for gpu in self.planes.drain(..).flatten() {
            gpu.vertex_buffer.destroy();
            gpu.uniform_buffer.destroy();
        }
    }
}
