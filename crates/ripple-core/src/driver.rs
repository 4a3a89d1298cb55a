//! Frame driver: one iteration per display refresh
//!
//! Owns every piece of per-frame state (pool, pointer, planes, viewport) and
//! hands it to the render backend explicitly. Nothing here touches the GPU.

use crate::config::RippleConfig;
use crate::coordinates::Viewport;
use crate::error::{RippleError, RippleResult};
use crate::inbox::EventInbox;
use crate::layout::LayoutSource;
use crate::plane::{ImagePlane, PlaneUpdate, TextureId};
use crate::pointer::PointerState;
use crate::pool::{RipplePool, RippleSprite};
use glam::Vec2;

/// GPU side of the pipeline. Implementations own the offscreen buffers and
/// run the displacement, content and composite passes in that order.
pub trait RenderBackend {
    /// Resize both offscreen buffers, the projection and the composite quad.
    /// Old resources are released before replacements are installed.
    fn resize(&mut self, viewport: Viewport) -> RippleResult<()>;

    /// Replace the quad geometry of plane `index` with one of `size`
    fn rebuild_plane(&mut self, index: usize, size: Vec2);

    /// Run the three passes for one frame
    fn render(&mut self, frame: &Frame<'_>) -> RippleResult<()>;

    /// Drop every GPU resource
    fn release(&mut self);
}

/// One image plane as the content pass sees it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneDraw {
    pub index: usize,
    pub texture: TextureId,
    pub position: Vec2,
    pub size: Vec2,
}

/// Per-frame input to the backend
#[derive(Debug)]
pub struct Frame<'a> {
    pub viewport: Viewport,
    /// Active sprites only
    pub sprites: &'a [RippleSprite],
    /// Planes whose layout query succeeded this frame
    pub planes: &'a [PlaneDraw],
    pub refraction_strength: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Assets not ready; ticks do nothing
    Loading,
    Running,
    /// Torn down; terminal
    Stopped,
}

impl DriverState {
    pub fn name(&self) -> &'static str {
        match self {
            DriverState::Loading => "Loading",
            DriverState::Running => "Running",
            DriverState::Stopped => "Stopped",
        }
    }
}

/// What happened during one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub spawned: bool,
    pub rebuilds: usize,
    pub skipped_planes: usize,
    pub active_ripples: usize,
    pub scrolled: bool,
    pub rendered: bool,
}

pub struct FrameDriver {
    state: DriverState,
    config: RippleConfig,
    viewport: Viewport,
    pool: RipplePool,
    pointer: PointerState,
    planes: Vec<ImagePlane>,

    // Reused every frame
    sprite_scratch: Vec<RippleSprite>,
    draw_scratch: Vec<PlaneDraw>,
}

impl FrameDriver {
    pub fn new(config: RippleConfig, viewport: Viewport) -> RippleResult<Self> {
        config.validate()?;
        Ok(Self {
            state: DriverState::Loading,
            config,
            viewport,
            pool: RipplePool::new(config),
            pointer: PointerState::default(),
            planes: Vec::new(),
            sprite_scratch: Vec::with_capacity(config.max_ripples),
            draw_scratch: Vec::new(),
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pool(&self) -> &RipplePool {
        &self.pool
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn planes(&self) -> &[ImagePlane] {
        &self.planes
    }

    /// Leave `Loading`: discover one plane per page image and build its geometry.
    /// `textures[i]` is the preloaded texture of the i-th element.
    pub fn start(
        &mut self,
        layout: &dyn LayoutSource,
        textures: &[TextureId],
        backend: &mut dyn RenderBackend,
    ) -> RippleResult<()> {
        if self.state != DriverState::Loading {
            return Err(RippleError::InvalidState {
                expected: DriverState::Loading.name(),
                actual: self.state.name(),
            });
        }

        let elements = layout.elements();
        if elements.len() != textures.len() {
            tracing::warn!(
                "{} image elements but {} textures; extra entries are ignored",
                elements.len(),
                textures.len()
            );
        }

        for (element, texture) in elements.into_iter().zip(textures.iter().copied()) {
            match ImagePlane::discover(layout, element, texture, self.viewport) {
                Ok(mut plane) => {
                    backend.rebuild_plane(self.planes.len(), plane.size);
                    plane.geometry_built();
                    self.planes.push(plane);
                }
                Err(e) => tracing::warn!("Dropping image element {}: {}", element.0, e),
            }
        }

        tracing::info!(
            "Ripple pipeline running: {} planes, {} ripple slots, {}x{}",
            self.planes.len(),
            self.pool.capacity(),
            self.viewport.width,
            self.viewport.height
        );
        self.state = DriverState::Running;
        Ok(())
    }

    /// One display refresh
    pub fn tick(
        &mut self,
        inbox: &mut EventInbox,
        layout: &dyn LayoutSource,
        backend: &mut dyn RenderBackend,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        if self.state != DriverState::Running {
            return stats;
        }

        let input = inbox.drain();
        stats.scrolled = input.scrolled;

        let resize_failed = match input.resize {
            Some(viewport) => match self.apply_resize(viewport, backend) {
                Ok(()) => false,
                Err(e) => {
                    tracing::warn!("Skipping frame: {}", e);
                    inbox.requeue_resize(viewport);
                    true
                }
            },
            None => false,
        };

        if let Some(px) = input.pointer {
            self.pointer.current = self.viewport.to_centered(px.x, px.y);
        }

        if resize_failed {
            return stats;
        }

        // 1. layout-derived plane transforms
        let (rebuilds, skipped) = self.refresh_layout(layout, backend);
        stats.rebuilds = rebuilds;
        stats.skipped_planes = skipped;

        // 2. pointer -> at most one spawn
        if let Some(at) = self.pointer.take_spawn(self.config.dead_zone) {
            self.pool.spawn(at);
            stats.spawned = true;
        }

        // 3. age ripples
        self.pool.tick();
        stats.active_ripples = self.pool.active_count();

        if self.viewport.is_empty() {
            return stats;
        }

        // 4-6. displacement, content, composite
        self.sprite_scratch.clear();
        self.sprite_scratch.extend(self.pool.active().copied());

        self.draw_scratch.clear();
        self.draw_scratch.extend(
            self.planes
                .iter()
                .enumerate()
                .filter(|(_, plane)| plane.visible)
                .map(|(index, plane)| PlaneDraw {
                    index,
                    texture: plane.texture,
                    position: plane.position,
                    size: plane.size,
                }),
        );

        let frame = Frame {
            viewport: self.viewport,
            sprites: &self.sprite_scratch,
            planes: &self.draw_scratch,
            refraction_strength: self.config.refraction_strength,
        };

        match backend.render(&frame) {
            Ok(()) => stats.rendered = true,
            Err(e) => tracing::warn!("Frame dropped: {}", e),
        }

        stats
    }

    /// Recompute every plane transform from the current layout. Returns
    /// `(geometry rebuilds, planes skipped)`.
    pub fn refresh_layout(
        &mut self,
        layout: &dyn LayoutSource,
        backend: &mut dyn RenderBackend,
    ) -> (usize, usize) {
        if self.state != DriverState::Running {
            return (0, 0);
        }

        let mut rebuilds = 0;
        let mut skipped = 0;
        for (index, plane) in self.planes.iter_mut().enumerate() {
            match plane.refresh(layout, self.viewport) {
                PlaneUpdate::Moved => {}
                PlaneUpdate::Resized => {
                    backend.rebuild_plane(index, plane.size);
                    plane.geometry_built();
                    rebuilds += 1;
                }
                PlaneUpdate::Skipped => skipped += 1,
            }
        }
        (rebuilds, skipped)
    }

    fn apply_resize(
        &mut self,
        viewport: Viewport,
        backend: &mut dyn RenderBackend,
    ) -> RippleResult<()> {
        if viewport == self.viewport {
            return Ok(());
        }
        if !viewport.is_empty() {
            backend.resize(viewport)?;
        }
        tracing::info!("Viewport resized to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        Ok(())
    }

    /// Release GPU resources and stop for good
    pub fn teardown(&mut self, backend: &mut dyn RenderBackend) {
        if self.state == DriverState::Stopped {
            return;
        }
        backend.release();
        self.pool.clear();
        self.planes.clear();
        self.state = DriverState::Stopped;
        tracing::info!("Ripple pipeline stopped");
    }
}
