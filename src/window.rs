//! winit host: window, input routing and the per-refresh tick

use std::sync::Arc;

use anyhow::{Context, Result};
use image::RgbaImage;
use ripple_core::{EventInbox, FrameDriver, Preloaded, RippleConfig, Viewport};
use ripple_render::Renderer;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::page::StaticPage;

/// Pixels per wheel line
const LINE_HEIGHT: f32 = 40.0;

pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub gap: f32,
    pub column_width: f32,
}

struct Running {
    window: Arc<Window>,
    renderer: Renderer,
    driver: FrameDriver,
    page: StaticPage,
}

pub struct App {
    settings: WindowSettings,
    config: RippleConfig,
    assets: Option<Preloaded<RgbaImage>>,
    inbox: EventInbox,
    running: Option<Running>,
    frames: u64,
}

impl App {
    pub fn new(settings: WindowSettings, config: RippleConfig, assets: Preloaded<RgbaImage>) -> Self {
        Self {
            settings,
            config,
            assets: Some(assets),
            inbox: EventInbox::new(),
            running: None,
            frames: 0,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let assets = self
            .assets
            .take()
            .context("assets already consumed")?;

        let attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(PhysicalSize::new(self.settings.width, self.settings.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        let viewport = Viewport::new(size.width, size.height);

        let mut renderer = pollster::block_on(Renderer::new(
            Arc::clone(&window),
            self.config.max_ripples,
        ))?;
        let textures = renderer.upload_assets(&assets);

        let natural = assets
            .images
            .iter()
            .map(|img| (img.width() as f32, img.height() as f32))
            .collect();
        let page = StaticPage::new(
            natural,
            self.settings.gap,
            self.settings.column_width,
            viewport,
        );

        let mut driver = FrameDriver::new(self.config, viewport)?;
        driver.start(&page, &textures, &mut renderer)?;
        tracing::info!("{}", renderer.get_info());

        Ok(Running {
            window,
            renderer,
            driver,
            page,
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(e) => {
                tracing::error!("Startup failed: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                running.driver.teardown(&mut running.renderer);
                tracing::info!("Rendered {} frames", self.frames);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                running.page.set_viewport(Viewport::new(size.width, size.height));
                self.inbox.resized(size.width, size.height);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.inbox.pointer_moved(position.x as f32, position.y as f32);
            }

            WindowEvent::Touch(touch) => {
                self.inbox
                    .pointer_moved(touch.location.x as f32, touch.location.y as f32);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                if running.page.scroll_by(dy) && self.inbox.scrolled() {
                    tracing::trace!("Scroll to {:.0}", running.page.scroll());
                }
            }

            WindowEvent::RedrawRequested => {
                let stats = running.driver.tick(
                    &mut self.inbox,
                    &running.page,
                    &mut running.renderer,
                );
                if stats.rendered {
                    self.frames += 1;
                }
                tracing::trace!(
                    spawned = stats.spawned,
                    rebuilds = stats.rebuilds,
                    skipped = stats.skipped_planes,
                    ripples = stats.active_ripples,
                    scrolled = stats.scrolled,
                    "frame"
                );
                running.window.request_redraw();
            }

            _ => {}
        }
    }
}
