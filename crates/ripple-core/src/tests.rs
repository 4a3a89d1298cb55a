use crate::*;
use glam::Vec2;

/// Page with one rectangle per image; `None` means the element left the document
struct FakePage {
    rects: Vec<Option<DocumentRect>>,
}

impl FakePage {
    fn grid(count: usize) -> Self {
        let rects = (0..count)
            .map(|i| Some(DocumentRect::new(20.0 + 110.0 * i as f32, 40.0, 100.0, 80.0)))
            .collect();
        Self { rects }
    }
}

impl LayoutSource for FakePage {
    fn elements(&self) -> Vec<ElementId> {
        (0..self.rects.len()).map(ElementId).collect()
    }

    fn bounding_rect(&self, element: ElementId) -> RippleResult<DocumentRect> {
        self.rects
            .get(element.0)
            .copied()
            .flatten()
            .ok_or(RippleError::LayoutQuery { element: element.0 })
    }
}

struct RecordedFrame {
    sprites: Vec<RippleSprite>,
    planes: Vec<PlaneDraw>,
}

#[derive(Default)]
struct RecordingBackend {
    resizes: Vec<Viewport>,
    rebuilds: Vec<(usize, Vec2)>,
    frames: Vec<RecordedFrame>,
    fail_resizes: usize,
    released: bool,
}

impl RenderBackend for RecordingBackend {
    fn resize(&mut self, viewport: Viewport) -> RippleResult<()> {
        if self.fail_resizes > 0 {
            self.fail_resizes -= 1;
            return Err(RippleError::BufferResize {
                buffer: "displacement",
                width: viewport.width,
                height: viewport.height,
                reason: "out of memory".into(),
            });
        }
        self.resizes.push(viewport);
        Ok(())
    }

    fn rebuild_plane(&mut self, index: usize, size: Vec2) {
        self.rebuilds.push((index, size));
    }

    fn render(&mut self, frame: &Frame<'_>) -> RippleResult<()> {
        self.frames.push(RecordedFrame {
            sprites: frame.sprites.to_vec(),
            planes: frame.planes.to_vec(),
        });
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
    }
}

fn running(page: &FakePage, backend: &mut RecordingBackend) -> FrameDriver {
    let mut driver = FrameDriver::new(RippleConfig::default(), Viewport::new(800, 600)).unwrap();
    let textures: Vec<TextureId> = (0..page.rects.len()).map(TextureId).collect();
    driver.start(page, &textures, backend).unwrap();
    driver
}

#[test]
fn test_pool_oldest_first_eviction() {
    let config = RippleConfig::default();
    let mut pool = RipplePool::new(config);

    for i in 0..=config.max_ripples {
        pool.spawn(Vec2::new(i as f32, 0.0));
    }

    assert_eq!(pool.slots().len(), config.max_ripples);
    assert!(pool.active_count() <= config.max_ripples);
    // slot 0 held spawn 0, now holds spawn 40; every other slot is untouched
    assert_eq!(pool.slots()[0].position.x, config.max_ripples as f32);
    for slot in 1..config.max_ripples {
        assert_eq!(pool.slots()[slot].position.x, slot as f32);
    }
    assert_eq!(pool.cursor(), 1);
}

#[test]
fn test_spawn_scenario_800x600() {
    let config = RippleConfig::default();
    let viewport = Viewport::new(800, 600);
    let mut pointer = PointerState::default();
    let mut pool = RipplePool::new(config);

    pointer.current = viewport.to_centered(50.0, 300.0);
    let at = pointer.take_spawn(config.dead_zone).expect("pointer moved");
    pool.spawn(at);

    assert_eq!(pool.active_count(), 1);
    let sprite = pool.slots()[0];
    assert_eq!(sprite.position, Vec2::new(-350.0, 0.0));
    assert_eq!(sprite.opacity, 1.0);
    assert_eq!(sprite.scale, Vec2::splat(1.75));
}

#[test]
fn test_driver_spawns_once_at_mapped_position() {
    let page = FakePage::grid(2);
    let mut backend = RecordingBackend::default();
    let mut driver = running(&page, &mut backend);
    let mut inbox = EventInbox::new();

    inbox.pointer_moved(50.0, 300.0);
    let stats = driver.tick(&mut inbox, &page, &mut backend);

    assert!(stats.spawned);
    assert_eq!(stats.active_ripples, 1);
    let frame = backend.frames.last().unwrap();
    assert_eq!(frame.sprites.len(), 1);
    assert_eq!(frame.sprites[0].position, Vec2::new(-350.0, 0.0));
    // spawned and aged once within the same frame
    assert!((frame.sprites[0].opacity - 0.95).abs() < 1e-6);

    // pointer did not move again: no second spawn
    let stats = driver.tick(&mut inbox, &page, &mut backend);
    assert!(!stats.spawned);
    assert_eq!(driver.pool().active_count(), 1);
}

#[test]
fn test_sub_pixel_jitter_does_not_spawn() {
    let page = FakePage::grid(1);
    let mut backend = RecordingBackend::default();
    let mut driver = running(&page, &mut backend);
    let mut inbox = EventInbox::new();

    // centered origin is pixel (400, 300)
    inbox.pointer_moved(400.05, 299.95);
    let stats = driver.tick(&mut inbox, &page, &mut backend);
    assert!(!stats.spawned);
    assert_eq!(driver.pool().active_count(), 0);
}

#[test]
fn test_ripple_retires_and_leaves_displacement_pass() {
    let page = FakePage::grid(1);
    let mut backend = RecordingBackend::default();
    let mut driver = running(&page, &mut backend);
    let mut inbox = EventInbox::new();
    let lifetime = driver.config().lifetime_ticks() as usize;

    inbox.pointer_moved(10.0, 10.0);
    for _ in 0..lifetime {
        driver.tick(&mut inbox, &page, &mut backend);
    }

    assert_eq!(backend.frames.len(), lifetime);
    assert_eq!(backend.frames[lifetime - 2].sprites.len(), 1);
    assert!(backend.frames[lifetime - 1].sprites.is_empty());
    assert_eq!(driver.pool().active_count(), 0);
}

#[test]
fn test_every_sprite_retires_in_bounded_ticks() {
    let config = RippleConfig::default();
    let mut pool = RipplePool::new(config);
    for i in 0..config.max_ripples {
        pool.spawn(Vec2::new(i as f32, -(i as f32)));
        pool.tick();
    }
    for _ in 0..config.lifetime_ticks() {
        pool.tick();
    }
    assert_eq!(pool.active_count(), 0);
}

#[test]
fn test_unchanged_layout_rebuilds_nothing() {
    let page = FakePage::grid(5);
    let mut backend = RecordingBackend::default();
    let mut driver = running(&page, &mut backend);
    let mut inbox = EventInbox::new();

    // initial geometry only
    assert_eq!(backend.rebuilds.len(), 5);

    let first = driver.tick(&mut inbox, &page, &mut backend);
    let second = driver.tick(&mut inbox, &page, &mut backend);
    assert_eq!(first.rebuilds, 0);
    assert_eq!(second.rebuilds, 0);
    assert_eq!(backend.rebuilds.len(), 5);
    assert_eq!(backend.frames[1].planes.len(), 5);
}

#[test]
fn test_size_change_rebuilds_one_plane() {
    let mut page = FakePage::grid(3);
    let mut backend = RecordingBackend::default();
    let mut driver = running(&page, &mut backend);
    let mut inbox = EventInbox::new();

    page.rects[1] = Some(DocumentRect::new(130.0, 40.0, 150.0, 90.0));
    let stats = driver.tick(&mut inbox, &page, &mut backend);

    assert_eq!(stats.rebuilds, 1);
    assert_eq!(backend.rebuilds.last(), Some(&(1, Vec2::new(150.0, 90.0))));
    assert_eq!(driver.planes()[1].last_known_size, Vec2::new(150.0, 90.0));

    let stats = driver.tick(&mut inbox, &page, &mut backend);
    assert_eq!(stats.rebuilds, 0);
}

#[test]
fn test_scroll_moves_planes_without_rebuild() {
    let mut page = FakePage::grid(2);
    let mut backend = RecordingBackend::default();
    let mut driver = running(&page, &mut backend);
    let mut inbox = EventInbox::new();
    let before = driver.planes()[0].position;

    for rect in page.rects.iter_mut().flatten() {
        rect.top -= 25.0;
    }
    assert!(inbox.scrolled());
    assert!(!inbox.scrolled());
    let stats = driver.tick(&mut inbox, &page, &mut backend);

    assert!(stats.scrolled);
    assert_eq!(stats.rebuilds, 0);
    // document moved up by 25 px -> centered y grows by 25
    assert_eq!(driver.planes()[0].position, before + Vec2::new(0.0, 25.0));
}

#[test]
fn test_plane_positions_are_centered() {
    let page = FakePage::grid(1);
    let mut backend = RecordingBackend::default();
    let mut driver = running(&page, &mut backend);
    let mut inbox = EventInbox::new();
    driver.tick(&mut inbox, &page, &mut backend);

    // rect (20, 40, 100, 80): center (70, 80) -> (-330, 220)
    let draw = backend.frames[0].planes[0];
    assert_eq!(draw.position, Vec2::new(-330.0, 220.0));
    assert_eq!(draw.size, Vec2::new(100.0, 80.0));
    assert_eq!(draw.texture, TextureId(0));
}

#[test]
fn test_missing_element_skipped_for_one_frame() {
    let mut page = FakePage::grid(3);
    let mut backend = RecordingBackend::default();
    let mut driver = running(&page, &mut backend);
    let mut inbox = EventInbox::new();

    let saved = page.rects[2].take();
    let stats = driver.tick(&mut inbox, &page, &mut backend);
    assert_eq!(stats.skipped_planes, 1);
    assert!(stats.rendered);
    let indices: Vec<usize> = backend.frames[0].planes.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![0, 1]);

    page.rects[2] = saved;
    let stats = driver.tick(&mut inbox, &page, &mut backend);
    assert_eq!(stats.skipped_planes, 0);
    assert_eq!(backend.frames[1].planes.len(), 3);
}

#[test]
fn test_resize_keeps_pool_and_planes() {
    let page = FakePage::grid(3);
    let mut resized_backend = RecordingBackend::default();
    let mut steady_backend = RecordingBackend::default();
    let mut resized = running(&page, &mut resized_backend);
    let mut steady = running(&page, &mut steady_backend);
    let mut resized_inbox = EventInbox::new();
    let mut steady_inbox = EventInbox::new();

    for x in [100.0, 200.0, 300.0] {
        resized_inbox.pointer_moved(x, 300.0);
        steady_inbox.pointer_moved(x, 300.0);
        resized.tick(&mut resized_inbox, &page, &mut resized_backend);
        steady.tick(&mut steady_inbox, &page, &mut steady_backend);
    }

    let before_bounds = resized.viewport().bounds();
    resized_inbox.resized(1024, 768);
    let stats = resized.tick(&mut resized_inbox, &page, &mut resized_backend);
    steady.tick(&mut steady_inbox, &page, &mut steady_backend);

    assert!(stats.rendered);
    assert_eq!(resized_backend.resizes, vec![Viewport::new(1024, 768)]);
    assert_ne!(resized.viewport().bounds(), before_bounds);
    assert_eq!(resized.viewport().bounds(), (-512.0, 512.0, -384.0, 384.0));
    assert_eq!(resized.pool().slots(), steady.pool().slots());

    let ids = |d: &FrameDriver| -> Vec<(ElementId, TextureId)> {
        d.planes().iter().map(|p| (p.element, p.texture)).collect()
    };
    assert_eq!(ids(&resized), ids(&steady));
}

#[test]
fn test_failed_resize_skips_frame_and_retries() {
    let page = FakePage::grid(1);
    let mut backend = RecordingBackend { fail_resizes: 1, ..Default::default() };
    let mut driver = running(&page, &mut backend);
    let mut inbox = EventInbox::new();

    inbox.resized(1280, 720);
    let stats = driver.tick(&mut inbox, &page, &mut backend);
    assert!(!stats.rendered);
    assert!(backend.frames.is_empty());
    assert_eq!(driver.viewport(), Viewport::new(800, 600));

    let stats = driver.tick(&mut inbox, &page, &mut backend);
    assert!(stats.rendered);
    assert_eq!(driver.viewport(), Viewport::new(1280, 720));
    assert_eq!(backend.resizes, vec![Viewport::new(1280, 720)]);
}

#[test]
fn test_minimized_viewport_renders_nothing() {
    let page = FakePage::grid(1);
    let mut backend = RecordingBackend::default();
    let mut driver = running(&page, &mut backend);
    let mut inbox = EventInbox::new();

    inbox.resized(0, 0);
    let stats = driver.tick(&mut inbox, &page, &mut backend);
    assert!(!stats.rendered);
    assert!(backend.resizes.is_empty());

    inbox.resized(800, 600);
    assert!(driver.tick(&mut inbox, &page, &mut backend).rendered);
    assert_eq!(backend.resizes, vec![Viewport::new(800, 600)]);
}

#[test]
fn test_lifecycle() {
    let page = FakePage::grid(2);
    let mut backend = RecordingBackend::default();
    let mut inbox = EventInbox::new();
    let mut driver = FrameDriver::new(RippleConfig::default(), Viewport::new(800, 600)).unwrap();

    assert_eq!(driver.state(), DriverState::Loading);
    inbox.pointer_moved(1.0, 1.0);
    assert_eq!(driver.tick(&mut inbox, &page, &mut backend), FrameStats::default());
    assert!(backend.frames.is_empty());

    let textures = [TextureId(7), TextureId(8)];
    driver.start(&page, &textures, &mut backend).unwrap();
    assert_eq!(driver.state(), DriverState::Running);
    assert!(matches!(
        driver.start(&page, &textures, &mut backend),
        Err(RippleError::InvalidState { expected: "Loading", actual: "Running" })
    ));

    driver.tick(&mut inbox, &page, &mut backend);
    driver.teardown(&mut backend);
    assert_eq!(driver.state(), DriverState::Stopped);
    assert!(backend.released);
    assert!(driver.planes().is_empty());

    let frames = backend.frames.len();
    driver.tick(&mut inbox, &page, &mut backend);
    assert_eq!(backend.frames.len(), frames);
}

#[test]
fn test_start_drops_vanished_elements() {
    let mut page = FakePage::grid(3);
    page.rects[0] = None;
    let mut backend = RecordingBackend::default();
    let driver = running(&page, &mut backend);

    assert_eq!(driver.planes().len(), 2);
    assert_eq!(driver.planes()[0].element, ElementId(1));
    assert_eq!(driver.planes()[0].texture, TextureId(1));
}

#[test]
fn test_error_locality() {
    assert!(RippleError::LayoutQuery { element: 3 }.is_frame_local());
    assert!(RippleError::Surface("lost".into()).is_frame_local());
    assert!(!RippleError::AssetLoad { url: "a.png".into(), reason: "404".into() }.is_frame_local());
}

#[test]
fn test_driver_rejects_invalid_config() {
    let config = RippleConfig { decay: 1.5, ..Default::default() };
    assert!(matches!(
        FrameDriver::new(config, Viewport::new(800, 600)),
        Err(RippleError::Config(_))
    ));
}
