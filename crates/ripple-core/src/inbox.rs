//! Input inbox drained once per frame
//!
//! Event handlers only write here; the frame driver is the only reader. Pointer
//! and resize keep the latest value, scroll is a coalescing flag.

use crate::coordinates::Viewport;
use glam::Vec2;

#[derive(Debug, Default)]
pub struct EventInbox {
    pointer: Option<Vec2>,
    resize: Option<Viewport>,
    scroll_pending: bool,
}

/// Everything the inbox collected since the previous drain
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Latest pointer position in device pixels
    pub pointer: Option<Vec2>,
    pub resize: Option<Viewport>,
    pub scrolled: bool,
}

impl EventInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer or touch moved (device pixels, top-left origin)
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = Some(Vec2::new(x, y));
    }

    pub fn resized(&mut self, width: u32, height: u32) {
        self.resize = Some(Viewport::new(width, height));
    }

    /// Record a scroll. Returns `true` only for the first scroll since the last
    /// drain, so the host schedules at most one layout refresh per frame.
    pub fn scrolled(&mut self) -> bool {
        !std::mem::replace(&mut self.scroll_pending, true)
    }

    /// Put back a resize the backend could not apply, unless a newer one arrived
    pub fn requeue_resize(&mut self, viewport: Viewport) {
        self.resize.get_or_insert(viewport);
    }

    pub fn drain(&mut self) -> FrameInput {
        FrameInput {
            pointer: self.pointer.take(),
            resize: self.resize.take(),
            scrolled: std::mem::take(&mut self.scroll_pending),
        }
    }
}
