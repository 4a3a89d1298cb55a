//! Native stand-in for the host page: a scrollable, horizontally centered
//! column of images laid out in device pixels.

use ripple_core::{DocumentRect, ElementId, LayoutSource, RippleError, RippleResult, Viewport};

pub struct StaticPage {
    /// Natural image sizes, document order
    natural: Vec<(f32, f32)>,
    gap: f32,
    max_column_width: f32,
    viewport: Viewport,
    scroll: f32,
}

impl StaticPage {
    pub fn new(natural: Vec<(f32, f32)>, gap: f32, max_column_width: f32, viewport: Viewport) -> Self {
        Self {
            natural,
            gap: gap.max(0.0),
            max_column_width,
            viewport,
            scroll: 0.0,
        }
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Column width for the current viewport; images are scaled to it
    pub fn column_width(&self) -> f32 {
        let available = self.viewport.width as f32 - 2.0 * self.gap;
        available.min(self.max_column_width).max(1.0)
    }

    fn scaled_height(&self, (w, h): (f32, f32)) -> f32 {
        if w <= 0.0 {
            return 0.0;
        }
        h * self.column_width() / w
    }

    /// Total document height including the outer gaps
    pub fn content_height(&self) -> f32 {
        self.natural
            .iter()
            .map(|&size| self.scaled_height(size) + self.gap)
            .sum::<f32>()
            + self.gap
    }

    fn max_scroll(&self) -> f32 {
        (self.content_height() - self.viewport.height as f32).max(0.0)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scroll = self.scroll.clamp(0.0, self.max_scroll());
    }

    /// Scroll by `dy` pixels (positive is down the page). Returns whether the
    /// offset actually changed.
    pub fn scroll_by(&mut self, dy: f32) -> bool {
        let next = (self.scroll + dy).clamp(0.0, self.max_scroll());
        let changed = next != self.scroll;
        self.scroll = next;
        changed
    }
}

impl LayoutSource for StaticPage {
    fn elements(&self) -> Vec<ElementId> {
        (0..self.natural.len()).map(ElementId).collect()
    }

    fn bounding_rect(&self, element: ElementId) -> RippleResult<DocumentRect> {
        let size = *self
            .natural
            .get(element.0)
            .ok_or(RippleError::LayoutQuery { element: element.0 })?;

        let above: f32 = self.natural[..element.0]
            .iter()
            .map(|&s| self.scaled_height(s) + self.gap)
            .sum();

        let width = self.column_width();
        let left = (self.viewport.width as f32 - width) / 2.0;
        let top = self.gap + above - self.scroll;
        Ok(DocumentRect::new(left, top, width, self.scaled_height(size)))
    }
}
