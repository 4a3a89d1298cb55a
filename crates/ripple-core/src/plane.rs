//! Image planes: one textured quad per page image

use crate::coordinates::Viewport;
use crate::error::RippleResult;
use crate::layout::{ElementId, LayoutSource};
use glam::Vec2;

/// Opaque handle to a texture owned by the render backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct ImagePlane {
    pub element: ElementId,
    pub texture: TextureId,
    /// Center in centered space
    pub position: Vec2,
    pub size: Vec2,
    /// Size the current geometry was built for
    pub last_known_size: Vec2,
    /// Whether the last layout query succeeded
    pub visible: bool,
}

/// Outcome of one layout refresh for a plane
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneUpdate {
    /// Only the position changed
    Moved,
    /// Size changed; geometry must be rebuilt
    Resized,
    /// Layout query failed; skip this frame
    Skipped,
}

impl ImagePlane {
    /// Measure the element once and build the plane around it
    pub fn discover(
        layout: &dyn LayoutSource,
        element: ElementId,
        texture: TextureId,
        viewport: Viewport,
    ) -> RippleResult<Self> {
        let rect = layout.bounding_rect(element)?;
        let (position, size) = rect.to_centered(viewport);
        Ok(Self {
            element,
            texture,
            position,
            size,
            last_known_size: size,
            visible: true,
        })
    }

    /// Re-query the layout. Position and size are always refreshed; the result
    /// asks for a geometry rebuild when the size differs from the one the
    /// current geometry was built for.
    pub fn refresh(&mut self, layout: &dyn LayoutSource, viewport: Viewport) -> PlaneUpdate {
        let rect = match layout.bounding_rect(self.element) {
            Ok(rect) => rect,
            Err(e) => {
                tracing::debug!("Skipping plane for element {}: {}", self.element.0, e);
                self.visible = false;
                return PlaneUpdate::Skipped;
            }
        };

        let (position, size) = rect.to_centered(viewport);
        self.position = position;
        self.size = size;
        self.visible = true;

        if size != self.last_known_size {
            PlaneUpdate::Resized
        } else {
            PlaneUpdate::Moved
        }
    }

    /// Record that geometry now matches the measured size
    pub fn geometry_built(&mut self) {
        self.last_known_size = self.size;
    }
}
