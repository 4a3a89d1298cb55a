//! Host layout interface
//!
//! The page that owns the images is an external collaborator. The driver only
//! needs to enumerate image elements once and query their rectangles every frame.

use crate::coordinates::DocumentRect;
use crate::error::RippleResult;

/// Stable identity of an image element on the host page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

pub trait LayoutSource {
    /// Image elements in document order
    fn elements(&self) -> Vec<ElementId>;

    /// Current bounding rectangle relative to the viewport's top-left corner.
    /// Fails with [`RippleError::LayoutQuery`](crate::RippleError::LayoutQuery)
    /// if the element left the document.
    fn bounding_rect(&self, element: ElementId) -> RippleResult<DocumentRect>;
}
