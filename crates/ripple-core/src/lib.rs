//! Ripple refraction core
//!
//! GPU-free half of the ripple renderer. Everything here runs on the CPU and is
//! driven once per display refresh by [`FrameDriver`]:
//!
//! 1. **Coordinate mapping**: document pixels to the centered, y-up space shared by all passes
//! 2. **Ripple pool**: fixed ring of fading, growing sprites spawned by pointer motion
//! 3. **Image planes**: layout-derived transforms for the content layer
//! 4. **Frame driver**: orders layout, pointer, pool and the three render passes
//!
//! The GPU side lives behind [`RenderBackend`]; the host page behind [`LayoutSource`].

pub mod assets;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod driver;
pub mod error;
pub mod inbox;
pub mod layout;
pub mod plane;
pub mod pointer;
pub mod pool;
pub mod refraction;

#[cfg(test)]
mod tests;

pub use assets::{preload, Preloaded, TextureSource};
pub use config::RippleConfig;
pub use coordinates::{from_centered, to_centered, DocumentRect, Viewport};
pub use driver::{DriverState, Frame, FrameDriver, FrameStats, PlaneDraw, RenderBackend};
pub use error::{RippleError, RippleResult};
pub use inbox::{EventInbox, FrameInput};
pub use layout::{ElementId, LayoutSource};
pub use plane::{ImagePlane, PlaneUpdate, TextureId};
pub use pointer::PointerState;
pub use pool::{RipplePool, RippleSprite};
