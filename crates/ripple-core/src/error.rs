//! Error types for the ripple pipeline

use thiserror::Error;

/// Result type for ripple pipeline operations
pub type RippleResult<T> = Result<T, RippleError>;

/// Errors that can occur while loading or driving the pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RippleError {
    /// Texture fetch failed. Halts progression to `Running`; never retried.
    #[error("Asset load failed for {url}: {reason}")]
    AssetLoad { url: String, reason: String },

    /// Offscreen buffer could not be (re)allocated. Fatal to the current frame only.
    #[error("Buffer resize failed for {buffer} at {width}x{height}: {reason}")]
    BufferResize {
        buffer: &'static str,
        width: u32,
        height: u32,
        reason: String,
    },

    /// Element vanished between enumeration and query. The plane is skipped this frame.
    #[error("Layout query failed for element {element}")]
    LayoutQuery { element: usize },

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Invalid driver state: expected {expected}, was {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl RippleError {
    /// Whether the error only costs the current frame
    pub fn is_frame_local(&self) -> bool {
        matches!(
            self,
            RippleError::BufferResize { .. } | RippleError::LayoutQuery { .. } | RippleError::Surface(_)
        )
    }
}
