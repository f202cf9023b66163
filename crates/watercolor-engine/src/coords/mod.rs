//! Coordinate types shared across the engine and the effect layer.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Pointer positions are converted to NDC through [`Viewport::pointer_to_ndc`].

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::{capped_pixel_ratio, Viewport, MAX_PIXEL_RATIO};
