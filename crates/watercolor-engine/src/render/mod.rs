//! GPU rendering primitives shared by effect renderers.
//!
//! - [`RenderCtx`]: device/queue/surface format/viewport handed to renderers
//! - [`SurfaceTarget`]: the visible surface for the current frame
//! - [`RenderTarget`]: offscreen color buffer, drawable and sampleable
//! - [`DoubleBuffer`]: two slots + index flag for ping-pong passes
//! - [`compile_program`]: WGSL compilation with error reporting

mod ctx;
mod ping_pong;
mod program;
mod target;

pub use ctx::{RenderCtx, SurfaceTarget};
pub use ping_pong::DoubleBuffer;
pub use program::compile_program;
pub use target::{DepthTarget, RenderTarget, OFFSCREEN_FORMAT};
