//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain) at the viewport's drawing-buffer size
//! - acquiring frames and providing encoders/views for rendering
//! - compiling shader programs and surfacing compile errors

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::{GraphicsError, GraphicsInitError, ShaderCompileError, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
