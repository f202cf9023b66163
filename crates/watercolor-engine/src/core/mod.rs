//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the runtime (platform loop)
//! and higher layers (the effect, the studio binary). It avoids leaking runtime
//! internals into user code and provides a consistent per-frame context.

mod app;
mod ctx;
mod listeners;

pub use app::{App, AppControl};
pub use ctx::{ActivateCtx, FrameCtx, WindowCtx};
pub use listeners::{Listeners, Subscription, Topic};

pub(crate) use ctx::{viewport_from_physical, viewport_of};
