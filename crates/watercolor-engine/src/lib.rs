//! Watercolor engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the effect layer:
//! window and frame loop, graphics context, viewport, input, timing, logging,
//! and the offscreen-target primitives feedback passes are built from.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
