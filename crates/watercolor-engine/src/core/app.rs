use crate::coords::Viewport;

use super::ctx::{ActivateCtx, FrameCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Call order for one window:
/// `on_activate` once → (`on_resize` | `on_pointer_move` | `on_frame`)* → `on_deactivate` once.
/// Resize and pointer callbacks are delivered only while the app holds a
/// subscription for the matching [`Topic`](super::Topic).
pub trait App {
    /// Called once after the window and GPU context exist.
    ///
    /// Create GPU resources and acquire listener subscriptions here. An error is
    /// fatal: it is logged once and the event loop exits.
    fn on_activate(&mut self, ctx: &mut ActivateCtx<'_, '_>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called once before the window is destroyed or the loop exits.
    fn on_deactivate(&mut self) {}

    /// Called synchronously after the surface was reconfigured, before the next frame.
    fn on_resize(&mut self, viewport: Viewport) {
        let _ = viewport;
    }

    /// Called for every pointer move, in logical window coordinates.
    fn on_pointer_move(&mut self, x: f32, y: f32) {
        let _ = (x, y);
    }

    /// Called once per display refresh.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
