use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::render::{RenderCtx, SurfaceTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;
use super::listeners::Listeners;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size as `(width, height)` in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        logical_size(self.window)
    }
}

/// Context passed to `core::App::on_activate`.
pub struct ActivateCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a Gpu<'w>,
    pub listeners: &'a Listeners,
}

impl<'a, 'w> ActivateCtx<'a, 'w> {
    /// Renderer-facing view of the GPU context.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.gpu.viewport(),
        )
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires the surface, calls `draw` with a ready [`RenderCtx`] and
    /// [`SurfaceTarget`], then submits and presents the frame.
    ///
    /// All passes recorded by `draw` share one encoder and execute in recording
    /// order. Surface errors either skip the frame or, when fatal, request exit.
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut SurfaceTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::warn!("surface acquisition failed: {err}");
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.gpu.viewport(),
        );

        // SurfaceTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = SurfaceTarget::new(
                &mut frame.encoder,
                &frame.view,
                self.gpu.drawing_buffer_size(),
            );
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}

pub(crate) fn logical_size(window: &Window) -> (f32, f32) {
    let phys = window.inner_size();
    let scale = window.scale_factor();
    let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(scale);
    (logi.width as f32, logi.height as f32)
}

/// Window viewport with the pixel ratio capped at `max_pixel_ratio`.
pub(crate) fn viewport_of(window: &Window, max_pixel_ratio: f32) -> Viewport {
    viewport_from_physical(window.inner_size(), window.scale_factor(), max_pixel_ratio)
}

/// Viewport for a physical surface size at `scale`.
///
/// Both values must describe the same moment: pairing an old size with a new
/// scale yields a logical size the window never had.
pub(crate) fn viewport_from_physical(size: PhysicalSize<u32>, scale: f64, max_pixel_ratio: f32) -> Viewport {
    let logi: winit::dpi::LogicalSize<f64> = size.to_logical(scale);
    Viewport::from_logical(logi.width as f32, logi.height as f32, scale as f32)
        .with_pixel_ratio_cap(max_pixel_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_size_divides_by_scale() {
        let vp = viewport_from_physical(PhysicalSize::new(1600, 1200), 2.0, 2.0);
        assert_eq!((vp.width, vp.height), (800.0, 600.0));
        assert_eq!(vp.pixel_ratio, 2.0);
    }

    #[test]
    fn logical_size_ignores_the_cap() {
        let vp = viewport_from_physical(PhysicalSize::new(2400, 1800), 3.0, 2.0);
        assert_eq!((vp.width, vp.height), (800.0, 600.0));
        assert_eq!(vp.pixel_ratio, 2.0);
    }
}
