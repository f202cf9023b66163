use anyhow::Context;
use winit::dpi::LogicalSize;

use watercolor_engine::core::{ActivateCtx, App as EngineApp, AppControl, FrameCtx, Subscription, Topic};
use watercolor_engine::coords::{ColorRgba, Viewport};
use watercolor_engine::device::{GpuInit, GraphicsError};
use watercolor_engine::input::Key;
use watercolor_engine::window::{Runtime, RuntimeConfig};

use crate::config::{ExperienceConfig, Variant};
use crate::experience::Experience;
use crate::renderer::SceneRenderer;

/// Window-level entry point.
///
/// ```rust,ignore
/// Application::new()
///     .title("watercolor")
///     .size(1280.0, 720.0)
///     .variant(Variant::Watercolor)
///     .run()?;
/// ```
pub struct Application {
    config: ExperienceConfig,
    gpu_init: GpuInit,
}

impl Application {
    pub fn new() -> Self {
        Self::with_config(ExperienceConfig::default())
    }

    pub fn with_config(config: ExperienceConfig) -> Self {
        Self { config, gpu_init: GpuInit::default() }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.config.variant = variant;
        self
    }

    pub fn clear_color(mut self, color: ColorRgba) -> Self {
        self.config.clear_color = color;
        self
    }

    pub fn gpu_init(mut self, gpu_init: GpuInit) -> Self {
        self.gpu_init = gpu_init;
        self
    }

    /// Runs the event loop until the window closes or Escape is pressed.
    pub fn run(self) -> anyhow::Result<()> {
        let runtime = RuntimeConfig {
            title: self.config.title.clone(),
            initial_size: LogicalSize::new(self.config.width, self.config.height),
            max_pixel_ratio: self.config.max_pixel_ratio,
        };
        Runtime::run(runtime, self.gpu_init, ExperienceApp::new(self.config)).context("watercolor runtime failed")
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine-facing half of the experience: GPU resources and subscriptions.
///
/// Everything here exists only between activation and deactivation.
struct ExperienceApp {
    config: ExperienceConfig,
    live: Option<Live>,
}

struct Live {
    experience: Experience,
    renderer: SceneRenderer,
    // Held for their drop side effect.
    _subscriptions: [Subscription; 2],
}

impl ExperienceApp {
    fn new(config: ExperienceConfig) -> Self {
        Self { config, live: None }
    }
}

impl EngineApp for ExperienceApp {
    fn on_activate(&mut self, ctx: &mut ActivateCtx<'_, '_>) -> anyhow::Result<()> {
        let viewport: Viewport = ctx.gpu.viewport();
        let experience = Experience::new(self.config.clone(), viewport);

        let rctx = ctx.render_ctx();
        let renderer = SceneRenderer::new(&rctx, experience.graph())
            .map_err(GraphicsError::from)
            .context("failed to build scene renderer")?;

        let subscriptions = [ctx.listeners.subscribe(Topic::Resize), ctx.listeners.subscribe(Topic::PointerMove)];
        log::debug!("experience activated");

        self.live = Some(Live {
            experience,
            renderer,
            _subscriptions: subscriptions,
        });
        Ok(())
    }

    fn on_deactivate(&mut self) {
        if self.live.take().is_some() {
            log::debug!("experience deactivated; listeners released");
        }
    }

    fn on_resize(&mut self, viewport: Viewport) {
        if let Some(live) = self.live.as_mut() {
            live.experience.resize(viewport);
        }
    }

    fn on_pointer_move(&mut self, x: f32, y: f32) {
        if let Some(live) = self.live.as_mut() {
            live.experience.pointer_moved(x, y);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }
        let Some(live) = self.live.as_mut() else {
            return AppControl::Continue;
        };

        let elapsed = ctx.time.elapsed;
        let (experience, renderer) = (&mut live.experience, &mut live.renderer);
        let control = ctx.render(|rctx, surface| {
            let mut passes = renderer.frame(rctx, surface);
            experience.render(&mut passes, elapsed);
        });

        experience.update_controls(ctx.input, ctx.input_frame);
        control
    }
}
