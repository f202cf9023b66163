use glam::Vec2;

use watercolor_engine::coords::Viewport;
use watercolor_engine::render::DoubleBuffer;

use crate::backend::{DrawTarget, Pass, RenderBackend};
use crate::scene::{DrawableId, SceneGraph, SceneId};
use crate::targets::{TargetId, TargetPool};
use crate::uniforms::{UniformValue, U_RESOLUTION, U_TIME};

/// Main scene as rendered this frame.
pub const T_CURRENT: &str = "tCurrent";
/// Feedback from the previous frame (or the seed).
pub const T_PREV: &str = "tPrev";
/// Buffer presented by the composite pass.
pub const T_DIFFUSE: &str = "tDiffuse";

/// Ping-pong feedback loop over four offscreen targets.
///
/// Per frame: main scene into `source`, processing blends `source` with the
/// read buffer into the write buffer, composite presents the write buffer,
/// then the buffers swap. The first frame after (re)allocation reads the
/// seed target, which the reference scene fills once.
#[derive(Debug)]
pub struct FeedbackPipeline {
    targets: TargetPool,
    source: TargetId,
    seed: TargetId,
    buffers: DoubleBuffer<TargetId>,
    processing: DrawableId,
    composite: DrawableId,
    seeded: bool,
    frames_since_seed: u64,
    frames: u64,
}

impl FeedbackPipeline {
    /// `processing` and `composite` are the full-screen drawables whose
    /// texture inputs are rebound every frame.
    pub fn new(viewport: Viewport, processing: DrawableId, composite: DrawableId) -> Self {
        let size = viewport.logical_size();
        let mut targets = TargetPool::new();
        let source = targets.allocate("feedback source", size);
        let a = targets.allocate("feedback a", size);
        let b = targets.allocate("feedback b", size);
        let seed = targets.allocate("feedback seed", size);
        log::debug!("feedback targets allocated at {}x{}", size.0, size.1);

        Self {
            targets,
            source,
            seed,
            buffers: DoubleBuffer::new(a, b),
            processing,
            composite,
            seeded: false,
            frames_since_seed: 0,
            frames: 0,
        }
    }

    pub fn targets(&self) -> &TargetPool {
        &self.targets
    }

    pub fn source(&self) -> TargetId {
        self.source
    }

    pub fn seed(&self) -> TargetId {
        self.seed
    }

    /// Buffer the next processing pass writes.
    pub fn write_buffer(&self) -> TargetId {
        *self.buffers.write()
    }

    /// Buffer holding the last processed frame.
    pub fn read_buffer(&self) -> TargetId {
        *self.buffers.read()
    }

    /// What the next processing pass reads as the previous frame.
    pub fn previous_input(&self) -> TargetId {
        if self.frames_since_seed == 0 {
            self.seed
        } else {
            self.read_buffer()
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn size(&self) -> (u32, u32) {
        self.targets.size(self.source).unwrap_or((1, 1))
    }

    /// Resizes every target to the viewport's logical size.
    ///
    /// Target contents are lost on reallocation, so the loop is reseeded on
    /// the next frame. Returns whether anything changed.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let size = viewport.logical_size();
        if !self.targets.resize_all(size) {
            return false;
        }
        log::debug!("feedback targets resized to {}x{}", size.0, size.1);
        self.seeded = false;
        self.frames_since_seed = 0;
        true
    }

    /// Records one frame of passes into `backend`.
    pub fn render_frame<B>(&mut self, graph: &mut SceneGraph, backend: &mut B, elapsed: f32)
    where
        B: RenderBackend + ?Sized,
    {
        if !self.seeded {
            self.render(graph, backend, SceneId::Reference, DrawTarget::Offscreen(self.seed));
            self.seeded = true;
        }

        self.render(graph, backend, SceneId::Main, DrawTarget::Offscreen(self.source));

        let write = self.write_buffer();
        let (w, h) = self.size();
        if let Some(d) = graph.drawable_mut(SceneId::Processing, self.processing) {
            d.uniforms.set(T_CURRENT, UniformValue::Texture(Some(self.source)));
            d.uniforms.set(T_PREV, UniformValue::Texture(Some(self.previous_input())));
            d.uniforms.set(U_RESOLUTION, UniformValue::Vec2(Vec2::new(w as f32, h as f32)));
            d.uniforms.set(U_TIME, UniformValue::Float(elapsed));
        }
        self.render(graph, backend, SceneId::Processing, DrawTarget::Offscreen(write));

        if let Some(d) = graph.drawable_mut(SceneId::Composite, self.composite) {
            d.uniforms.set(T_DIFFUSE, UniformValue::Texture(Some(write)));
        }
        self.render(graph, backend, SceneId::Composite, DrawTarget::Surface);

        self.buffers.swap();
        self.frames_since_seed += 1;
        self.frames += 1;
    }

    fn render<B>(&self, graph: &SceneGraph, backend: &mut B, scene: SceneId, target: DrawTarget)
    where
        B: RenderBackend + ?Sized,
    {
        backend.render(Pass {
            graph,
            targets: &self.targets,
            scene,
            target,
        });
    }
}
