use glam::{Vec3, Vec4};

use watercolor_engine::coords::{ColorRgba, Viewport};
use watercolor_engine::input::{InputFrame, InputState};

use crate::backend::{DrawTarget, Pass, RenderBackend};
use crate::camera::{Camera, OrthographicCamera, PerspectiveCamera};
use crate::config::{ExperienceConfig, Variant};
use crate::controls::OrbitControls;
use crate::cursor::{CursorProjector, ReferencePlane};
use crate::feedback::FeedbackPipeline;
use crate::geometry::Geometry;
use crate::programs;
use crate::scene::{Drawable, DrawableId, Scene, SceneGraph, SceneId};
use crate::targets::TargetPool;
use crate::uniforms::{UniformSet, UniformValue, U_COLOR, U_TIME};

/// The effect, independent of any window or GPU.
///
/// Owns the scene graph, camera controls, cursor projector and (for the
/// watercolor variant) the feedback pipeline. A [`RenderBackend`] turns the
/// passes it issues into pixels.
#[derive(Debug)]
pub struct Experience {
    config: ExperienceConfig,
    viewport: Viewport,
    graph: SceneGraph,
    controls: OrbitControls,
    cursor: CursorProjector,
    pipeline: Option<FeedbackPipeline>,
    cube: DrawableId,
    marker: Option<DrawableId>,
}

impl Experience {
    pub fn new(config: ExperienceConfig, viewport: Viewport) -> Self {
        let viewport = viewport.with_pixel_ratio_cap(config.max_pixel_ratio);
        let mut graph = SceneGraph::new();

        let camera = PerspectiveCamera::from_config(&config.camera, viewport.aspect());
        let mut main = Scene::new(SceneId::Main, Camera::Perspective(camera));

        let cube_program = graph.add_program(programs::cube());
        let box_geometry = graph.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));
        let cube = main.add(
            Drawable::new("cube", box_geometry, cube_program)
                .with_uniforms(UniformSet::new().with(U_TIME, UniformValue::Float(0.0))),
        );

        let controls = OrbitControls::new(config.controls.clone(), config.camera.target);
        let plane = ReferencePlane::facing_z(Vec3::ZERO, config.cursor.plane_size);
        let cursor = CursorProjector::new(plane);

        let (marker, pipeline) = match config.variant {
            Variant::Cube => {
                main.clear = Some(config.clear_color);
                graph.insert_scene(main);
                (None, None)
            }
            Variant::Watercolor => {
                // Transparent so processing only picks up what was drawn.
                main.clear = Some(ColorRgba::transparent());

                let flat = graph.add_program(programs::flat());
                let sphere = graph.add_geometry(Geometry::sphere(config.cursor.marker_radius, 24, 16));
                let marker_color = Vec4::from_array(config.cursor.marker_color.to_array());
                // Hidden until the first pointer hit.
                let marker = main.add(
                    Drawable::new("cursor marker", sphere, flat)
                        .with_uniforms(UniformSet::new().with(U_COLOR, UniformValue::Vec4(marker_color)))
                        .hidden(),
                );
                graph.insert_scene(main);

                let pipeline = build_feedback_scenes(&mut graph, &config, viewport);
                (Some(marker), Some(pipeline))
            }
        };

        log::info!(
            "experience ready: {:?} variant at {}x{} (pixel ratio {})",
            config.variant,
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );

        Self {
            config,
            viewport,
            graph,
            controls,
            cursor,
            pipeline,
            cube,
            marker,
        }
    }

    pub fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn pipeline(&self) -> Option<&FeedbackPipeline> {
        self.pipeline.as_ref()
    }

    pub fn cursor(&self) -> &CursorProjector {
        &self.cursor
    }

    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.graph.scene(SceneId::Main)?.camera.as_perspective()
    }

    pub fn cube(&self) -> Option<&Drawable> {
        self.graph.scene(SceneId::Main)?.drawable(self.cube)
    }

    pub fn marker(&self) -> Option<&Drawable> {
        self.graph.scene(SceneId::Main)?.drawable(self.marker?)
    }

    /// Applies a new viewport: camera aspect first, then offscreen targets.
    ///
    /// Returns `false` without touching anything when the viewport is
    /// unchanged or degenerate.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let viewport = viewport.with_pixel_ratio_cap(self.config.max_pixel_ratio);
        if viewport == self.viewport || !viewport.is_valid() {
            return false;
        }
        self.viewport = viewport;

        if let Some(camera) = self.camera_mut() {
            camera.set_aspect(viewport.aspect());
        }
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.resize(viewport);
        }
        log::debug!("experience resized to {}x{} @{}", viewport.width, viewport.height, viewport.pixel_ratio);
        true
    }

    /// Projects a pointer position (logical pixels) onto the reference plane
    /// and moves the marker there. Misses change nothing.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> Option<Vec3> {
        let ndc = self.viewport.pointer_to_ndc(x, y);
        let camera = self.graph.scene(SceneId::Main)?.camera.as_perspective()?;
        let hit = self.cursor.project(ndc, camera)?;

        if let Some(marker) = self.marker {
            if let Some(d) = self.graph.drawable_mut(SceneId::Main, marker) {
                d.transform.position = hit;
                d.visible = true;
            }
        }
        Some(hit)
    }

    /// Advances time-driven state to `elapsed` seconds.
    pub fn animate(&mut self, elapsed: f32) {
        if let Some(cube) = self.graph.drawable_mut(SceneId::Main, self.cube) {
            cube.uniforms.set(U_TIME, UniformValue::Float(elapsed));
            cube.transform.rotation.x = elapsed.sin();
            cube.transform.rotation.y = elapsed.cos();
        }
    }

    /// Issues this frame's passes.
    pub fn render<B>(&mut self, backend: &mut B, elapsed: f32)
    where
        B: RenderBackend + ?Sized,
    {
        self.animate(elapsed);
        match self.pipeline.as_mut() {
            Some(pipeline) => pipeline.render_frame(&mut self.graph, backend, elapsed),
            None => backend.render(Pass {
                graph: &self.graph,
                targets: &TargetPool::new(),
                scene: SceneId::Main,
                target: DrawTarget::Surface,
            }),
        }
    }

    /// Feeds input to the orbit controls and applies them to the camera.
    pub fn update_controls(&mut self, input: &InputState, frame: &InputFrame) {
        self.controls.handle_input(input, frame, self.viewport.height);
        let Some(camera) = self.graph.scene_mut(SceneId::Main).and_then(|s| s.camera.as_perspective_mut()) else {
            return;
        };
        self.controls.update(camera);
    }

    fn camera_mut(&mut self) -> Option<&mut PerspectiveCamera> {
        self.graph.scene_mut(SceneId::Main)?.camera.as_perspective_mut()
    }
}

fn build_feedback_scenes(graph: &mut SceneGraph, config: &ExperienceConfig, viewport: Viewport) -> FeedbackPipeline {
    let quad = graph.add_geometry(Geometry::fullscreen_quad());
    let paper = graph.add_program(programs::paper());
    let processing = graph.add_program(programs::processing());
    let composite = graph.add_program(programs::composite());
    let fullscreen = || Camera::Orthographic(OrthographicCamera::fullscreen());

    let paper_color = Vec4::from_array(config.paper_color.to_array());
    let mut reference = Scene::new(SceneId::Reference, fullscreen()).with_clear(Some(config.paper_color));
    reference.add(
        Drawable::new("paper", quad, paper)
            .with_uniforms(UniformSet::new().with(U_COLOR, UniformValue::Vec4(paper_color))),
    );

    let mut processing_scene = Scene::new(SceneId::Processing, fullscreen());
    let processing_quad = processing_scene.add(Drawable::new("processing", quad, processing));

    let mut composite_scene = Scene::new(SceneId::Composite, fullscreen()).with_clear(Some(config.clear_color));
    let composite_quad = composite_scene.add(Drawable::new("composite", quad, composite));

    graph.insert_scene(reference);
    graph.insert_scene(processing_scene);
    graph.insert_scene(composite_scene);

    FeedbackPipeline::new(viewport, processing_quad, composite_quad)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::backend::recording::RecordingBackend;
    use crate::feedback::{T_DIFFUSE, T_PREV};

    fn watercolor(width: f32, height: f32, dpr: f32) -> Experience {
        Experience::new(ExperienceConfig::default(), Viewport::from_logical(width, height, dpr))
    }

    #[test]
    fn main_scene_holds_only_cube_and_marker() {
        let exp = watercolor(800.0, 600.0, 1.0);
        let main = exp.graph().scene(SceneId::Main).unwrap();
        let labels: Vec<_> = main.drawables().iter().map(|d| d.label).collect();
        assert_eq!(labels, ["cube", "cursor marker"]);
    }

    #[test]
    fn startup_sizes_follow_the_viewport() {
        let exp = watercolor(800.0, 600.0, 2.0);
        assert_eq!(exp.viewport().pixel_ratio, 2.0);
        assert!((exp.camera().unwrap().aspect - 4.0 / 3.0).abs() < 1e-6);
        let pipeline = exp.pipeline().unwrap();
        assert!(pipeline.targets().iter().all(|(_, d)| d.size == (800, 600)));
    }

    #[test]
    fn pixel_ratio_is_capped_by_config() {
        let config = ExperienceConfig { max_pixel_ratio: 1.0, ..ExperienceConfig::default() };
        let exp = Experience::new(config, Viewport::from_logical(800.0, 600.0, 2.0));
        assert_eq!(exp.viewport().pixel_ratio, 1.0);
    }

    #[test]
    fn camera_uses_configured_projection() {
        let exp = watercolor(800.0, 600.0, 1.0);
        let cam = exp.camera().unwrap();
        assert_eq!((cam.fov_y_degrees, cam.near, cam.far), (75.0, 0.1, 1000.0));
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn resize_updates_aspect_and_targets_once() {
        let mut exp = watercolor(800.0, 600.0, 1.0);
        assert!(exp.resize(Viewport::from_logical(1000.0, 500.0, 1.0)));
        assert!((exp.camera().unwrap().aspect - 2.0).abs() < 1e-6);
        assert!(exp.pipeline().unwrap().targets().iter().all(|(_, d)| d.size == (1000, 500)));
        assert!(!exp.resize(Viewport::from_logical(1000.0, 500.0, 1.0)));
        assert!(!exp.resize(Viewport::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn pointer_at_center_places_marker_at_origin() {
        let mut exp = watercolor(800.0, 600.0, 2.0);
        assert!(!exp.marker().unwrap().visible);

        let hit = exp.pointer_moved(400.0, 300.0).unwrap();
        assert!(hit.length() < 1e-4);
        let marker = exp.marker().unwrap();
        assert!(marker.visible);
        assert!(marker.transform.position.length() < 1e-4);
    }

    #[test]
    fn pointer_miss_keeps_marker() {
        let mut config = ExperienceConfig::default();
        config.cursor.plane_size = Vec2::splat(1.0);
        let mut exp = Experience::new(config, Viewport::from_logical(800.0, 600.0, 1.0));

        let hit = exp.pointer_moved(410.0, 290.0).unwrap();
        assert_eq!(exp.pointer_moved(0.0, 0.0), None);
        assert_eq!(exp.marker().unwrap().transform.position, hit);
    }

    #[test]
    fn cube_follows_elapsed_time() {
        let mut exp = watercolor(800.0, 600.0, 1.0);
        exp.animate(1.5);
        let cube = exp.cube().unwrap();
        assert_eq!(cube.uniforms.float(U_TIME), Some(1.5));
        assert_eq!(cube.transform.rotation.x, 1.5f32.sin());
        assert_eq!(cube.transform.rotation.y, 1.5f32.cos());
    }

    #[test]
    fn cube_variant_renders_straight_to_surface() {
        let config = ExperienceConfig { variant: Variant::Cube, ..ExperienceConfig::default() };
        let mut exp = Experience::new(config, Viewport::from_logical(800.0, 600.0, 1.0));
        assert!(exp.pipeline().is_none());
        assert!(exp.marker().is_none());

        let mut backend = RecordingBackend::default();
        exp.render(&mut backend, 0.25);
        assert_eq!(backend.passes.len(), 1);
        assert_eq!((backend.passes[0].scene, backend.passes[0].target), (SceneId::Main, DrawTarget::Surface));
        assert_eq!(exp.graph().scene(SceneId::Main).unwrap().clear, Some(ColorRgba::from_hex(0x000000)));
    }

    #[test]
    fn watercolor_frames_chain_through_the_feedback_buffers() {
        let mut exp = watercolor(800.0, 600.0, 1.0);
        let mut backend = RecordingBackend::default();

        exp.render(&mut backend, 0.0);
        let seed = exp.pipeline().unwrap().seed();
        assert_eq!(backend.texture(2, T_PREV), Some(seed));
        let first = backend.texture(3, T_DIFFUSE);

        backend.passes.clear();
        exp.render(&mut backend, 0.016);
        assert_eq!(backend.texture(1, T_PREV), first);
        assert_ne!(backend.texture(2, T_DIFFUSE), first);
    }

    #[test]
    fn idle_controls_do_not_move_the_camera() {
        let mut exp = watercolor(800.0, 600.0, 1.0);
        exp.update_controls(&InputState::default(), &InputFrame::default());
        assert!((exp.camera().unwrap().position - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }
}
