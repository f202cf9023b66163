//! Scene graph: geometries and programs in append-only arenas, plus the four
//! named scenes the experience renders.

use glam::{EulerRot, Mat4, Quat, Vec3};

use watercolor_engine::coords::ColorRgba;

use crate::camera::Camera;
use crate::geometry::Geometry;
use crate::uniforms::UniformSet;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct GeometryId(pub(crate) usize);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ProgramId(pub(crate) usize);

/// Index of a drawable within its scene.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DrawableId(pub(crate) usize);

impl GeometryId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ProgramId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl DrawableId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Shader program description.
///
/// `source` is WGSL exposing `vs_main`/`fs_main`. Texture slots name the
/// uniforms bound to texture bindings 1 and 2.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramDesc {
    pub label: &'static str,
    pub source: &'static str,
    pub texture_slots: [Option<&'static str>; 2],
    pub depth_test: bool,
}

/// Scenes are addressed by role, not by position.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum SceneId {
    /// Interactive 3D scene.
    Main,
    /// Seeds the feedback loop once.
    Reference,
    /// Blends the current frame with the previous feedback buffer.
    Processing,
    /// Presents the latest feedback buffer.
    Composite,
}

impl SceneId {
    pub const ALL: [SceneId; 4] = [SceneId::Main, SceneId::Reference, SceneId::Processing, SceneId::Composite];

    pub fn label(self) -> &'static str {
        match self {
            SceneId::Main => "main",
            SceneId::Reference => "reference",
            SceneId::Processing => "processing",
            SceneId::Composite => "composite",
        }
    }
}

/// Position, Euler rotation (XYZ order, radians) and scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// Geometry + program + per-drawable inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub label: &'static str,
    pub geometry: GeometryId,
    pub program: ProgramId,
    pub uniforms: UniformSet,
    pub transform: Transform,
    pub visible: bool,
}

impl Drawable {
    pub fn new(label: &'static str, geometry: GeometryId, program: ProgramId) -> Self {
        Self {
            label,
            geometry,
            program,
            uniforms: UniformSet::new(),
            transform: Transform::default(),
            visible: true,
        }
    }

    pub fn with_uniforms(mut self, uniforms: UniformSet) -> Self {
        self.uniforms = uniforms;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Ordered drawables and the camera they are seen through.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: SceneId,
    pub camera: Camera,
    /// Clear color for the destination. `None` keeps prior contents.
    pub clear: Option<ColorRgba>,
    drawables: Vec<Drawable>,
}

impl Scene {
    pub fn new(id: SceneId, camera: Camera) -> Self {
        Self {
            id,
            camera,
            clear: Some(ColorRgba::transparent()),
            drawables: Vec::new(),
        }
    }

    pub fn with_clear(mut self, clear: Option<ColorRgba>) -> Self {
        self.clear = clear;
        self
    }

    /// Drawables are never removed, so ids stay valid.
    pub fn add(&mut self, drawable: Drawable) -> DrawableId {
        let id = DrawableId(self.drawables.len());
        self.drawables.push(drawable);
        id
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn drawable(&self, id: DrawableId) -> Option<&Drawable> {
        self.drawables.get(id.0)
    }

    pub fn drawable_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        self.drawables.get_mut(id.0)
    }
}

/// Owner of every geometry, program and scene.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    geometries: Vec<Geometry>,
    programs: Vec<ProgramDesc>,
    scenes: Vec<Scene>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() - 1)
    }

    pub fn add_program(&mut self, program: ProgramDesc) -> ProgramId {
        self.programs.push(program);
        ProgramId(self.programs.len() - 1)
    }

    /// Installs `scene`, replacing any scene with the same id.
    pub fn insert_scene(&mut self, scene: Scene) {
        match self.scenes.iter_mut().find(|s| s.id == scene.id) {
            Some(slot) => *slot = scene,
            None => self.scenes.push(scene),
        }
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id.0)
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn program(&self, id: ProgramId) -> Option<&ProgramDesc> {
        self.programs.get(id.0)
    }

    pub fn programs(&self) -> &[ProgramDesc] {
        &self.programs
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id == id)
    }

    pub fn drawable_mut(&mut self, scene: SceneId, id: DrawableId) -> Option<&mut Drawable> {
        self.scene_mut(scene)?.drawable_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrthographicCamera;

    #[test]
    fn transform_applies_scale_then_rotation_then_translation() {
        let t = Transform {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            scale: Vec3::splat(2.0),
        };
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn scenes_are_found_by_role() {
        let mut graph = SceneGraph::new();
        let cam = Camera::Orthographic(OrthographicCamera::fullscreen());
        graph.insert_scene(Scene::new(SceneId::Composite, cam.clone()));
        graph.insert_scene(Scene::new(SceneId::Processing, cam.clone()));
        assert!(graph.scene(SceneId::Main).is_none());
        assert_eq!(graph.scene(SceneId::Processing).map(|s| s.id), Some(SceneId::Processing));

        graph.insert_scene(Scene::new(SceneId::Composite, cam).with_clear(None));
        assert_eq!(graph.scene(SceneId::Composite).map(|s| s.clear), Some(None));
    }

    #[test]
    fn drawable_ids_follow_insertion_order() {
        let mut graph = SceneGraph::new();
        let quad = graph.add_geometry(Geometry::fullscreen_quad());
        let program = graph.add_program(ProgramDesc {
            label: "flat",
            source: "",
            texture_slots: [None, None],
            depth_test: false,
        });
        let mut scene = Scene::new(SceneId::Main, Camera::Orthographic(OrthographicCamera::fullscreen()));
        let a = scene.add(Drawable::new("a", quad, program));
        let b = scene.add(Drawable::new("b", quad, program).hidden());
        assert_eq!((a.index(), b.index()), (0, 1));
        assert!(!scene.drawables()[1].visible);
    }
}
