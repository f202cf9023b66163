use glam::{Vec2, Vec3};

use watercolor_engine::coords::{ColorRgba, MAX_PIXEL_RATIO};

/// Which rendering path the experience drives.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Variant {
    /// Rotating shaded cube drawn straight to the visible surface.
    Cube,
    /// Cube + cursor marker fed through the ping-pong feedback pipeline.
    #[default]
    Watercolor,
}

/// Perspective camera parameters for the main scene.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
        }
    }
}

/// Orbit controls tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    /// Fraction of the pending rotation applied per update when damping.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.5,
            max_distance: 100.0,
        }
    }
}

/// Cursor marker and the invisible plane it is projected onto.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorConfig {
    /// Plane size in world units, centered at the origin, facing +Z.
    pub plane_size: Vec2,
    pub marker_radius: f32,
    pub marker_color: ColorRgba,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            plane_size: Vec2::new(10.0, 10.0),
            marker_radius: 0.15,
            marker_color: ColorRgba::new(0.15, 0.35, 0.85, 1.0),
        }
    }
}

/// Top-level experience configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub variant: Variant,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub cursor: CursorConfig,
    /// Clear color of the visible surface.
    pub clear_color: ColorRgba,
    /// Color the reference scene seeds the feedback loop with.
    pub paper_color: ColorRgba,
    pub max_pixel_ratio: f32,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            title: "watercolor".to_string(),
            width: 1280.0,
            height: 720.0,
            variant: Variant::default(),
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            cursor: CursorConfig::default(),
            clear_color: ColorRgba::from_hex(0x000000),
            paper_color: ColorRgba::new(0.96, 0.94, 0.89, 1.0),
            max_pixel_ratio: MAX_PIXEL_RATIO,
        }
    }
}
