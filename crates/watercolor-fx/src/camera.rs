use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// Half-line in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn at(self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Right-handed perspective camera looking from `position` at `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl PerspectiveCamera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            fov_y_degrees: config.fov_y_degrees,
            aspect,
            near: config.near,
            far: config.far,
            position: config.position,
            target: config.target,
            up: Vec3::Y,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Depth maps to `[0, 1]`, matching wgpu clip space.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Ray from the eye through a point given in normalized device coordinates.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let through = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray {
            origin: self.position,
            direction: (through - self.position).normalize_or(self.forward()),
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }
}

/// Axis-aligned box camera used by the full-screen passes.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthographicCamera {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthographicCamera {
    /// Unit box that maps a 2x2 quad at z=0 onto the whole viewport.
    pub fn fullscreen() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
            near: -1.0,
            far: 1.0,
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}

/// Camera a scene is rendered with.
#[derive(Debug, Clone, PartialEq)]
pub enum Camera {
    Perspective(PerspectiveCamera),
    Orthographic(OrthographicCamera),
}

impl Camera {
    pub fn view_projection(&self) -> Mat4 {
        match self {
            Camera::Perspective(c) => c.view_projection(),
            Camera::Orthographic(c) => c.view_projection(),
        }
    }

    pub fn as_perspective(&self) -> Option<&PerspectiveCamera> {
        match self {
            Camera::Perspective(c) => Some(c),
            Camera::Orthographic(_) => None,
        }
    }

    pub fn as_perspective_mut(&mut self) -> Option<&mut PerspectiveCamera> {
        match self {
            Camera::Perspective(c) => Some(c),
            Camera::Orthographic(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::from_config(&CameraConfig::default(), 800.0 / 600.0)
    }

    #[test]
    fn center_ray_looks_down_negative_z() {
        let ray = camera().ray_through_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 5.0));
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn off_center_ray_leans_toward_the_pointer() {
        let ray = camera().ray_through_ndc(Vec2::new(0.5, -0.5));
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.y < 0.0);
        assert!((ray.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let clip = camera().view_projection().project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-6 && clip.y.abs() < 1e-6);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn invalid_aspect_is_ignored() {
        let mut cam = camera();
        cam.set_aspect(0.0);
        assert!((cam.aspect - 4.0 / 3.0).abs() < 1e-6);
        cam.set_aspect(2.0);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn fullscreen_ortho_keeps_quad_corners() {
        let vp = OrthographicCamera::fullscreen().view_projection();
        let p = vp.project_point3(Vec3::new(1.0, -1.0, 0.0));
        assert!((p.x - 1.0).abs() < 1e-6 && (p.y + 1.0).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&p.z));
    }
}
