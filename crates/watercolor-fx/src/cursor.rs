use glam::{Vec2, Vec3};

use crate::camera::{PerspectiveCamera, Ray};

/// Marker position. Stays `Unset` until the first hit.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum CursorState {
    #[default]
    Unset,
    Positioned(Vec3),
}

/// Finite, double-sided rectangle the pointer is projected onto.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReferencePlane {
    pub center: Vec3,
    pub normal: Vec3,
    /// In-plane axes, unit length and orthogonal to `normal`.
    pub axes: [Vec3; 2],
    pub half_extents: Vec2,
}

impl ReferencePlane {
    /// Plane through `center` facing +Z.
    pub fn facing_z(center: Vec3, size: Vec2) -> Self {
        Self {
            center,
            normal: Vec3::Z,
            axes: [Vec3::X, Vec3::Y],
            half_extents: size * 0.5,
        }
    }

    /// Nearest point where `ray` crosses the rectangle, if any.
    pub fn intersect(&self, ray: Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = self.normal.dot(self.center - ray.origin) / denom;
        if t < 0.0 {
            return None;
        }
        let hit = ray.at(t);
        let local = hit - self.center;
        let inside = local.dot(self.axes[0]).abs() <= self.half_extents.x
            && local.dot(self.axes[1]).abs() <= self.half_extents.y;
        inside.then_some(hit)
    }
}

/// Projects pointer positions onto a [`ReferencePlane`].
///
/// Misses leave the last position untouched.
#[derive(Debug, Clone)]
pub struct CursorProjector {
    plane: ReferencePlane,
    state: CursorState,
}

impl CursorProjector {
    pub fn new(plane: ReferencePlane) -> Self {
        Self { plane, state: CursorState::Unset }
    }

    pub fn plane(&self) -> &ReferencePlane {
        &self.plane
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn position(&self) -> Option<Vec3> {
        match self.state {
            CursorState::Unset => None,
            CursorState::Positioned(p) => Some(p),
        }
    }

    /// Casts a ray through `ndc`. Returns the new position on a hit.
    pub fn project(&mut self, ndc: Vec2, camera: &PerspectiveCamera) -> Option<Vec3> {
        let hit = self.plane.intersect(camera.ray_through_ndc(ndc))?;
        self.state = CursorState::Positioned(hit);
        Some(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::from_config(&CameraConfig::default(), 800.0 / 600.0)
    }

    #[test]
    fn center_of_screen_hits_plane_origin() {
        let mut projector = CursorProjector::new(ReferencePlane::facing_z(Vec3::ZERO, Vec2::splat(10.0)));
        let hit = projector.project(Vec2::ZERO, &camera());
        let hit = hit.unwrap();
        assert!(hit.length() < 1e-4);
        assert_eq!(projector.position(), Some(hit));
    }

    #[test]
    fn starts_unset() {
        let projector = CursorProjector::new(ReferencePlane::facing_z(Vec3::ZERO, Vec2::splat(10.0)));
        assert_eq!(projector.state(), CursorState::Unset);
        assert_eq!(projector.position(), None);
    }

    #[test]
    fn miss_keeps_previous_position() {
        let mut projector = CursorProjector::new(ReferencePlane::facing_z(Vec3::ZERO, Vec2::splat(1.0)));
        let cam = camera();
        let first = projector.project(Vec2::new(0.05, 0.05), &cam).unwrap();

        // Screen corner lands far outside a 1x1 plane five units away.
        assert_eq!(projector.project(Vec2::new(1.0, 1.0), &cam), None);
        assert_eq!(projector.state(), CursorState::Positioned(first));
    }

    #[test]
    fn ray_parallel_to_plane_misses() {
        let plane = ReferencePlane::facing_z(Vec3::ZERO, Vec2::splat(10.0));
        let ray = Ray { origin: Vec3::new(0.0, 0.0, 1.0), direction: Vec3::X };
        assert_eq!(plane.intersect(ray), None);
    }

    #[test]
    fn plane_behind_ray_misses() {
        let plane = ReferencePlane::facing_z(Vec3::ZERO, Vec2::splat(10.0));
        let ray = Ray { origin: Vec3::new(0.0, 0.0, 1.0), direction: Vec3::Z };
        assert_eq!(plane.intersect(ray), None);
    }

    #[test]
    fn off_center_hit_matches_frustum_geometry() {
        let mut projector = CursorProjector::new(ReferencePlane::facing_z(Vec3::ZERO, Vec2::splat(20.0)));
        let cam = camera();
        let hit = projector.project(Vec2::new(0.0, 1.0), &cam).unwrap();
        // Top edge at distance 5 is 5 * tan(fov / 2) above center.
        let expected = 5.0 * (cam.fov_y_degrees.to_radians() * 0.5).tan();
        assert!((hit.y - expected).abs() < 1e-3);
        assert!(hit.x.abs() < 1e-4 && hit.z.abs() < 1e-4);
    }
}
