use std::f32::consts::PI;

use glam::Vec3;

use watercolor_engine::input::{InputFrame, InputState, MouseButton};

use crate::camera::PerspectiveCamera;
use crate::config::ControlsConfig;

const POLAR_EPSILON: f32 = 1e-4;
const ZOOM_BASE: f32 = 0.95;

/// Polar coordinates around the orbit target, Y up.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y.
    phi: f32,
    /// Azimuth around Y, measured from +Z toward +X.
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self { radius, phi: 0.0, theta: 0.0 };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let s = self.phi.sin() * self.radius;
        Vec3::new(s * self.theta.sin(), self.phi.cos() * self.radius, s * self.theta.cos())
    }
}

/// Pointer-driven orbit of a perspective camera around a fixed target.
///
/// Left-drag rotates, the wheel zooms. With damping enabled only
/// `damping_factor` of the pending rotation is applied per [`update`](Self::update)
/// and the remainder decays, so motion eases out over later frames.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    config: ControlsConfig,
    target: Vec3,
    pending_theta: f32,
    pending_phi: f32,
    scale: f32,
}

impl OrbitControls {
    pub fn new(config: ControlsConfig, target: Vec3) -> Self {
        Self {
            config,
            target,
            pending_theta: 0.0,
            pending_phi: 0.0,
            scale: 1.0,
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Folds this frame's pointer drag and wheel motion into the pending motion.
    ///
    /// `viewport_height` is in logical pixels; a drag across the full height
    /// turns the camera by one revolution.
    pub fn handle_input(&mut self, input: &InputState, frame: &InputFrame, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        if input.button_down(MouseButton::Left) && frame.pointer_delta != glam::Vec2::ZERO {
            let speed = 2.0 * PI * self.config.rotate_speed / height;
            self.rotate_left(frame.pointer_delta.x * speed);
            self.rotate_up(frame.pointer_delta.y * speed);
        }
        if frame.wheel_lines != 0.0 {
            // Scrolling up (positive lines) moves the camera closer.
            self.scale *= ZOOM_BASE.powf(self.config.zoom_speed * frame.wheel_lines);
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.pending_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.pending_phi -= angle;
    }

    /// Whether an update would still move the camera.
    pub fn is_settled(&self) -> bool {
        self.pending_theta.abs() < 1e-6 && self.pending_phi.abs() < 1e-6 && self.scale == 1.0
    }

    /// Applies pending motion to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        let factor = if self.config.enable_damping {
            self.config.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.pending_theta * factor;
        spherical.phi = (spherical.phi + self.pending_phi * factor).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        spherical.radius = (spherical.radius * self.scale)
            .clamp(self.config.min_distance, self.config.max_distance);

        let position = self.target + spherical.to_offset();
        let moved = position.distance_squared(camera.position) > 1e-12;
        camera.position = position;
        camera.target = self.target;

        if self.config.enable_damping {
            self.pending_theta *= 1.0 - factor;
            self.pending_phi *= 1.0 - factor;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
        }
        self.scale = 1.0;

        moved
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::config::CameraConfig;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::from_config(&CameraConfig::default(), 1.0)
    }

    #[test]
    fn idle_controls_leave_camera_in_place() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(ControlsConfig::default(), Vec3::ZERO);
        assert!(!controls.update(&mut cam));
        assert!((cam.position - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn damping_applies_a_fraction_then_eases_out() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(ControlsConfig::default(), Vec3::ZERO);
        controls.rotate_left(-1.0);

        controls.update(&mut cam);
        let first = cam.position.x.atan2(cam.position.z);
        assert!((first - 0.05).abs() < 1e-4);

        for _ in 0..400 {
            controls.update(&mut cam);
        }
        let settled = cam.position.x.atan2(cam.position.z);
        assert!((settled - 1.0).abs() < 1e-3);
        assert!(controls.is_settled());
        assert!((cam.position.length() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn without_damping_rotation_is_immediate() {
        let mut cam = camera();
        let config = ControlsConfig { enable_damping: false, ..ControlsConfig::default() };
        let mut controls = OrbitControls::new(config, Vec3::ZERO);
        controls.rotate_left(-0.5);
        controls.update(&mut cam);
        assert!((cam.position.x.atan2(cam.position.z) - 0.5).abs() < 1e-4);
        assert!(controls.is_settled());
    }

    #[test]
    fn left_drag_rotates_and_hover_does_not() {
        let mut controls = OrbitControls::new(ControlsConfig::default(), Vec3::ZERO);
        let mut frame = InputFrame::default();
        frame.pointer_delta = Vec2::new(60.0, 0.0);

        let mut state = InputState::default();
        controls.handle_input(&state, &frame, 600.0);
        assert!(controls.is_settled());

        state.buttons_down.insert(MouseButton::Left);
        controls.handle_input(&state, &frame, 600.0);
        assert!(!controls.is_settled());
    }

    #[test]
    fn wheel_up_zooms_in_within_limits() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(ControlsConfig::default(), Vec3::ZERO);
        let mut frame = InputFrame::default();
        frame.wheel_lines = 2.0;
        controls.handle_input(&InputState::default(), &frame, 600.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - 5.0 * 0.95f32.powi(2)).abs() < 1e-4);

        frame.wheel_lines = -1000.0;
        controls.handle_input(&InputState::default(), &frame, 600.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let mut cam = camera();
        let config = ControlsConfig { enable_damping: false, ..ControlsConfig::default() };
        let mut controls = OrbitControls::new(config, Vec3::ZERO);
        controls.rotate_up(10.0);
        controls.update(&mut cam);
        assert!(cam.position.y > 4.99);
        assert!(cam.position.x.abs() + cam.position.z.abs() > 0.0);
    }
}
