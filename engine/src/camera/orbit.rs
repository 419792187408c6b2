//! Orbit Camera for the Garment Preview
//!
//! A spherical-coordinate camera circling the garment. The polar angle is
//! measured from +Y and kept inside configured bounds so the view never flips
//! over the top or under the bottom of the garment.
//!
//! Controls:
//! - Left mouse drag: Orbit (rotate around target)
//! - Scroll wheel: Zoom (change distance from target)

use glam::{Mat4, Vec3};

use crate::studio::config::CameraConfig;

/// Near clip plane.
const NEAR: f32 = 0.1;
/// Far clip plane.
const FAR: f32 = 100.0;
/// Scroll zoom factor: how much each scroll tick affects distance.
const SCROLL_FACTOR: f32 = 0.1;

/// A spherical-coordinate orbit camera.
///
/// # Coordinate System
/// - Azimuth: angle around +Y in radians, 0 looks down -Z from +Z
/// - Polar: angle from +Y in radians, clamped to the configured bounds
/// - Distance: clamped to the configured zoom range
/// - Y is up
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub azimuth: f32,
    polar: f32,
    distance: f32,
    pub target: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in radians.
    pub fov: f32,

    min_polar: f32,
    max_polar: f32,
    min_distance: f32,
    max_distance: f32,
    default_distance: f32,
    rotate_speed: f32,
    zoom_enabled: bool,

    // -- Mouse interaction state --
    is_orbiting: bool,
    last_mouse: Option<[f32; 2]>,
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            azimuth: 0.0,
            polar: std::f32::consts::FRAC_PI_2,
            distance: config.distance,
            target: Vec3::ZERO,
            aspect,
            fov: config.fov_degrees.to_radians(),
            min_polar: config.min_polar,
            max_polar: config.max_polar,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            default_distance: config.distance,
            rotate_speed: config.rotate_speed,
            zoom_enabled: config.zoom_enabled,
            is_orbiting: false,
            last_mouse: None,
        };
        camera.clamp();
        camera
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn polar_bounds(&self) -> (f32, f32) {
        (self.min_polar, self.max_polar)
    }

    pub fn distance_bounds(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    fn clamp(&mut self) {
        self.polar = self.polar.clamp(self.min_polar, self.max_polar);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    // ========================================================================
    // MATRIX COMPUTATION
    // ========================================================================

    /// Eye position from the spherical coordinates.
    pub fn eye_position(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        let offset = Vec3::new(
            self.distance * sin_polar * self.azimuth.sin(),
            self.distance * self.polar.cos(),
            self.distance * sin_polar * self.azimuth.cos(),
        );
        self.target + offset
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Perspective projection, depth range [0, 1] (wgpu convention).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, NEAR, FAR)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    // ========================================================================
    // INPUT HANDLING
    // ========================================================================

    /// Start or stop an orbit drag.
    pub fn set_orbiting(&mut self, pressed: bool) {
        self.is_orbiting = pressed;
        if !pressed {
            self.last_mouse = None;
        }
    }

    /// Feed a cursor position. Rotates only while a drag is in progress.
    pub fn handle_mouse_move(&mut self, x: f32, y: f32) {
        if let (true, Some([lx, ly])) = (self.is_orbiting, self.last_mouse) {
            self.orbit(x - lx, y - ly);
        }
        self.last_mouse = Some([x, y]);
    }

    /// Rotate by a drag delta in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * self.rotate_speed;
        self.polar -= dy * self.rotate_speed;
        self.clamp();
    }

    /// Multiplicative zoom. Positive delta zooms in.
    pub fn handle_scroll(&mut self, delta: f32) {
        if !self.zoom_enabled {
            return;
        }
        self.distance *= 1.0 - delta * SCROLL_FACTOR;
        self.clamp();
    }

    /// Update the viewport aspect ratio after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Whether the user is dragging the view right now.
    pub fn is_active(&self) -> bool {
        self.is_orbiting
    }

    pub fn reset(&mut self) {
        self.azimuth = 0.0;
        self.polar = std::f32::consts::FRAC_PI_2;
        self.distance = self.default_distance;
        self.target = Vec3::ZERO;
        self.clamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn camera() -> OrbitCamera {
        OrbitCamera::new(&CameraConfig::default(), 16.0 / 9.0)
    }

    #[test]
    fn test_default_eye_looks_from_front() {
        let cam = camera();
        let eye = cam.eye_position();
        assert!(approx_eq(eye.x, 0.0));
        assert!(approx_eq(eye.y, 0.0));
        assert!(approx_eq(eye.z, 6.0));
    }

    #[test]
    fn test_move_without_drag_does_nothing() {
        let mut cam = camera();
        cam.handle_mouse_move(10.0, 10.0);
        cam.handle_mouse_move(300.0, 300.0);
        assert!(approx_eq(cam.azimuth, 0.0));
        assert!(approx_eq(cam.polar(), std::f32::consts::FRAC_PI_2));
    }

    #[test]
    fn test_first_move_after_press_has_no_jump() {
        let mut cam = camera();
        cam.handle_mouse_move(10.0, 10.0);
        cam.set_orbiting(true);
        cam.handle_mouse_move(10.0, 10.0);
        assert!(approx_eq(cam.azimuth, 0.0));
        cam.handle_mouse_move(20.0, 10.0);
        assert!(approx_eq(cam.azimuth, -10.0 * CameraConfig::default().rotate_speed));
    }

    #[test]
    fn test_zoom_respects_bounds() {
        let mut cam = camera();
        for _ in 0..200 {
            cam.handle_scroll(3.0);
        }
        assert!(approx_eq(cam.distance(), cam.distance_bounds().0));
        for _ in 0..200 {
            cam.handle_scroll(-3.0);
        }
        assert!(approx_eq(cam.distance(), cam.distance_bounds().1));
    }

    #[test]
    fn test_zoom_can_be_disabled() {
        let config = CameraConfig {
            zoom_enabled: false,
            ..CameraConfig::default()
        };
        let mut cam = OrbitCamera::new(&config, 1.0);
        cam.handle_scroll(5.0);
        assert!(approx_eq(cam.distance(), config.distance));
    }

    #[test]
    fn test_reset_restores_front_view() {
        let mut cam = camera();
        cam.orbit(500.0, 80.0);
        cam.handle_scroll(2.0);
        cam.reset();
        assert!(approx_eq(cam.azimuth, 0.0));
        assert!(approx_eq(cam.distance(), 6.0));
    }

    #[test]
    fn test_resize_zero_ignored() {
        let mut cam = OrbitCamera::new(&CameraConfig::default(), 1.5);
        cam.resize(0, 0);
        assert!(approx_eq(cam.aspect, 1.5));
        cam.resize(1920, 1080);
        assert!(approx_eq(cam.aspect, 1920.0 / 1080.0));
    }
}
