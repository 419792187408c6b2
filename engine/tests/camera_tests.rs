//! Camera Tests - Orbit Bounds and Zoom
//!
//! The orbit camera must never leave its polar window or zoom range, no
//! matter how large a drag or scroll gets.

use std::f32::consts::PI;

use glam::Vec3;
use tee_studio_engine::camera::OrbitCamera;
use tee_studio_engine::studio::config::CameraConfig;

fn camera() -> OrbitCamera {
    OrbitCamera::new(&CameraConfig::default(), 16.0 / 10.0)
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_default_view_looks_at_origin_from_front() {
    let cam = camera();
    let eye = cam.eye_position();
    assert!((eye - Vec3::new(0.0, 0.0, 6.0)).length() < 1e-4);
    assert_eq!(cam.target, Vec3::ZERO);
    assert_eq!(cam.distance(), 6.0);
}

#[test]
fn test_default_bounds() {
    let cam = camera();
    let (min_polar, max_polar) = cam.polar_bounds();
    assert!((min_polar - PI / 3.0).abs() < 1e-6);
    assert!((max_polar - PI / 1.7).abs() < 1e-6);
    assert_eq!(cam.distance_bounds(), (2.5, 12.0));
}

// ============================================================================
// Orbit
// ============================================================================

#[test]
fn test_huge_drags_stay_inside_polar_window() {
    let mut cam = camera();
    let (min_polar, max_polar) = cam.polar_bounds();
    for dy in [1.0e6, -1.0e6, 5.0e3, -7.5e4, 1.0, -1.0] {
        cam.orbit(0.0, dy);
        assert!(cam.polar() >= min_polar - 1e-6, "polar {} below bound", cam.polar());
        assert!(cam.polar() <= max_polar + 1e-6, "polar {} above bound", cam.polar());
    }
}

#[test]
fn test_drag_sequence_through_mouse_moves() {
    let mut cam = camera();
    cam.set_orbiting(true);
    cam.handle_mouse_move(0.0, 0.0);
    cam.handle_mouse_move(0.0, 100_000.0);
    let (min_polar, max_polar) = cam.polar_bounds();
    assert!(cam.polar() >= min_polar - 1e-6 && cam.polar() <= max_polar + 1e-6);

    cam.set_orbiting(false);
    let before = cam.polar();
    cam.handle_mouse_move(0.0, -50_000.0);
    assert_eq!(cam.polar(), before, "moves without a drag must not orbit");
}

#[test]
fn test_eye_never_crosses_the_poles() {
    let mut cam = camera();
    cam.orbit(0.0, -1.0e9);
    let top = cam.eye_position();
    cam.orbit(0.0, 1.0e9);
    let bottom = cam.eye_position();
    let radius = cam.distance();
    assert!(top.y < radius * 0.9);
    assert!(bottom.y > -radius * 0.9);
}

// ============================================================================
// Zoom
// ============================================================================

#[test]
fn test_zoom_is_clamped() {
    let mut cam = camera();
    for _ in 0..500 {
        cam.handle_scroll(10.0);
    }
    assert!(cam.distance() >= 2.5 - 1e-5);
    for _ in 0..500 {
        cam.handle_scroll(-10.0);
    }
    assert!(cam.distance() <= 12.0 + 1e-5);
}

#[test]
fn test_zoom_can_be_disabled() {
    let config = CameraConfig {
        zoom_enabled: false,
        ..Default::default()
    };
    let mut cam = OrbitCamera::new(&config, 1.0);
    cam.handle_scroll(5.0);
    assert_eq!(cam.distance(), config.distance);
}

#[test]
fn test_reset_restores_default_view() {
    let mut cam = camera();
    cam.orbit(300.0, 40.0);
    cam.handle_scroll(3.0);
    cam.reset();
    assert!((cam.eye_position() - Vec3::new(0.0, 0.0, 6.0)).length() < 1e-4);
}
