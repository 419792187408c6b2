//! Camera Module
//!
//! Orbit camera used by the garment preview.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tee_studio_engine::camera::OrbitCamera;
//!
//! let mut camera = OrbitCamera::new(&config.camera, width as f32 / height as f32);
//! camera.set_orbiting(true);
//! camera.handle_mouse_move(x, y);
//! let view_proj = camera.view_projection_matrix();
//! ```

pub mod orbit;

pub use orbit::OrbitCamera;
