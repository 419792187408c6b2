//! Tee Studio Engine Library
//!
//! A small wgpu garment previewer: pick a colour, drop artwork on the front or
//! back, orbit around the tee and export a snapshot. The library holds all
//! state and rendering; the binary only wires window events to it.
//!
//! # Modules
//!
//! - [`studio`] - Session state, intake, config, errors, notices, export
//! - [`scene`] - Garment mesh, materials, decals, idle sway and lights
//! - [`render`] - wgpu passes, offscreen frame target and readback
//! - [`camera`] - Bounded orbit camera
//! - [`input`] - Key bindings, pointer state and drop targeting
//!
//! # Example
//!
//! ```ignore
//! use tee_studio_engine::studio::{StudioConfig, StudioSession, PreviewRegistry, Side};
//! use tee_studio_engine::scene::{MeshCache, MeshSource, Scene};
//!
//! let config = StudioConfig::default();
//! let mut registry = PreviewRegistry::new();
//! let mut session = StudioSession::new(config.color.default_color);
//! let mesh = MeshCache::new().get(&MeshSource::Builtin)?;
//! let mut scene = Scene::new(&config, mesh, 16.0 / 10.0);
//!
//! session.upload(Side::Front, file, &config.intake, &mut registry)?;
//! let changes = scene.sync(&session);
//! renderer.apply(changes, &scene, &session);
//! renderer.render(&mut scene);
//! ```

pub mod camera;
pub mod input;
pub mod render;
pub mod scene;

// Domain state lives next to the binary (src/studio/).
#[path = "../../src/studio/mod.rs"]
pub mod studio;

pub use camera::OrbitCamera;
pub use input::{KeyBindings, KeyCode, StudioAction};
pub use render::{FrameStatus, PreviewRenderer};
pub use scene::{Scene, SceneChanges};
pub use studio::{StudioConfig, StudioError, StudioResult, StudioSession};
