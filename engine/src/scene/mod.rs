//! Scene Module
//!
//! CPU-side scene graph for the garment preview: shared mesh, current
//! material set, placed decals, camera, idle sway and lights. The scene
//! watches the session's revision counters and rebuilds only what changed.
//!
//! - [`mesh`] - Garment geometry and the mesh cache
//! - [`material`] - Colour to material binding
//! - [`decal`] - Artwork placement on the garment
//! - [`idle`] - Idle sway of the garment group
//! - [`lights`] - Fixed light rig

pub mod decal;
pub mod idle;
pub mod lights;
pub mod material;
pub mod mesh;

use std::sync::Arc;

use glam::{Mat4, Vec3};

pub use decal::{DECAL_RENDER_ORDER, DecalCompositor, DecalInstance, DecalVertex, GARMENT_RENDER_ORDER};
pub use idle::IdleRotation;
pub use lights::{LightRig, PointLight, SpotLight};
pub use material::{MaterialBinder, MaterialSet, SurfaceMaterial};
pub use mesh::{GarmentMesh, GarmentVertex, MeshCache, MeshSegment, MeshSource};

use crate::camera::OrbitCamera;
use crate::studio::config::StudioConfig;
use crate::studio::session::StudioSession;

/// What a [`Scene::sync`] call rebuilt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneChanges {
    pub materials: bool,
    pub decals: bool,
}

impl SceneChanges {
    pub fn any(&self) -> bool {
        self.materials || self.decals
    }
}

/// Per-frame view data handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct FrameView {
    pub view_proj: Mat4,
    /// Garment group transform (idle sway).
    pub model: Mat4,
    pub camera_position: Vec3,
}

pub struct Scene {
    mesh: Arc<GarmentMesh>,
    binder: MaterialBinder,
    compositor: DecalCompositor,
    materials: MaterialSet,
    decals: [Option<DecalInstance>; 2],
    pub camera: OrbitCamera,
    idle: IdleRotation,
    lights: LightRig,
    seen_color_revision: Option<u64>,
    seen_decal_revision: Option<u64>,
    material_rebuilds: u64,
}

impl Scene {
    pub fn new(config: &StudioConfig, mesh: Arc<GarmentMesh>, aspect: f32) -> Self {
        let binder = MaterialBinder::new(config.material.clone());
        let materials = binder.bind(config.color.default_color, &mesh);
        Self {
            mesh,
            binder,
            compositor: DecalCompositor::new(config.decals.clone()),
            materials,
            decals: [None, None],
            camera: OrbitCamera::new(&config.camera, aspect),
            idle: IdleRotation::new(&config.idle),
            lights: LightRig::new(&config.lights),
            seen_color_revision: None,
            seen_decal_revision: None,
            material_rebuilds: 0,
        }
    }

    /// Bring materials and decals up to date with `session`.
    pub fn sync(&mut self, session: &StudioSession) -> SceneChanges {
        let mut changes = SceneChanges::default();

        if self.seen_color_revision != Some(session.color_revision()) {
            self.materials = self.binder.bind(session.color(), &self.mesh);
            self.seen_color_revision = Some(session.color_revision());
            self.material_rebuilds += 1;
            changes.materials = true;
            tracing::debug!(color = %session.color(), "material set rebuilt");
        }

        if self.seen_decal_revision != Some(session.decal_revision()) {
            self.decals = self.compositor.compose_session(session);
            self.seen_decal_revision = Some(session.decal_revision());
            changes.decals = true;
            tracing::debug!(
                front = self.decals[0].is_some(),
                back = self.decals[1].is_some(),
                "decals recomposed"
            );
        }

        changes
    }

    pub fn advance(&mut self, dt: f32) {
        self.idle.advance(dt, self.camera.is_active());
    }

    pub fn mesh(&self) -> &Arc<GarmentMesh> {
        &self.mesh
    }

    pub fn materials(&self) -> &MaterialSet {
        &self.materials
    }

    pub fn decals(&self) -> impl Iterator<Item = &DecalInstance> {
        self.decals.iter().flatten()
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn idle(&self) -> &IdleRotation {
        &self.idle
    }

    pub fn material_rebuilds(&self) -> u64 {
        self.material_rebuilds
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.idle.yaw())
    }

    /// Per-frame view data for a viewport of the given aspect ratio.
    pub fn frame(&mut self, aspect: f32) -> FrameView {
        if aspect.is_finite() && aspect > 0.0 {
            self.camera.aspect = aspect;
        }
        FrameView {
            view_proj: self.camera.view_projection_matrix(),
            model: self.model_matrix(),
            camera_position: self.camera.eye_position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::studio::color::GarmentColor;

    fn scene() -> Scene {
        Scene::new(&StudioConfig::default(), Arc::new(GarmentMesh::builtin_tee()), 1.6)
    }

    #[test]
    fn first_sync_builds_everything_once() {
        let mut scene = scene();
        let session = StudioSession::default();
        let first = scene.sync(&session);
        assert!(first.materials && first.decals);
        assert!(!scene.sync(&session).any());
        assert_eq!(scene.material_rebuilds(), 1);
        assert_eq!(scene.decals().count(), 0);
    }

    #[test]
    fn colour_change_keeps_geometry() {
        let mut scene = scene();
        let mut session = StudioSession::default();
        scene.sync(&session);
        let mesh = Arc::clone(scene.mesh());

        session.set_color(GarmentColor::parse("#22c55e").unwrap());
        let changes = scene.sync(&session);
        assert!(changes.materials);
        assert!(!changes.decals);
        assert!(Arc::ptr_eq(&mesh, scene.mesh()));
        assert_eq!(scene.materials().color().to_hex(), "#22c55e");
    }

    #[test]
    fn idle_sway_rotates_model() {
        let mut scene = scene();
        assert_eq!(scene.model_matrix(), Mat4::IDENTITY);
        scene.advance(2.0);
        assert_ne!(scene.model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn frame_tracks_aspect() {
        let mut scene = scene();
        let wide = scene.frame(2.0).view_proj;
        let square = scene.frame(1.0).view_proj;
        assert_ne!(wide, square);
        assert_eq!(scene.frame(0.0).view_proj, square);
    }

    #[test]
    fn dragging_pauses_idle() {
        let mut scene = scene();
        scene.camera.set_orbiting(true);
        scene.advance(2.0);
        assert_eq!(scene.idle().elapsed(), 0.0);
    }
}
