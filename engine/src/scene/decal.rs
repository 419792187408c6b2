//! Decal Compositor
//!
//! Places uploaded artwork on the garment surface as flat textured quads.
//! Front decals sit just in front of the torso; back decals mirror the anchor
//! through the torso plane and turn half a revolution so the artwork reads
//! correctly when viewed from behind.

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

use crate::studio::config::DecalConfig;
use crate::studio::session::{DecalSize, Side, StudioSession};

/// Draw order for the garment body.
pub const GARMENT_RENDER_ORDER: i32 = 0;
/// Decals always draw after the garment.
pub const DECAL_RENDER_ORDER: i32 = 1;

/// Decal quad vertex in garment-local space.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DecalVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// A placed decal ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct DecalInstance {
    pub side: Side,
    pub size: DecalSize,
    /// Id of the artwork whose bitmap textures this quad.
    pub artwork_id: u64,
    pub width: f32,
    pub height: f32,
    pub anchor: Vec3,
    /// Rotation about the garment's vertical axis.
    pub yaw: f32,
    pub render_order: i32,
}

impl DecalInstance {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(self.width, self.height, 1.0),
            Quat::from_rotation_y(self.yaw),
            self.anchor,
        )
    }

    /// Outward direction the artwork faces.
    pub fn facing(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::Z
    }

    /// Two counter-clockwise triangles; uv (0,0) is the image's top-left.
    pub fn vertices(&self) -> [DecalVertex; 6] {
        let m = self.model_matrix();
        let corner = |x: f32, y: f32, u: f32, v: f32| DecalVertex {
            position: m.transform_point3(Vec3::new(x, y, 0.0)).to_array(),
            uv: [u, v],
        };
        let bl = corner(-0.5, -0.5, 0.0, 1.0);
        let br = corner(0.5, -0.5, 1.0, 1.0);
        let tr = corner(0.5, 0.5, 1.0, 0.0);
        let tl = corner(-0.5, 0.5, 0.0, 0.0);
        [bl, br, tr, bl, tr, tl]
    }
}

#[derive(Debug, Clone)]
pub struct DecalCompositor {
    config: DecalConfig,
}

impl DecalCompositor {
    pub fn new(config: DecalConfig) -> Self {
        Self { config }
    }

    pub fn dimensions(&self, size: DecalSize) -> [f32; 2] {
        match size {
            DecalSize::Small => self.config.small,
            DecalSize::Medium => self.config.medium,
            DecalSize::Large => self.config.large,
        }
    }

    pub fn anchor(&self, side: Side) -> (Vec3, f32) {
        let front = self.config.front_anchor;
        match side {
            Side::Front => (front, 0.0),
            Side::Back => (Vec3::new(front.x, front.y, -front.z), PI),
        }
    }

    pub fn compose(&self, side: Side, size: DecalSize, artwork_id: u64) -> DecalInstance {
        let [width, height] = self.dimensions(size);
        let (anchor, yaw) = self.anchor(side);
        DecalInstance {
            side,
            size,
            artwork_id,
            width,
            height,
            anchor,
            yaw,
            render_order: DECAL_RENDER_ORDER,
        }
    }

    /// One decal per side that currently holds artwork.
    pub fn compose_session(&self, session: &StudioSession) -> [Option<DecalInstance>; 2] {
        Side::ALL.map(|side| {
            session
                .artwork(side)
                .map(|art| self.compose(side, session.size(side), art.id()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compositor() -> DecalCompositor {
        DecalCompositor::new(DecalConfig::default())
    }

    #[test]
    fn sizes_map_to_dimensions() {
        let c = compositor();
        assert_eq!(c.dimensions(DecalSize::Small), [1.2, 1.2]);
        assert_eq!(c.dimensions(DecalSize::Medium), [2.0, 2.0]);
        assert_eq!(c.dimensions(DecalSize::Large), [2.2, 2.2]);
    }

    #[test]
    fn back_anchor_mirrors_front() {
        let c = compositor();
        let front = c.compose(Side::Front, DecalSize::Medium, 1);
        let back = c.compose(Side::Back, DecalSize::Medium, 2);
        assert_eq!(front.anchor, Vec3::new(0.0, 0.5, 0.11));
        assert_eq!(back.anchor, Vec3::new(0.0, 0.5, -0.11));
        assert!((front.facing() - Vec3::Z).length() < 1e-5);
        assert!((back.facing() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn decals_sit_outside_the_torso() {
        let c = compositor();
        for side in Side::ALL {
            let d = c.compose(side, DecalSize::Large, 1);
            for v in d.vertices() {
                assert!(v.position[2].abs() > 0.1, "{side:?} decal inside torso");
            }
        }
    }

    #[test]
    fn quad_winding_faces_outward() {
        let c = compositor();
        for side in Side::ALL {
            let d = c.compose(side, DecalSize::Small, 1);
            let v = d.vertices();
            let p = |i: usize| Vec3::from_array(v[i].position);
            let n = (p(1) - p(0)).cross(p(2) - p(0)).normalize();
            assert!((n - d.facing()).length() < 1e-4);
        }
    }

    #[test]
    fn size_change_keeps_anchor_and_order() {
        let c = compositor();
        let small = c.compose(Side::Front, DecalSize::Small, 3);
        let large = c.compose(Side::Front, DecalSize::Large, 3);
        assert_eq!(small.anchor, large.anchor);
        assert_eq!(small.yaw, large.yaw);
        assert!(large.width > small.width);
        assert_eq!(small.render_order, DECAL_RENDER_ORDER);
        assert!(DECAL_RENDER_ORDER > GARMENT_RENDER_ORDER);
    }
}
