//! Fixed light rig: ambient fill, a narrow key spot and a dim point light
//! from the opposite corner.

use glam::Vec3;

use crate::studio::config::LightConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    /// Unit vector from the light toward its target.
    pub direction: Vec3,
    pub intensity: f32,
    /// Cosine of the full cone half-angle.
    pub cos_outer: f32,
    /// Cosine of the half-angle where falloff begins.
    pub cos_inner: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub ambient: f32,
    pub spot: SpotLight,
    pub point: PointLight,
}

impl LightRig {
    pub fn new(config: &LightConfig) -> Self {
        let penumbra = config.spot_penumbra.clamp(0.0, 1.0);
        let inner_angle = config.spot_angle * (1.0 - penumbra);
        Self {
            ambient: config.ambient,
            spot: SpotLight {
                position: config.spot_position,
                direction: (-config.spot_position).normalize_or(Vec3::NEG_Y),
                intensity: config.spot_intensity,
                cos_outer: config.spot_angle.cos(),
                cos_inner: inner_angle.cos(),
            },
            point: PointLight {
                position: config.point_position,
                intensity: config.point_intensity,
            },
        }
    }
}
