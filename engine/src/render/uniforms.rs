//! Uniform Structs for GPU Shaders
//!
//! GPU-compatible uniform buffer structures. Layouts must match the WGSL
//! structs in `shaders/` exactly; vec3 fields are always followed by a scalar
//! so nothing relies on implicit padding.

use glam::Mat4;
use static_assertions::const_assert_eq;

use crate::scene::{FrameView, LightRig, SurfaceMaterial};

/// Per-frame camera, garment transform and light rig.
///
/// WGSL layout (208 bytes):
///   offset   0: view_proj (mat4x4<f32>)      = 64 bytes
///   offset  64: model (mat4x4<f32>)          = 64 bytes
///   offset 128: camera_pos + ambient         = 16 bytes
///   offset 144: spot_position + intensity    = 16 bytes
///   offset 160: spot_direction + cos_outer   = 16 bytes
///   offset 176: point_position + intensity   = 16 bytes
///   offset 192: spot_cos_inner + 3 pad       = 16 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub ambient: f32,
    pub spot_position: [f32; 3],
    pub spot_intensity: f32,
    pub spot_direction: [f32; 3],
    pub spot_cos_outer: f32,
    pub point_position: [f32; 3],
    pub point_intensity: f32,
    pub spot_cos_inner: f32,
    pub _pad: [f32; 3],
}

const_assert_eq!(std::mem::size_of::<SceneUniforms>(), 208);

impl SceneUniforms {
    pub fn new(view: &FrameView, lights: &LightRig) -> Self {
        Self {
            view_proj: view.view_proj.to_cols_array_2d(),
            model: view.model.to_cols_array_2d(),
            camera_pos: view.camera_position.to_array(),
            ambient: lights.ambient,
            spot_position: lights.spot.position.to_array(),
            spot_intensity: lights.spot.intensity,
            spot_direction: lights.spot.direction.to_array(),
            spot_cos_outer: lights.spot.cos_outer,
            point_position: lights.point.position.to_array(),
            point_intensity: lights.point.intensity,
            spot_cos_inner: lights.spot.cos_inner,
            _pad: [0.0; 3],
        }
    }
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0, 0.0, 6.0],
            ambient: 0.5,
            spot_position: [10.0; 3],
            spot_intensity: 1.0,
            spot_direction: [-0.577_350_3; 3],
            spot_cos_outer: 0.15f32.cos(),
            point_position: [-10.0; 3],
            point_intensity: 0.5,
            spot_cos_inner: 1.0,
            _pad: [0.0; 3],
        }
    }
}

/// One segment's surface material.
///
/// WGSL layout (48 bytes):
///   offset  0: base_color + roughness          = 16 bytes
///   offset 16: emissive + emissive_intensity   = 16 bytes
///   offset 32: metalness + 3 pad               = 16 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniforms {
    pub base_color: [f32; 3],
    pub roughness: f32,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub _pad: [f32; 3],
}

const_assert_eq!(std::mem::size_of::<MaterialUniforms>(), 48);

impl From<&SurfaceMaterial> for MaterialUniforms {
    fn from(m: &SurfaceMaterial) -> Self {
        Self {
            base_color: m.base_color.to_array(),
            roughness: m.roughness,
            emissive: m.emissive.to_array(),
            emissive_intensity: m.emissive_intensity,
            metalness: m.metalness,
            _pad: [0.0; 3],
        }
    }
}
