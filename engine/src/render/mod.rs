//! Render Module
//!
//! wgpu rendering for the garment preview: GPU context, uniforms, the
//! garment and decal passes, the offscreen frame target and snapshot readback.

pub mod capture;
pub mod decal_pass;
pub mod frame_target;
pub mod garment_pass;
pub mod gpu_context;
pub mod renderer;
pub mod shader_loader;
pub mod uniforms;

pub use frame_target::{DEPTH_FORMAT, FRAME_FORMAT};
pub use gpu_context::{GpuContext, GpuContextConfig};
pub use renderer::{FrameStatus, PreviewRenderer};
pub use uniforms::{MaterialUniforms, SceneUniforms};
