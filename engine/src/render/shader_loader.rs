//! Shader Loading Utilities
//!
//! WGSL sources are embedded at compile time; the browser build has no
//! filesystem to load them from.

/// Garment surface shader.
pub const GARMENT: &str = include_str!("../../../shaders/garment.wgsl");
/// Decal quad shader.
pub const DECAL: &str = include_str!("../../../shaders/decal.wgsl");
/// Offscreen-to-surface blit shader.
pub const BLIT: &str = include_str!("../../../shaders/blit.wgsl");

/// Every embedded shader with its label.
pub const ALL: [(&str, &str); 3] = [("garment", GARMENT), ("decal", DECAL), ("blit", BLIT)];

/// Create a wgpu shader module from WGSL source.
pub fn create_shader_module(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}
