//! Decal Render Pass
//!
//! Uploads each artwork bitmap once as a texture keyed by artwork id and draws
//! the placed decal quads after the garment. Decals test depth with
//! `LessEqual`, never write it, and carry a negative depth bias so they win
//! against the surface they sit on while staying hidden behind the garment
//! when their side faces away.

use std::collections::HashMap;

use super::frame_target::{DEPTH_FORMAT, FRAME_FORMAT};
use super::gpu_context::GpuContext;
use super::shader_loader;
use crate::scene::{DecalInstance, DecalVertex, Scene};
use crate::studio::intake::UploadedArtwork;
use crate::studio::session::{Side, StudioSession};

/// Depth bias applied to decals, in depth-buffer units.
pub const DECAL_DEPTH_BIAS: i32 = -4;
/// Slope-scaled part of the decal depth bias.
pub const DECAL_SLOPE_BIAS: f32 = -1.0;

pub fn decal_depth_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: false,
        depth_compare: wgpu::CompareFunction::LessEqual,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState {
            constant: DECAL_DEPTH_BIAS,
            slope_scale: DECAL_SLOPE_BIAS,
            clamp: 0.0,
        },
    }
}

struct DecalTexture {
    // Kept alive for the bind group.
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

struct DecalQuad {
    artwork_id: u64,
    vertex_buffer: wgpu::Buffer,
}

pub struct DecalPass {
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: HashMap<u64, DecalTexture>,
    quads: Vec<DecalQuad>,
}

impl DecalPass {
    pub fn new(gpu: &GpuContext, scene_layout: &wgpu::BindGroupLayout) -> Self {
        let device = &gpu.device;
        let shader = shader_loader::create_shader_module(device, "Decal Shader", shader_loader::DECAL);

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Decal Texture Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Decal Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Decal Pipeline Layout"),
            bind_group_layouts: &[scene_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Decal Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<DecalVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: FRAME_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(decal_depth_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            texture_layout,
            sampler,
            textures: HashMap::new(),
            quads: Vec::new(),
        }
    }

    fn upload_texture(&self, gpu: &GpuContext, artwork: &UploadedArtwork) -> DecalTexture {
        let bitmap = artwork.bitmap();
        let (width, height) = bitmap.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("Decal {}", artwork.handle())),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bitmap.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Decal Bind Group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        tracing::debug!(artwork = artwork.id(), width, height, "decal texture uploaded");
        DecalTexture {
            _texture: texture,
            bind_group,
        }
    }

    /// Match GPU textures and quads to the scene's decals.
    pub fn sync(&mut self, gpu: &GpuContext, scene: &Scene, session: &StudioSession) {
        let live: Vec<u64> = Side::ALL
            .iter()
            .filter_map(|&side| session.artwork(side).map(|a| a.id()))
            .collect();
        let before = self.textures.len();
        self.textures.retain(|id, _| live.contains(id));
        if self.textures.len() != before {
            tracing::debug!(dropped = before - self.textures.len(), "decal textures released");
        }

        let max_dimension = gpu.device.limits().max_texture_dimension_2d;
        for side in Side::ALL {
            let Some(artwork) = session.artwork(side) else {
                continue;
            };
            let (width, height) = artwork.bitmap().dimensions();
            if width.max(height) > max_dimension {
                // Intake clamps to the device limit; this only trips if it was bypassed.
                tracing::warn!(%side, width, height, max_dimension, "artwork exceeds texture limit, not drawn");
                continue;
            }
            if !self.textures.contains_key(&artwork.id()) {
                let texture = self.upload_texture(gpu, artwork);
                self.textures.insert(artwork.id(), texture);
            }
        }

        self.quads = scene
            .decals()
            .map(|decal: &DecalInstance| DecalQuad {
                artwork_id: decal.artwork_id,
                vertex_buffer: gpu.buffer_from(
                    &format!("{} Decal Quad", decal.side),
                    &decal.vertices(),
                    wgpu::BufferUsages::VERTEX,
                ),
            })
            .collect();
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, scene_bind_group: &wgpu::BindGroup) {
        if self.quads.is_empty() {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, scene_bind_group, &[]);
        for quad in &self.quads {
            let Some(texture) = self.textures.get(&quad.artwork_id) else {
                continue;
            };
            pass.set_bind_group(1, &texture.bind_group, &[]);
            pass.set_vertex_buffer(0, quad.vertex_buffer.slice(..));
            pass.draw(0..6, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decal_depth_never_writes_and_biases_forward() {
        let state = decal_depth_state();
        assert!(!state.depth_write_enabled);
        assert_eq!(state.depth_compare, wgpu::CompareFunction::LessEqual);
        assert!(state.bias.constant < 0);
        assert!(state.bias.slope_scale <= 0.0);
    }
}
