//! Garment Render Pass
//!
//! Draws every mesh segment with its own material uniform buffer. Vertex and
//! index buffers are uploaded once from the shared mesh; a colour change only
//! rewrites the existing material buffers.

use super::frame_target::{DEPTH_FORMAT, FRAME_FORMAT};
use super::gpu_context::GpuContext;
use super::shader_loader;
use super::uniforms::MaterialUniforms;
use crate::scene::{GarmentMesh, GarmentVertex, MaterialSet};

/// GPU buffers for one mesh segment.
struct SegmentBuffers {
    label: String,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
}

pub struct GarmentPass {
    pipeline: wgpu::RenderPipeline,
    segments: Vec<SegmentBuffers>,
}

fn garment_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GarmentVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

impl GarmentPass {
    pub fn new(
        gpu: &GpuContext,
        scene_layout: &wgpu::BindGroupLayout,
        mesh: &GarmentMesh,
        materials: &MaterialSet,
    ) -> Self {
        let device = &gpu.device;
        let shader = shader_loader::create_shader_module(device, "Garment Shader", shader_loader::GARMENT);

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Garment Material Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Garment Pipeline Layout"),
            bind_group_layouts: &[scene_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Garment Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[garment_vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: FRAME_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let segments = mesh
            .segments
            .iter()
            .zip(materials.materials())
            .map(|(segment, material)| {
                let material_buffer = gpu.uniform_buffer(
                    &format!("{} Material", segment.name),
                    &MaterialUniforms::from(material),
                );
                let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{} Material Bind Group", segment.name)),
                    layout: &material_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: material_buffer.as_entire_binding(),
                    }],
                });
                SegmentBuffers {
                    label: segment.name.clone(),
                    vertex_buffer: gpu.buffer_from(
                        &format!("{} Vertices", segment.name),
                        &segment.vertices,
                        wgpu::BufferUsages::VERTEX,
                    ),
                    index_buffer: gpu.buffer_from(
                        &format!("{} Indices", segment.name),
                        &segment.indices,
                        wgpu::BufferUsages::INDEX,
                    ),
                    index_count: segment.indices.len() as u32,
                    material_buffer,
                    material_bind_group,
                }
            })
            .collect();

        Self { pipeline, segments }
    }

    /// Rewrite each segment's material buffer in place.
    pub fn write_materials(&self, gpu: &GpuContext, materials: &MaterialSet) {
        for (segment, material) in self.segments.iter().zip(materials.materials()) {
            gpu.write_uniform(&segment.material_buffer, &MaterialUniforms::from(material));
        }
        tracing::trace!(segments = self.segments.len(), "garment materials written");
    }

    pub fn segment_labels(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.label.as_str())
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, scene_bind_group: &wgpu::BindGroup) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, scene_bind_group, &[]);
        for segment in &self.segments {
            if segment.index_count == 0 {
                continue;
            }
            pass.set_bind_group(1, &segment.material_bind_group, &[]);
            pass.set_vertex_buffer(0, segment.vertex_buffer.slice(..));
            pass.set_index_buffer(segment.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..segment.index_count, 0, 0..1);
        }
    }
}
