//! Preview Renderer
//!
//! Owns the GPU context and every pass. Each frame draws the garment then its
//! decals into the offscreen target and blits the result to the window.

use image::RgbaImage;

use super::decal_pass::DecalPass;
use super::frame_target::{BlitPass, FrameTarget};
use super::garment_pass::GarmentPass;
use super::gpu_context::GpuContext;
use super::uniforms::SceneUniforms;
use crate::scene::{Scene, SceneChanges};
use crate::studio::error::{StudioError, StudioResult};
use crate::studio::session::StudioSession;
use crate::studio::snapshot::FrameSource;

/// Neutral studio backdrop (linear).
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.93,
    g: 0.93,
    b: 0.95,
    a: 1.0,
};

/// Outcome of a [`PreviewRenderer::render`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Presented,
    /// Surface was lost or outdated and has been reconfigured.
    Reconfigured,
    /// Frame skipped (timeout or occluded window).
    Skipped,
}

pub struct PreviewRenderer {
    gpu: GpuContext,
    frame: FrameTarget,
    blit: BlitPass,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    garment: GarmentPass,
    decals: DecalPass,
    frames_rendered: u64,
}

impl PreviewRenderer {
    pub fn new(gpu: GpuContext, scene: &Scene) -> Self {
        let (width, height) = gpu.dimensions();
        let frame = FrameTarget::new(&gpu.device, width, height);
        let blit = BlitPass::new(&gpu.device, gpu.format(), &frame);

        let scene_layout = gpu.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let scene_buffer = gpu.uniform_buffer("Scene Uniforms", &SceneUniforms::default());
        let scene_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let garment = GarmentPass::new(&gpu, &scene_layout, scene.mesh(), scene.materials());
        let decals = DecalPass::new(&gpu, &scene_layout);
        tracing::info!(
            width,
            height,
            format = ?gpu.format(),
            segments = garment.segment_labels().count(),
            "preview renderer ready"
        );

        Self {
            gpu,
            frame,
            blit,
            scene_buffer,
            scene_bind_group,
            garment,
            decals,
            frames_rendered: 0,
        }
    }

    /// Push whatever the last [`Scene::sync`] rebuilt to the GPU.
    pub fn apply(&mut self, changes: SceneChanges, scene: &Scene, session: &StudioSession) {
        if changes.materials {
            self.garment.write_materials(&self.gpu, scene.materials());
        }
        if changes.decals {
            self.decals.sync(&self.gpu, scene, session);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.gpu.resize(width, height);
        self.frame = FrameTarget::new(&self.gpu.device, width, height);
        self.blit.rebind(&self.gpu.device, &self.frame);
        self.frames_rendered = 0;
        tracing::debug!(width, height, "preview resized");
    }

    pub fn aspect(&self) -> f32 {
        self.gpu.aspect()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn render(&mut self, scene: &mut Scene) -> FrameStatus {
        let view = scene.frame(self.gpu.aspect());
        self.gpu
            .write_uniform(&self.scene_buffer, &SceneUniforms::new(&view, scene.lights()));

        let surface_texture = match self.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                return FrameStatus::Reconfigured;
            }
            Err(e) => {
                tracing::warn!(error = ?e, "skipping frame");
                return FrameStatus::Skipped;
            }
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Preview Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Garment Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.frame.color_view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.frame.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.garment.draw(&mut pass, &self.scene_bind_group);
            self.decals.draw(&mut pass, &self.scene_bind_group);
        }

        self.blit.draw(&mut encoder, &surface_view);
        self.gpu.queue.submit(Some(encoder.finish()));
        surface_texture.present();
        self.frames_rendered += 1;
        FrameStatus::Presented
    }
}

impl FrameSource for PreviewRenderer {
    fn capture(&mut self) -> StudioResult<RgbaImage> {
        if self.frames_rendered == 0 {
            return Err(StudioError::NoFrame);
        }
        #[cfg(target_arch = "wasm32")]
        {
            Err(StudioError::CaptureUnsupported)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let (width, height) = self.frame.dimensions();
            super::capture::read_texture(&self.gpu.device, &self.gpu.queue, &self.frame.color, width, height)
        }
    }
}
