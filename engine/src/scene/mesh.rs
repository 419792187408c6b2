//! Garment Mesh
//!
//! Immutable garment geometry shared behind `Arc`. A mesh is either the
//! built-in placeholder tee or an externally authored JSON file; either way
//! it is loaded once and handed out from the cache afterwards. Colour changes
//! never touch geometry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::studio::error::{StudioError, StudioResult};

/// Vertex for garment surfaces (position + normal).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GarmentVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// One separately shaded part of the garment (torso, sleeve, collar...).
#[derive(Clone, Debug)]
pub struct MeshSegment {
    pub name: String,
    pub vertices: Vec<GarmentVertex>,
    pub indices: Vec<u32>,
}

impl MeshSegment {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u32;
        for corner in corners {
            self.vertices.push(GarmentVertex {
                position: corner.to_array(),
                normal: normal.to_array(),
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Axis-aligned box centred on `center`, faces wound counter-clockwise
    /// when seen from outside.
    fn box_shape(name: &str, center: Vec3, size: Vec3) -> Self {
        let mut seg = Self::new(name);
        let h = size * 0.5;
        let p = |x: f32, y: f32, z: f32| center + Vec3::new(x * h.x, y * h.y, z * h.z);

        seg.push_quad([p(-1., -1., 1.), p(1., -1., 1.), p(1., 1., 1.), p(-1., 1., 1.)], Vec3::Z);
        seg.push_quad([p(1., -1., -1.), p(-1., -1., -1.), p(-1., 1., -1.), p(1., 1., -1.)], Vec3::NEG_Z);
        seg.push_quad([p(1., -1., 1.), p(1., -1., -1.), p(1., 1., -1.), p(1., 1., 1.)], Vec3::X);
        seg.push_quad([p(-1., -1., -1.), p(-1., -1., 1.), p(-1., 1., 1.), p(-1., 1., -1.)], Vec3::NEG_X);
        seg.push_quad([p(-1., 1., 1.), p(1., 1., 1.), p(1., 1., -1.), p(-1., 1., -1.)], Vec3::Y);
        seg.push_quad([p(-1., -1., -1.), p(1., -1., -1.), p(1., -1., 1.), p(-1., -1., 1.)], Vec3::NEG_Y);
        seg
    }

    /// Open-ended cylinder around the Y axis.
    fn open_cylinder(name: &str, center: Vec3, radius: f32, height: f32, sides: u32) -> Self {
        let mut seg = Self::new(name);
        let half = height * 0.5;
        for i in 0..sides {
            let a0 = i as f32 / sides as f32 * std::f32::consts::TAU;
            let a1 = (i + 1) as f32 / sides as f32 * std::f32::consts::TAU;
            let n0 = Vec3::new(a0.sin(), 0.0, a0.cos());
            let n1 = Vec3::new(a1.sin(), 0.0, a1.cos());
            let base = seg.vertices.len() as u32;
            for (n, y) in [(n0, -half), (n1, -half), (n1, half), (n0, half)] {
                seg.vertices.push(GarmentVertex {
                    position: (center + n * radius + Vec3::Y * y).to_array(),
                    normal: n.to_array(),
                });
            }
            seg.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        seg
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn validate(&self) -> StudioResult<()> {
        if self.vertices.is_empty() || self.indices.is_empty() {
            return Err(StudioError::mesh(format!("segment `{}` is empty", self.name)));
        }
        if self.indices.len() % 3 != 0 {
            return Err(StudioError::mesh(format!(
                "segment `{}` index count {} is not a multiple of 3",
                self.name,
                self.indices.len()
            )));
        }
        let count = self.vertices.len() as u32;
        if let Some(bad) = self.indices.iter().find(|&&i| i >= count) {
            return Err(StudioError::mesh(format!(
                "segment `{}` index {bad} out of range ({count} vertices)",
                self.name
            )));
        }
        Ok(())
    }
}

/// The whole garment: a list of segments sharing one material recipe.
#[derive(Clone, Debug)]
pub struct GarmentMesh {
    pub segments: Vec<MeshSegment>,
}

/// On-disk JSON layout of an authored garment mesh.
#[derive(Debug, Serialize, Deserialize)]
pub struct MeshFile {
    pub segments: Vec<MeshFileSegment>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeshFileSegment {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl GarmentMesh {
    /// Placeholder tee: torso, two sleeves and an open collar.
    pub fn builtin_tee() -> Self {
        Self {
            segments: vec![
                MeshSegment::box_shape("torso", Vec3::ZERO, Vec3::new(3.0, 4.0, 0.2)),
                MeshSegment::box_shape("sleeve_left", Vec3::new(-1.8, 0.7, 0.0), Vec3::new(0.6, 1.0, 0.2)),
                MeshSegment::box_shape("sleeve_right", Vec3::new(1.8, 0.7, 0.0), Vec3::new(0.6, 1.0, 0.2)),
                MeshSegment::open_cylinder("collar", Vec3::new(0.0, 1.8, 0.1), 0.7, 0.3, 32),
            ],
        }
    }

    pub fn from_json(text: &str) -> StudioResult<Self> {
        let file: MeshFile =
            serde_json::from_str(text).map_err(|e| StudioError::mesh(e.to_string()))?;
        Self::from_file(file)
    }

    pub fn from_file(file: MeshFile) -> StudioResult<Self> {
        if file.segments.is_empty() {
            return Err(StudioError::mesh("mesh has no segments"));
        }
        let mut segments = Vec::with_capacity(file.segments.len());
        for seg in file.segments {
            if seg.positions.len() != seg.normals.len() {
                return Err(StudioError::mesh(format!(
                    "segment `{}` has {} positions but {} normals",
                    seg.name,
                    seg.positions.len(),
                    seg.normals.len()
                )));
            }
            let vertices = seg
                .positions
                .iter()
                .zip(&seg.normals)
                .map(|(&position, &normal)| GarmentVertex { position, normal })
                .collect();
            let segment = MeshSegment {
                name: seg.name,
                vertices,
                indices: seg.indices,
            };
            segment.validate()?;
            segments.push(segment);
        }
        Ok(Self { segments })
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Axis-aligned bounds over all segments.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for v in self.segments.iter().flat_map(|s| &s.vertices) {
            let p = Vec3::from_array(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        (min, max)
    }
}

/// Where a garment mesh comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MeshSource {
    Builtin,
    File(PathBuf),
}

impl MeshSource {
    pub fn from_option(path: Option<&Path>) -> Self {
        match path {
            Some(p) => MeshSource::File(p.to_path_buf()),
            None => MeshSource::Builtin,
        }
    }
}

/// Loads each mesh once and shares it afterwards.
#[derive(Debug, Default)]
pub struct MeshCache {
    meshes: HashMap<MeshSource, Arc<GarmentMesh>>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, source: &MeshSource) -> StudioResult<Arc<GarmentMesh>> {
        if let Some(mesh) = self.meshes.get(source) {
            return Ok(Arc::clone(mesh));
        }
        let mesh = match source {
            MeshSource::Builtin => GarmentMesh::builtin_tee(),
            MeshSource::File(path) => {
                let text = std::fs::read_to_string(path)?;
                GarmentMesh::from_json(&text)?
            }
        };
        tracing::info!(?source, segments = mesh.segment_count(), "garment mesh loaded");
        let mesh = Arc::new(mesh);
        self.meshes.insert(source.clone(), Arc::clone(&mesh));
        Ok(mesh)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
