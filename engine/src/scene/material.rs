//! Material Binder
//!
//! Turns the selected garment colour into one standard-surface material per
//! mesh segment. Geometry is never rebuilt here; only the material set is.

use glam::Vec3;

use super::mesh::GarmentMesh;
use crate::studio::color::GarmentColor;
use crate::studio::config::MaterialConfig;

/// PBR-ish surface parameters for one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    /// Linear base colour.
    pub base_color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
    /// Emissive hue (linear) equal to the base colour.
    pub emissive: Vec3,
    pub emissive_intensity: f32,
}

/// Materials for every segment of one mesh, all derived from one colour.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSet {
    color: GarmentColor,
    materials: Vec<SurfaceMaterial>,
}

impl MaterialSet {
    pub fn color(&self) -> GarmentColor {
        self.color
    }

    pub fn materials(&self) -> &[SurfaceMaterial] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// True when every segment carries the same material.
    pub fn is_uniform(&self) -> bool {
        self.materials.windows(2).all(|w| w[0] == w[1])
    }
}

#[derive(Debug, Clone)]
pub struct MaterialBinder {
    config: MaterialConfig,
}

impl MaterialBinder {
    pub fn new(config: MaterialConfig) -> Self {
        Self { config }
    }

    pub fn surface(&self, color: GarmentColor) -> SurfaceMaterial {
        let linear = color.to_linear();
        SurfaceMaterial {
            base_color: linear,
            roughness: self.config.roughness,
            metalness: self.config.metalness,
            emissive: linear,
            emissive_intensity: self.config.emissive_intensity,
        }
    }

    /// Build the material set for `mesh`; one identical material per segment.
    pub fn bind(&self, color: GarmentColor, mesh: &GarmentMesh) -> MaterialSet {
        let surface = self.surface(color);
        MaterialSet {
            color,
            materials: vec![surface; mesh.segment_count()],
        }
    }
}
