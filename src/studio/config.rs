//! Studio Configuration
//!
//! Single source of truth for every tunable of the preview: upload limits,
//! the material recipe, decal sizes, camera bounds, idle motion, the light
//! rig and the placeholder generation delay. `Default` matches the shipped
//! look; a JSON file can override any subset of fields.

use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::color::GarmentColor;
use super::error::{StudioError, StudioResult};

/// One mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// wgpu's default `max_texture_dimension_2d`.
pub const DEFAULT_MAX_TEXTURE_DIMENSION: u32 = 8192;

/// Top-level configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub intake: IntakeConfig,
    pub color: ColorConfig,
    pub material: MaterialConfig,
    pub decals: DecalConfig,
    pub camera: CameraConfig,
    pub idle: IdleConfig,
    pub lights: LightConfig,
    pub generation: GenerationConfig,
    pub notices: NoticeConfig,
    pub export: ExportConfig,
    pub window: WindowConfig,
    /// Externally authored garment mesh (JSON). `None` uses the built-in tee.
    pub mesh_path: Option<PathBuf>,
}

/// Upload validation limits.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Largest accepted file, in bytes (inclusive).
    pub max_bytes: u64,
    /// Largest decoded width or height, in pixels (inclusive). Lowered to the
    /// device's 2D texture limit once the GPU is up.
    pub max_texture_dimension: u32,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10 * MIB,
            max_texture_dimension: DEFAULT_MAX_TEXTURE_DIMENSION,
        }
    }
}

impl IntakeConfig {
    /// Ceiling in whole megabytes, for user-facing messages.
    pub fn max_megabytes(&self) -> u64 {
        self.max_bytes.div_ceil(MIB)
    }

    /// Clamp the pixel ceiling to what the device can sample from.
    pub fn clamp_texture_dimension(&mut self, device_limit: u32) {
        self.max_texture_dimension = self.max_texture_dimension.min(device_limit);
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Colour selected when the studio opens.
    pub default_color: GarmentColor,
}

/// Appearance recipe applied to every garment segment.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub roughness: f32,
    pub metalness: f32,
    /// Strength of the same-hue emissive term.
    pub emissive_intensity: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            roughness: 0.7,
            metalness: 0.0,
            emissive_intensity: 0.15,
        }
    }
}

/// Width/height of each decal size class, in mesh units.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DecalConfig {
    pub small: [f32; 2],
    pub medium: [f32; 2],
    pub large: [f32; 2],
    /// Front anchor; the back anchor mirrors it through the garment plane.
    pub front_anchor: Vec3,
}

impl Default for DecalConfig {
    fn default() -> Self {
        Self {
            small: [1.2, 1.2],
            medium: [2.0, 2.0],
            // Tallest that still clears the collar band above the anchor.
            large: [2.2, 2.2],
            front_anchor: Vec3::new(0.0, 0.5, 0.11),
        }
    }
}

/// Orbit camera limits.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle measured from +Y, radians.
    pub min_polar: f32,
    pub max_polar: f32,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    pub zoom_enabled: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            distance: 6.0,
            min_distance: 2.5,
            max_distance: 12.0,
            min_polar: PI / 3.0,
            max_polar: PI / 1.7,
            rotate_speed: 0.005,
            zoom_enabled: true,
        }
    }
}

/// Idle sway of the garment group.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Angular frequency of the sway (rad/s).
    pub speed: f32,
    /// Peak yaw (radians).
    pub amplitude: f32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            speed: 0.2,
            amplitude: 0.15,
        }
    }
}

/// Fixed light rig.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub ambient: f32,
    pub spot_position: Vec3,
    pub spot_intensity: f32,
    /// Half-angle of the spot cone (radians).
    pub spot_angle: f32,
    /// Fraction of the cone that fades out at the rim.
    pub spot_penumbra: f32,
    pub point_position: Vec3,
    pub point_intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            spot_position: Vec3::new(10.0, 10.0, 10.0),
            spot_intensity: 1.0,
            spot_angle: 0.15,
            spot_penumbra: 1.0,
            point_position: Vec3::new(-10.0, -10.0, -10.0),
            point_intensity: 0.5,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seconds before the placeholder service answers.
    pub delay_secs: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { delay_secs: 1.5 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// Seconds a notice stays on screen.
    pub lifetime_secs: f32,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self { lifetime_secs: 4.0 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory snapshots are written to on native builds.
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tee Studio".to_string(),
            width: 1280,
            height: 800,
            vsync: true,
        }
    }
}

impl StudioConfig {
    /// Load a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> StudioResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), "loaded studio config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> StudioResult<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| StudioError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the preview cannot honour.
    pub fn validate(&self) -> StudioResult<()> {
        if self.intake.max_bytes == 0 {
            return Err(StudioError::config("intake.max_bytes must be positive"));
        }
        if self.intake.max_texture_dimension == 0 {
            return Err(StudioError::config("intake.max_texture_dimension must be positive"));
        }
        let cam = &self.camera;
        if !(0.0..=PI).contains(&cam.min_polar)
            || !(0.0..=PI).contains(&cam.max_polar)
            || cam.min_polar > cam.max_polar
        {
            return Err(StudioError::config(
                "camera polar bounds must satisfy 0 <= min_polar <= max_polar <= PI",
            ));
        }
        if cam.min_distance <= 0.0 || cam.min_distance > cam.max_distance {
            return Err(StudioError::config(
                "camera distance bounds must satisfy 0 < min_distance <= max_distance",
            ));
        }
        if cam.fov_degrees <= 0.0 || cam.fov_degrees >= 180.0 {
            return Err(StudioError::config("camera.fov_degrees must be in (0, 180)"));
        }
        for (name, [w, h]) in [
            ("small", self.decals.small),
            ("medium", self.decals.medium),
            ("large", self.decals.large),
        ] {
            if w <= 0.0 || h <= 0.0 {
                return Err(StudioError::config(format!(
                    "decals.{name} must have a positive width and height"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.material.roughness) {
            return Err(StudioError::config("material.roughness must be in [0, 1]"));
        }
        if self.generation.delay_secs < 0.0 || self.notices.lifetime_secs <= 0.0 {
            return Err(StudioError::config(
                "generation.delay_secs must be >= 0 and notices.lifetime_secs > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = StudioConfig::default();
        config.validate().unwrap();
        assert_eq!(config.intake.max_bytes, 10 * MIB);
        assert_eq!(config.intake.max_megabytes(), 10);
        assert_eq!(config.color.default_color, GarmentColor::DEFAULT);
        assert!(config.mesh_path.is_none());
    }

    #[test]
    fn texture_ceiling_only_ever_drops_to_the_device_limit() {
        let mut intake = IntakeConfig::default();
        intake.clamp_texture_dimension(2048);
        assert_eq!(intake.max_texture_dimension, 2048);
        intake.clamp_texture_dimension(16384);
        assert_eq!(intake.max_texture_dimension, 2048);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = StudioConfig::from_json(
            r##"{ "intake": { "max_bytes": 2097152 }, "color": { "default_color": "#9b87f5" } }"##,
        )
        .unwrap();
        assert_eq!(config.intake.max_bytes, 2 * MIB);
        assert_eq!(config.intake.max_texture_dimension, DEFAULT_MAX_TEXTURE_DIMENSION);
        assert_eq!(config.color.default_color.to_hex(), "#9b87f5");
        assert_eq!(config.camera.distance, 6.0);
        assert_eq!(config.idle.speed, 0.2);
    }

    #[test]
    fn inverted_polar_bounds_are_rejected() {
        let err = StudioConfig::from_json(
            r#"{ "camera": { "min_polar": 2.0, "max_polar": 1.0 } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("polar"));
    }

    #[test]
    fn bad_colour_is_a_config_error() {
        assert!(
            StudioConfig::from_json(r#"{ "color": { "default_color": "purple" } }"#).is_err()
        );
    }

    #[test]
    fn zero_sized_decal_is_rejected() {
        assert!(StudioConfig::from_json(r#"{ "decals": { "small": [0.0, 1.0] } }"#).is_err());
    }
}
