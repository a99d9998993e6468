use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::TerravoxError;

/// Per-frame renderer settings. Immutable while a frame is being rendered and
/// shared read-only across worker threads.
///
/// Preconditions (checked by [`Settings::validate`], not by the hot path):
/// `voxel_size > 0`, `steps > 0`, `eps > 0`, `max_dist > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Terrain ceiling. The field is smoothly clamped below this height.
    pub max_height: f32,
    /// Upper bound the water level may be raised to.
    pub max_water_height: f32,
    /// Current height of the still water plane.
    pub water_height: f32,
    /// Density bias subtracted from the normalized noise. Higher = more solid.
    pub surface_factor: f32,
    /// Voxel grid level; `voxel_size = 2^-voxel_level`.
    pub voxel_level: i32,
    /// Edge length of one voxel in world units.
    pub voxel_size: f32,
    /// Iteration budget of one traced ray.
    pub steps: u32,
    /// Maximum primary ray distance.
    pub max_dist: f32,
    /// Smallest step the marcher will take.
    pub min_dist: f32,
    /// Forward bias applied after each voxel face crossing.
    pub eps: f32,
    /// Directional light color (RGB).
    pub light_color: (f32, f32, f32),
    /// Directional light intensity multiplier applied to `light_color`.
    pub light_intensity: f32,
    /// Direction towards the light. Normalized on use.
    pub light_direction: (f32, f32, f32),
    /// Debug: output the face normal of the primary hit as RGB.
    pub show_normals: bool,
    /// Debug: output the tracer iteration count as grayscale.
    pub show_steps: bool,
    /// Debug: output a grayscale slice of the distance field.
    pub visualize_distance_field: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let voxel_level = 3;
        Self {
            max_height: 5.0,
            max_water_height: -2.2,
            water_height: -2.2,
            surface_factor: 0.42,
            voxel_level,
            voxel_size: 2.0f32.powi(-voxel_level),
            steps: 512 * 2 * 2,
            max_dist: 600_000.0,
            min_dist: 0.0001,
            eps: 1e-5,
            light_color: (1.0, 0.9, 0.75),
            light_intensity: 2.0,
            light_direction: (0.507746, 0.716817, 0.477878),
            show_normals: false,
            show_steps: false,
            visualize_distance_field: false,
        }
    }
}

impl Settings {
    /// Parse settings from a RON string and validate them.
    /// Fields missing from the source keep their default values, except
    /// `voxel_size`, which is derived from `voxel_level` when omitted.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, TerravoxError> {
        let options = ron::Options::default();
        let parse_error = |e: ron::error::SpannedError| TerravoxError::SettingsParse(e.to_string());
        let mut settings: Settings = options.from_str(ron_str).map_err(parse_error)?;

        let explicit: ExplicitFields = options
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
            .from_str(ron_str)
            .map_err(parse_error)?;
        if explicit.voxel_size.is_none() {
            settings.update_voxel_size();
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a RON file on disk.
    pub fn load(path: &std::path::Path) -> Result<Self, TerravoxError> {
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_ron_str(&contents)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty RON (used to dump the effective settings).
    pub fn to_ron_string(&self) -> Result<String, TerravoxError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| TerravoxError::SettingsParse(e.to_string()))
    }

    /// Recompute `voxel_size` from `voxel_level`.
    pub fn update_voxel_size(&mut self) {
        self.voxel_size = 2.0f32.powi(-self.voxel_level);
    }

    /// Check the preconditions the tracing core relies on.
    pub fn validate(&self) -> Result<(), TerravoxError> {
        let mut problems = Vec::new();

        if !(self.voxel_size > 0.0 && self.voxel_size.is_finite()) {
            problems.push(format!("voxel_size must be positive, got {}", self.voxel_size));
        }
        if self.steps == 0 {
            problems.push("steps must be greater than zero".to_string());
        }
        let level_size = 2.0f32.powi(-self.voxel_level);
        if self.voxel_size > 0.0 && (self.voxel_size - level_size).abs() > level_size * 1e-4 {
            problems.push(format!(
                "voxel_size {} does not match voxel_level {} (expected {})",
                self.voxel_size, self.voxel_level, level_size
            ));
        }
        if !(self.eps > 0.0) {
            problems.push(format!("eps must be positive, got {}", self.eps));
        }
        if !(self.max_dist > 0.0 && self.max_dist.is_finite()) {
            problems.push(format!("max_dist must be positive and finite, got {}", self.max_dist));
        }
        if self.min_dist < 0.0 {
            problems.push(format!("min_dist must not be negative, got {}", self.min_dist));
        }
        if self.water_height > self.max_water_height {
            problems.push(format!(
                "water_height {} exceeds max_water_height {}",
                self.water_height, self.max_water_height
            ));
        }
        if Vec3::from(self.light_direction).length_squared() == 0.0 {
            problems.push("light_direction must not be zero".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(TerravoxError::InvalidSettings(problems.join("; ")))
        }
    }

    /// Normalized direction towards the light.
    pub fn light_dir(&self) -> Vec3 {
        Vec3::from(self.light_direction).normalize()
    }

    /// Light color premultiplied by its intensity.
    pub fn light_rgb(&self) -> Vec3 {
        Vec3::from(self.light_color) * self.light_intensity
    }

    /// Distance below which the marcher locks onto the voxel grid
    /// (one voxel diagonal).
    pub fn voxel_lock_distance(&self) -> f32 {
        self.voxel_size * 3.0f32.sqrt()
    }

    /// Pack into the uniform-buffer layout a GPU host binds.
    pub fn to_gpu(&self) -> GpuSettings {
        let light = self.light_rgb();
        let dir = self.light_dir();
        GpuSettings {
            max_height: self.max_height,
            max_water_height: self.max_water_height,
            water_height: self.water_height,
            surface_factor: self.surface_factor,
            voxel_level: self.voxel_level,
            voxel_size: self.voxel_size,
            steps: self.steps as i32,
            max_dist: self.max_dist,
            min_dist: self.min_dist,
            eps: self.eps,
            _pad0: [0; 2],
            light_color: [light.x, light.y, light.z, 0.0],
            light_direction: [dir.x, dir.y, dir.z, 0.0],
            show_normals: self.show_normals as i32,
            show_steps: self.show_steps as i32,
            visualize_distance_field: self.visualize_distance_field as i32,
            _pad1: 0,
        }
    }
}

/// Fields whose presence in a settings file changes how the rest is read.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ExplicitFields {
    voxel_size: Option<f32>,
}

/// Uniform-buffer mirror of [`Settings`] (96 bytes, 16-byte aligned vec4s).
/// Booleans are stored as i32 for uniform compatibility.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuSettings {
    pub max_height: f32,
    pub max_water_height: f32,
    pub water_height: f32,
    pub surface_factor: f32,
    pub voxel_level: i32,
    pub voxel_size: f32,
    pub steps: i32,
    pub max_dist: f32,
    pub min_dist: f32,
    pub eps: f32,
    pub _pad0: [u32; 2],
    pub light_color: [f32; 4],
    pub light_direction: [f32; 4],
    pub show_normals: i32,
    pub show_steps: i32,
    pub visualize_distance_field: i32,
    pub _pad1: u32,
}
