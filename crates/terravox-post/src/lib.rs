//! Display resolve of rendered frames: color grading, bloom, ACES tone
//! mapping and sRGB encoding.

pub mod bloom;
pub mod tonemap;

use serde::{Deserialize, Serialize};
use terravox_core::{FrameBuffer, TerravoxError};

pub use bloom::{Bloom, BloomSettings};
pub use tonemap::{aces, linear_to_srgb, ColorCorrection};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostSettings {
    pub bloom: BloomSettings,
    pub color: ColorCorrection,
}

impl PostSettings {
    pub fn from_ron_str(ron_str: &str) -> Result<Self, TerravoxError> {
        ron::Options::default()
            .from_str(ron_str)
            .map_err(|e| TerravoxError::SettingsParse(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostProcess {
    settings: PostSettings,
}

impl PostProcess {
    pub fn new(settings: PostSettings) -> Self {
        Self { settings }
    }

    /// Linear HDR frame to display-ready RGBA8, row-major.
    pub fn resolve(&self, scene: &FrameBuffer) -> Vec<[u8; 4]> {
        let graded = scene.map(|c| self.settings.color.apply(c));

        let bloom = if self.settings.bloom.enabled {
            Some(Bloom::new(self.settings.bloom).apply(&graded))
        } else {
            None
        };

        graded
            .pixels()
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let glow = bloom.as_ref().map_or(glam::Vec3::ZERO, |b| b.pixels()[i]);
                tonemap::encode_rgba8(aces(c) + glow)
            })
            .collect()
    }
}
