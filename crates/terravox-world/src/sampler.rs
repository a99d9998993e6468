//! Read-only sampling capabilities consumed by the field, shading and water code.
//!
//! Every source is repeat-wrapped and filtered, and must be safe to sample from
//! many worker threads at once. The renderer never reaches for global texture
//! state: whatever implements these traits is passed in explicitly, which is
//! also how tests substitute constant sources.

use std::path::Path;

use glam::{Vec2, Vec3, Vec4};

use crate::texture::{GrayVolume, MipTexture};

/// Side length of the procedural density volume (matches the 32³ noise cube).
pub const VOLUME_SIZE: usize = 32;

/// Side length of the procedural RGB noise texture.
pub const NOISE_TEXTURE_SIZE: usize = 256;

/// Side length of the procedural surface detail textures.
pub const DETAIL_TEXTURE_SIZE: usize = 256;

/// Scalar 3-D noise with trilinear filtering and repeat addressing.
pub trait NoiseVolume: Send + Sync {
    /// Sample at texture-space coordinates (1.0 = one period). Returns [0, 1].
    fn sample(&self, uvw: Vec3) -> f32;
}

/// 2-D RGBA texture with bilinear filtering, repeat addressing and mips.
pub trait Texture2d: Send + Sync {
    /// Sample the full-resolution level.
    fn sample(&self, uv: Vec2) -> Vec4 {
        self.sample_level(uv, 0.0)
    }

    /// Sample at an explicit level of detail (0 = full resolution).
    fn sample_level(&self, uv: Vec2, lod: f32) -> Vec4;
}

/// The full set of texture inputs the renderer samples.
pub struct WorldTextures {
    /// RGB white noise: biome masks and water ripples.
    pub noise: Box<dyn Texture2d>,
    /// Gray noise volume: terrain density.
    pub volume: Box<dyn NoiseVolume>,
    /// Rock detail layer.
    pub grain: Box<dyn Texture2d>,
    /// Soil detail layer.
    pub dirt: Box<dyn Texture2d>,
}

impl WorldTextures {
    /// Fully procedural texture set. Identical seeds give identical worlds.
    pub fn procedural(seed: u32) -> Self {
        Self {
            noise: Box::new(MipTexture::procedural_noise(NOISE_TEXTURE_SIZE, seed)),
            volume: Box::new(GrayVolume::procedural(VOLUME_SIZE, seed)),
            grain: Box::new(MipTexture::procedural_detail(
                DETAIL_TEXTURE_SIZE,
                seed.wrapping_add(1),
                Vec3::new(0.62, 0.6, 0.58),
            )),
            dirt: Box::new(MipTexture::procedural_detail(
                DETAIL_TEXTURE_SIZE,
                seed.wrapping_add(2),
                Vec3::new(0.55, 0.45, 0.33),
            )),
        }
    }

    /// Load the texture files found in `dir`, falling back to procedural
    /// sources for any that are missing or unreadable.
    ///
    /// Expected files: `rgbnoise.png`, `graynoise_32x32x32_cube.bin`,
    /// `stone.png`, `mud.png`.
    pub fn load_or_procedural(dir: &Path, seed: u32) -> Self {
        let fallback = Self::procedural(seed);

        let noise: Box<dyn Texture2d> = match MipTexture::load(&dir.join("rgbnoise.png")) {
            Ok(tex) => Box::new(tex),
            Err(e) => {
                log::warn!("{e}; using procedural noise texture");
                fallback.noise
            }
        };
        let volume: Box<dyn NoiseVolume> =
            match GrayVolume::load(&dir.join("graynoise_32x32x32_cube.bin"), VOLUME_SIZE) {
                Ok(vol) => Box::new(vol),
                Err(e) => {
                    log::warn!("{e}; using procedural noise volume");
                    fallback.volume
                }
            };
        let grain: Box<dyn Texture2d> = match MipTexture::load(&dir.join("stone.png")) {
            Ok(tex) => Box::new(tex),
            Err(e) => {
                log::warn!("{e}; using procedural rock texture");
                fallback.grain
            }
        };
        let dirt: Box<dyn Texture2d> = match MipTexture::load(&dir.join("mud.png")) {
            Ok(tex) => Box::new(tex),
            Err(e) => {
                log::warn!("{e}; using procedural soil texture");
                fallback.dirt
            }
        };

        Self {
            noise,
            volume,
            grain,
            dirt,
        }
    }
}

/// Constant-valued sources for tests.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;

    /// Noise volume returning the same density everywhere.
    pub struct ConstantVolume(pub f32);

    impl NoiseVolume for ConstantVolume {
        fn sample(&self, _uvw: Vec3) -> f32 {
            self.0
        }
    }

    /// Texture returning the same texel everywhere.
    pub struct ConstantTexture(pub Vec4);

    impl Texture2d for ConstantTexture {
        fn sample_level(&self, _uv: Vec2, _lod: f32) -> Vec4 {
            self.0
        }
    }

    /// Texture set with a constant density and flat mid-gray textures.
    pub fn constant_textures(density: f32) -> WorldTextures {
        WorldTextures {
            noise: Box::new(ConstantTexture(Vec4::splat(0.5))),
            volume: Box::new(ConstantVolume(density)),
            grain: Box::new(ConstantTexture(Vec4::splat(0.5))),
            dirt: Box::new(ConstantTexture(Vec4::splat(0.5))),
        }
    }
}
