use glam::Vec2;
use terravox_core::constants::{BIOME_SCALE, DESERT_EDGE, DESERT_UV_OFFSET, SNOW_EDGE};
use terravox_core::math::smoothstep;
use terravox_core::BiomeWeights;

use crate::sampler::Texture2d;

/// Maps a horizontal world position to desert/snow blend weights by
/// thresholding two channels of the noise texture.
#[derive(Clone, Copy)]
pub struct BiomeClassifier<'a> {
    noise: &'a dyn Texture2d,
}

impl<'a> BiomeClassifier<'a> {
    pub fn new(noise: &'a dyn Texture2d) -> Self {
        Self { noise }
    }

    /// Biome weights at world `xz`. The desert mask reads the green channel
    /// at a rotated, offset coordinate so the two masks stay uncorrelated.
    pub fn biome(&self, xz: Vec2) -> BiomeWeights {
        let uv = xz * BIOME_SCALE;

        let snow = smoothstep(SNOW_EDGE.0, SNOW_EDGE.1, self.noise.sample(uv).x);

        let mirrored = Vec2::new(-uv.y, uv.x) + Vec2::from(DESERT_UV_OFFSET);
        let desert = smoothstep(DESERT_EDGE.0, DESERT_EDGE.1, self.noise.sample(mirrored).y);

        BiomeWeights { desert, snow }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::mock::ConstantTexture;
    use crate::texture::MipTexture;
    use glam::Vec4;

    #[test]
    fn test_thresholds() {
        let cold = ConstantTexture(Vec4::new(0.71, 0.0, 0.0, 1.0));
        let w = BiomeClassifier::new(&cold).biome(Vec2::new(10.0, 20.0));
        assert_eq!(w, BiomeWeights { desert: 0.0, snow: 1.0 });

        let dry = ConstantTexture(Vec4::new(0.0, 0.68, 0.0, 1.0));
        let w = BiomeClassifier::new(&dry).biome(Vec2::new(10.0, 20.0));
        assert_eq!(w, BiomeWeights { desert: 1.0, snow: 0.0 });

        let temperate = ConstantTexture(Vec4::splat(0.5));
        let w = BiomeClassifier::new(&temperate).biome(Vec2::ZERO);
        assert_eq!(w, BiomeWeights::default());
    }

    #[test]
    fn test_weights_both_active() {
        let tex = ConstantTexture(Vec4::new(0.9, 0.9, 0.0, 1.0));
        let w = BiomeClassifier::new(&tex).biome(Vec2::new(-3.0, 7.0));
        assert_eq!(w.as_vec2(), Vec2::ONE);
    }

    #[test]
    fn test_weights_in_unit_range() {
        let noise = MipTexture::procedural_noise(64, 12);
        let classifier = BiomeClassifier::new(&noise);
        let mut any_snow = false;
        for x in 0..64 {
            for z in 0..64 {
                let w = classifier.biome(Vec2::new(x as f32 * 16.0, z as f32 * 16.0));
                assert!((0.0..=1.0).contains(&w.desert));
                assert!((0.0..=1.0).contains(&w.snow));
                any_snow |= w.snow > 0.5;
            }
        }
        assert!(any_snow, "white noise should exceed the snow threshold somewhere");
    }
}
