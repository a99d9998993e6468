use glam::Vec3;
use terravox_core::constants::{
    FIELD_SCALE, HEIGHT_CEILING_BLEND, HORIZONTAL_COMPRESSION, OCTAVE_OFFSET_1, OCTAVE_OFFSET_2,
    OCTAVE_WEIGHTS, OCTAVE_WEIGHT_SUM,
};
use terravox_core::math::smax;
use terravox_core::Settings;

use crate::sampler::NoiseVolume;

/// The implicit terrain: a signed, roughly distance-like scalar function.
/// Negative inside solid terrain, positive in empty space. Solid terrain is
/// where the fractal noise falls below `surface_factor`.
///
/// Borrowed views only; copying a `ScalarField` is free.
#[derive(Clone, Copy)]
pub struct ScalarField<'a> {
    settings: &'a Settings,
    volume: &'a dyn NoiseVolume,
}

impl<'a> ScalarField<'a> {
    pub fn new(settings: &'a Settings, volume: &'a dyn NoiseVolume) -> Self {
        Self { settings, volume }
    }

    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    /// Evaluate the field at `p`.
    ///
    /// Three octaves of the density volume are summed at a horizontally
    /// stretched frequency, biased by `surface_factor`, rescaled towards a
    /// world-space distance and finally smoothly capped at `max_height`.
    pub fn map(&self, p: Vec3) -> f32 {
        let q = Vec3::new(
            p.x * HORIZONTAL_COMPRESSION,
            p.y,
            p.z * HORIZONTAL_COMPRESSION,
        ) * FIELD_SCALE;

        let n = (OCTAVE_WEIGHTS[0] * self.volume.sample(q)
            + OCTAVE_WEIGHTS[1] * self.volume.sample(q * 2.0 + Vec3::from(OCTAVE_OFFSET_1))
            + OCTAVE_WEIGHTS[2] * self.volume.sample(q * 4.0 + Vec3::from(OCTAVE_OFFSET_2)))
            / OCTAVE_WEIGHT_SUM;

        let raw = (n - self.settings.surface_factor) / (HORIZONTAL_COMPRESSION * FIELD_SCALE);
        smax(raw, p.y - self.settings.max_height, HEIGHT_CEILING_BLEND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::mock::ConstantVolume;
    use crate::texture::GrayVolume;

    #[test]
    fn test_constant_solid_noise_is_height_ceiling() {
        // Noise well below the surface factor: raw is very negative, so the
        // ceiling term alone decides the sign.
        let settings = Settings {
            max_height: 50.0,
            ..Default::default()
        };
        let volume = ConstantVolume(0.0);
        let field = ScalarField::new(&settings, &volume);

        assert!(field.map(Vec3::new(0.0, 49.0, 0.0)) < 0.0);
        assert!(field.map(Vec3::new(3.0, 51.0, -7.0)) > 0.0);
        let d = field.map(Vec3::new(0.0, 60.0, 0.0));
        assert!((d - 10.0).abs() < 1e-4, "got {d}");
    }

    #[test]
    fn test_empty_noise_is_positive_everywhere() {
        let settings = Settings::default();
        let volume = ConstantVolume(1.0);
        let field = ScalarField::new(&settings, &volume);
        for y in [-100.0, -2.0, 0.0, 4.0, 100.0] {
            assert!(field.map(Vec3::new(1.0, y, 2.0)) > 0.0);
        }
    }

    #[test]
    fn test_field_never_below_ceiling_distance() {
        let settings = Settings::default();
        let volume = GrayVolume::procedural(16, 3);
        let field = ScalarField::new(&settings, &volume);
        for i in 0..200 {
            let p = Vec3::new(i as f32 * 1.7, -20.0 + i as f32 * 0.3, i as f32 * -2.3);
            let d = field.map(p);
            assert!(d.is_finite());
            // smax never falls below either operand
            assert!(d >= p.y - settings.max_height - 1e-4);
        }
    }

    #[test]
    fn test_field_is_deterministic() {
        let settings = Settings::default();
        let volume = GrayVolume::procedural(16, 5);
        let field = ScalarField::new(&settings, &volume);
        let p = Vec3::new(12.3, 1.5, -40.2);
        assert_eq!(field.map(p), field.map(p));
    }

    #[test]
    fn test_far_away_points_stay_finite() {
        let settings = Settings::default();
        let volume = GrayVolume::procedural(32, 1);
        let field = ScalarField::new(&settings, &volume);
        for p in [
            Vec3::new(1e11, 0.0, 0.0),
            Vec3::new(-1e11, 2.0, 1e11),
            Vec3::new(0.0, -1e11, 0.0),
        ] {
            assert!(field.map(p).is_finite(), "map({p:?}) is not finite");
        }
    }
}
