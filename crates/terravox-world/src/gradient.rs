use glam::Vec3;
use terravox_core::constants::{AO_EDGE_HIGH, AO_EDGE_LOW, GRADIENT_STEP};
use terravox_core::math::smoothstep;

use crate::field::ScalarField;

/// Finite-difference derivatives of a [`ScalarField`].
#[derive(Clone, Copy)]
pub struct GradientEstimator<'a> {
    field: ScalarField<'a>,
}

impl<'a> GradientEstimator<'a> {
    pub fn new(field: ScalarField<'a>) -> Self {
        Self { field }
    }

    pub fn field(&self) -> ScalarField<'a> {
        self.field
    }

    /// Backward-difference gradient with a fixed step of [`GRADIENT_STEP`].
    pub fn grad(&self, p: Vec3) -> Vec3 {
        let d = self.field.map(p);
        let h = GRADIENT_STEP;
        Vec3::new(
            d - self.field.map(p - Vec3::X * h),
            d - self.field.map(p - Vec3::Y * h),
            d - self.field.map(p - Vec3::Z * h),
        ) / h
    }

    /// Unit surface normal. NaN when the gradient vanishes (flat noise).
    pub fn normal(&self, p: Vec3) -> Vec3 {
        let g = self.grad(p);
        g / g.length()
    }

    /// Unit surface normal, or `fallback` where the gradient vanishes.
    pub fn normal_or(&self, p: Vec3, fallback: Vec3) -> Vec3 {
        self.grad(p).try_normalize().unwrap_or(fallback)
    }

    /// Cheap ambient occlusion: the first-order distance to the surface
    /// (`map / |grad|`) pushed through a narrow smoothstep. Returns [0, 1],
    /// 1 meaning unoccluded.
    pub fn ao_factor(&self, p: Vec3) -> f32 {
        let d = self.field.map(p) / self.grad(p).length();
        smoothstep(AO_EDGE_LOW, AO_EDGE_HIGH, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::mock::ConstantVolume;
    use crate::texture::GrayVolume;
    use terravox_core::Settings;

    fn ceiling_settings() -> Settings {
        Settings {
            max_height: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_flat_ceiling_normal_points_up() {
        let settings = ceiling_settings();
        let volume = ConstantVolume(0.0);
        let grad = GradientEstimator::new(ScalarField::new(&settings, &volume));
        // Well inside the ceiling's linear region the field is exactly y - h
        let n = grad.normal(Vec3::new(4.0, 12.0, -3.0));
        assert!((n - Vec3::Y).length() < 1e-4, "{n:?}");
    }

    #[test]
    fn test_zero_gradient_yields_nan_or_fallback() {
        let settings = Settings::default();
        let volume = ConstantVolume(0.0);
        let grad = GradientEstimator::new(ScalarField::new(&settings, &volume));
        // Deep below the ceiling the field is constant
        let p = Vec3::new(0.0, -50.0, 0.0);
        assert_eq!(grad.grad(p), Vec3::ZERO);
        assert!(grad.normal(p).is_nan());
        assert_eq!(grad.normal_or(p, Vec3::Y), Vec3::Y);
    }

    #[test]
    fn test_ao_open_air_is_unoccluded() {
        let settings = ceiling_settings();
        let volume = ConstantVolume(0.0);
        let grad = GradientEstimator::new(ScalarField::new(&settings, &volume));
        assert_eq!(grad.ao_factor(Vec3::new(0.0, 11.0, 0.0)), 1.0);
        assert_eq!(grad.ao_factor(Vec3::new(0.0, 9.0, 0.0)), 0.0);
    }

    #[test]
    fn test_normals_are_unit_on_noise() {
        let settings = Settings::default();
        let volume = GrayVolume::procedural(16, 8);
        let grad = GradientEstimator::new(ScalarField::new(&settings, &volume));
        for i in 0..50 {
            let p = Vec3::new(i as f32 * 3.1, -1.0 + (i % 5) as f32, i as f32 * 1.3);
            let n = grad.normal_or(p, Vec3::Y);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }
}
