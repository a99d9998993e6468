use glam::Vec3;
use serde::{Deserialize, Serialize};
use terravox_core::math::{luma, mix3};

/// Global color grade applied to the linear scene before tone mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorCorrection {
    /// Added to every channel.
    pub brightness: f32,
    /// Scales the distance from mid gray (0.5).
    pub contrast: f32,
    /// 0 = grayscale, 1 = unchanged, above 1 oversaturates.
    pub saturation: f32,
}

impl Default for ColorCorrection {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

impl ColorCorrection {
    pub fn apply(&self, c: Vec3) -> Vec3 {
        let c = c + Vec3::splat(self.brightness);
        let c = (c - Vec3::splat(0.5)) * self.contrast + Vec3::splat(0.5);
        mix3(Vec3::splat(luma(c)), c, self.saturation)
    }
}

/// Narkowicz's ACES filmic fit, clamped to [0, 1].
pub fn aces(x: Vec3) -> Vec3 {
    const A: f32 = 2.51;
    const B: f32 = 0.03;
    const C: f32 = 2.43;
    const D: f32 = 0.59;
    const E: f32 = 0.14;
    ((x * (A * x + B)) / (x * (C * x + D) + E)).clamp(Vec3::ZERO, Vec3::ONE)
}

/// sRGB transfer function for one linear channel in [0, 1].
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Encode a linear color as 8-bit sRGB with opaque alpha.
pub fn encode_rgba8(c: Vec3) -> [u8; 4] {
    let q = |v: f32| (linear_to_srgb(v.clamp(0.0, 1.0)) * 255.0 + 0.5) as u8;
    [q(c.x), q(c.y), q(c.z), 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_correction() {
        let c = Vec3::new(0.1, 0.6, 2.0);
        let out = ColorCorrection::default().apply(c);
        assert!((out - c).length() < 1e-6);
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        let grade = ColorCorrection {
            saturation: 0.0,
            ..Default::default()
        };
        let out = grade.apply(Vec3::new(1.0, 0.0, 0.0));
        assert!((out.x - out.y).abs() < 1e-6 && (out.y - out.z).abs() < 1e-6);
        assert!((out.x - 0.2126).abs() < 1e-5);
    }

    #[test]
    fn test_aces_range_and_monotonic() {
        assert_eq!(aces(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(aces(Vec3::splat(100.0)), Vec3::ONE);
        let mut last = 0.0;
        for i in 1..50 {
            let v = aces(Vec3::splat(i as f32 * 0.1)).x;
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_srgb_endpoints() {
        assert_eq!(linear_to_srgb(0.0), 0.0);
        assert!((linear_to_srgb(1.0) - 1.0).abs() < 1e-6);
        // Mid gray encodes to roughly 188/255
        assert!((linear_to_srgb(0.5) - 0.7354).abs() < 1e-3);
    }

    #[test]
    fn test_encode_rgba8() {
        assert_eq!(encode_rgba8(Vec3::ZERO), [0, 0, 0, 255]);
        assert_eq!(encode_rgba8(Vec3::new(1.0, 5.0, -1.0)), [255, 255, 0, 255]);
    }
}
