use glam::{Vec2, Vec3, Vec4};
use terravox_core::constants::TEXTURE_SCALE;
use terravox_world::Texture2d;

/// Blend weights of the three axis projections: `|n|^k`, normalized to sum 1.
/// A zero normal falls back to equal thirds.
pub fn triplanar_weights(n: Vec3, k: f32) -> Vec3 {
    let a = n.abs();
    let w = Vec3::new(a.x.powf(k), a.y.powf(k), a.z.powf(k));
    let sum = w.x + w.y + w.z;
    if sum > 0.0 && sum.is_finite() {
        w / sum
    } else {
        Vec3::splat(1.0 / 3.0)
    }
}

/// Sample `tex` projected along all three axes at world position `p` and
/// blend by the surface normal `n`. `lod` selects the mip level.
pub fn triplanar(tex: &dyn Texture2d, p: Vec3, n: Vec3, k: f32, lod: f32) -> Vec4 {
    let w = triplanar_weights(n, k);
    let q = p * TEXTURE_SCALE;
    let x = tex.sample_level(Vec2::new(q.y, q.z), lod);
    let y = tex.sample_level(Vec2::new(q.z, q.x), lod);
    let z = tex.sample_level(Vec2::new(q.x, q.y), lod);
    x * w.x + y * w.y + z * w.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use terravox_world::sampler::mock::ConstantTexture;
    use terravox_world::MipTexture;

    #[test]
    fn test_weights_sum_to_one() {
        let normals = [
            Vec3::X,
            Vec3::new(0.3, -0.8, 0.1),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1e-3, 0.0, 0.0),
            Vec3::new(5.0, -2.0, 7.0),
        ];
        for n in normals {
            for k in [1.0, 2.0, 4.0, 8.0] {
                let w = triplanar_weights(n, k);
                assert!((w.x + w.y + w.z - 1.0).abs() < 1e-5, "n={n:?} k={k}");
                assert!(w.min_element() >= 0.0);
            }
        }
    }

    #[test]
    fn test_axis_normal_selects_one_projection() {
        let w = triplanar_weights(Vec3::NEG_Y, 4.0);
        assert_eq!(w, Vec3::Y);
    }

    #[test]
    fn test_zero_normal_is_uniform() {
        let w = triplanar_weights(Vec3::ZERO, 4.0);
        assert_eq!(w, Vec3::splat(1.0 / 3.0));
        let w = triplanar_weights(Vec3::NAN, 4.0);
        assert_eq!(w, Vec3::splat(1.0 / 3.0));
    }

    #[test]
    fn test_constant_texture_passes_through() {
        let tex = ConstantTexture(Vec4::new(0.2, 0.4, 0.6, 1.0));
        let c = triplanar(&tex, Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 0.5, 0.7), 4.0, 0.0);
        assert!((c - tex.0).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_top_projection_ignores_height() {
        let tex = MipTexture::procedural_noise(32, 6);
        let a = triplanar(&tex, Vec3::new(1.3, 0.0, 2.9), Vec3::Y, 4.0, 0.0);
        let b = triplanar(&tex, Vec3::new(1.3, 17.0, 2.9), Vec3::Y, 4.0, 0.0);
        assert_eq!(a, b);
    }
}
