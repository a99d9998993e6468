use glam::Vec3;

/// Polynomial smooth minimum of two distances with blend width `k`.
///
/// `h = clamp(0.5 + 0.5 * (d2 - d1) / k, 0, 1)`,
/// result `mix(d2, d1, h) - k * h * (1 - h)`.
/// Requires `k > 0`.
#[inline]
pub fn smin(d1: f32, d2: f32, k: f32) -> f32 {
    let h = (0.5 + 0.5 * (d2 - d1) / k).clamp(0.0, 1.0);
    mix(d2, d1, h) - k * h * (1.0 - h)
}

/// Polynomial smooth maximum of two distances with blend width `k`.
///
/// `h = clamp(0.5 - 0.5 * (d2 - d1) / k, 0, 1)`,
/// result `mix(d2, d1, h) + k * h * (1 - h)`.
/// Requires `k > 0`.
#[inline]
pub fn smax(d1: f32, d2: f32, k: f32) -> f32 {
    let h = (0.5 - 0.5 * (d2 - d1) / k).clamp(0.0, 1.0);
    mix(d2, d1, h) + k * h * (1.0 - h)
}

/// Linear interpolation `a + (b - a) * t`.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise linear interpolation of colors/vectors.
#[inline]
pub fn mix3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Hermite smoothstep. Reversed edges (`edge0 > edge1`) produce a falling step.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Center of the voxel of size `s` that contains `p`: `(floor(p / s) + 0.5) * s`.
#[inline]
pub fn get_voxel_pos(p: Vec3, s: f32) -> Vec3 {
    ((p / s).floor() + Vec3::splat(0.5)) * s
}

/// Reflect incident direction `i` about normal `n` (`n` must be unit length).
#[inline]
pub fn reflect(i: Vec3, n: Vec3) -> Vec3 {
    i - 2.0 * n.dot(i) * n
}

/// Rec. 709 luminance of a linear color.
#[inline]
pub fn luma(c: Vec3) -> f32 {
    c.dot(Vec3::new(0.2126, 0.7152, 0.0722))
}

/// Replace NaN components with zero and clamp negatives to zero.
/// Applied to every color leaving the per-pixel pipeline.
#[inline]
pub fn scrub_color(c: Vec3) -> Vec3 {
    let fix = |v: f32| if v.is_nan() { 0.0 } else { v.max(0.0) };
    Vec3::new(fix(c.x), fix(c.y), fix(c.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smax_small_k_matches_max() {
        for (a, b) in [(1.0, 2.0), (-3.0, 0.5), (0.25, 0.25), (-1.0, -4.0)] {
            let s = smax(a, b, 1e-4);
            assert!((s - f32::max(a, b)).abs() < 1e-3, "smax({a}, {b}) = {s}");
        }
    }

    #[test]
    fn test_smin_small_k_matches_min() {
        for (a, b) in [(1.0, 2.0), (-3.0, 0.5), (0.25, 0.25), (-1.0, -4.0)] {
            let s = smin(a, b, 1e-4);
            assert!((s - f32::min(a, b)).abs() < 1e-3, "smin({a}, {b}) = {s}");
        }
    }

    #[test]
    fn test_smax_far_apart_is_exact() {
        // Outside the blend band the polynomial collapses to a hard max.
        assert_eq!(smax(5.0, 1.0, 0.6), 5.0);
        assert_eq!(smax(-2.0, 3.0, 0.6), 3.0);
    }

    #[test]
    fn test_smax_blend_region_exceeds_max() {
        // Equal inputs sit in the middle of the band: h = 0.5, bump = k / 4.
        let s = smax(1.0, 1.0, 0.6);
        assert!((s - 1.15).abs() < 1e-6, "got {s}");
        let m = smin(1.0, 1.0, 0.6);
        assert!((m - 0.85).abs() < 1e-6, "got {m}");
    }

    #[test]
    fn test_smax_is_continuous_across_band_edge() {
        let k = 0.6;
        let below = smax(0.0, k - 1e-4, k);
        let above = smax(0.0, k + 1e-4, k);
        assert!((below - above).abs() < 1e-3);
    }

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
        // Reversed edges fall instead of rise
        assert_eq!(smoothstep(1.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_voxel_pos_is_grid_aligned() {
        let s = 0.125;
        for p in [
            Vec3::new(0.01, 0.02, 0.03),
            Vec3::new(-3.7, 12.2, 100.9),
            Vec3::new(-0.0001, 0.0, 0.0001),
        ] {
            let v = get_voxel_pos(p, s);
            let cell = v / s - Vec3::splat(0.5);
            assert!((cell - cell.round()).abs().max_element() < 1e-4, "{v:?}");
            // The center is within half a voxel of the sample point
            assert!((v - p).abs().max_element() <= s * 0.5 + 1e-6);
        }
    }

    #[test]
    fn test_voxel_pos_negative_floor() {
        let v = get_voxel_pos(Vec3::new(-0.1, 0.1, -1.1), 1.0);
        assert_eq!(v, Vec3::new(-0.5, 0.5, -1.5));
    }

    #[test]
    fn test_reflect_flips_normal_component() {
        let r = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_scrub_color() {
        let c = scrub_color(Vec3::new(f32::NAN, -1.0, 2.0));
        assert_eq!(c, Vec3::new(0.0, 0.0, 2.0));
    }
}
