//! Procedural sky returned for rays that miss the terrain.
//! The gradient uses a squared falloff: t = (ray_dir.y * 0.5 + 0.5)^2 so the
//! horizon band stays wide and the zenith color only dominates overhead.

use glam::Vec3;
use terravox_core::constants::{SKY_HORIZON, SKY_ZENITH};
use terravox_core::math::mix3;

/// Sky color seen along the unit direction `rd`.
pub fn sky_color(rd: Vec3) -> Vec3 {
    let t = (rd.y * 0.5 + 0.5).clamp(0.0, 1.0);
    mix3(Vec3::from(SKY_HORIZON), Vec3::from(SKY_ZENITH), t * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sky_colors_valid() {
        for c in SKY_ZENITH {
            assert!((0.0..=1.0).contains(&c));
        }
        for c in SKY_HORIZON {
            assert!((0.0..=1.0).contains(&c));
        }
    }

    #[test]
    fn test_gradient_endpoints() {
        assert!((sky_color(Vec3::Y) - Vec3::from(SKY_ZENITH)).length() < 1e-6);
        assert!((sky_color(Vec3::NEG_Y) - Vec3::from(SKY_HORIZON)).length() < 1e-6);
        // Looking at the horizon is a quarter of the way to the zenith
        let expected = mix3(Vec3::from(SKY_HORIZON), Vec3::from(SKY_ZENITH), 0.25);
        assert!((sky_color(Vec3::X) - expected).length() < 1e-6);
    }
}
