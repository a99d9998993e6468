//! Diagnostic views that replace the shaded color of a pixel.

use glam::Vec3;
use terravox_core::constants::DEBUG_FIELD_DISTANCE;
use terravox_core::{HitInfo, Settings};
use terravox_world::ScalarField;

/// Active diagnostic view. At most one applies; see [`DebugView::from_settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugView {
    /// Grayscale field value a fixed distance along the view ray.
    DistanceField,
    /// Face normal of the primary hit as RGB.
    Normals,
    /// Tracer iterations relative to the step budget.
    Steps,
}

impl DebugView {
    /// Pick the view enabled in `settings`. When several toggles are on the
    /// distance field wins, then normals, then steps.
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        if settings.visualize_distance_field {
            Some(Self::DistanceField)
        } else if settings.show_normals {
            Some(Self::Normals)
        } else if settings.show_steps {
            Some(Self::Steps)
        } else {
            None
        }
    }
}

pub fn distance_field_color(field: &ScalarField<'_>, ro: Vec3, rd: Vec3) -> Vec3 {
    Vec3::splat(field.map(ro + rd * DEBUG_FIELD_DISTANCE) * 0.1 + 0.5)
}

pub fn normal_color(hit: &HitInfo) -> Vec3 {
    hit.n
}

pub fn steps_color(hit: &HitInfo, steps: u32) -> Vec3 {
    Vec3::splat(hit.iterations as f32 / steps as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use terravox_world::sampler::mock::ConstantVolume;

    #[test]
    fn test_view_priority() {
        let mut settings = Settings::default();
        assert_eq!(DebugView::from_settings(&settings), None);

        settings.show_steps = true;
        assert_eq!(DebugView::from_settings(&settings), Some(DebugView::Steps));
        settings.show_normals = true;
        assert_eq!(DebugView::from_settings(&settings), Some(DebugView::Normals));
        settings.visualize_distance_field = true;
        assert_eq!(
            DebugView::from_settings(&settings),
            Some(DebugView::DistanceField)
        );
    }

    #[test]
    fn test_distance_field_gray() {
        let settings = Settings {
            max_height: 50.0,
            ..Default::default()
        };
        let volume = ConstantVolume(0.0);
        let field = ScalarField::new(&settings, &volume);
        // Ten units down from y = 70 lands 10 above the ceiling
        let c = distance_field_color(&field, Vec3::new(0.0, 70.0, 0.0), Vec3::NEG_Y);
        assert!((c - Vec3::splat(1.5)).length() < 1e-4, "{c:?}");
    }

    #[test]
    fn test_steps_gray() {
        let hit = HitInfo::miss(1.0, 512);
        assert_eq!(steps_color(&hit, 2048), Vec3::splat(0.25));
    }
}
