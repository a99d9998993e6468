//! Hybrid sphere-tracing / voxel-DDA ray traversal.
//!
//! Far from the surface the tracer sphere-traces the scalar field freely.
//! Once the field value drops below one voxel diagonal it locks onto the
//! voxel grid and walks cell by cell (3-D DDA), testing each voxel centre for
//! occupancy. Voxels that turn out to be far from the surface again release
//! the lock. The result is a blocky surface that is exactly aligned with the
//! voxel grid while still skipping empty space at sphere-tracing speed.

use glam::Vec3;
use terravox_core::constants::{MIN_DIRECTION_COMPONENT, VOXEL_FALSE_POSITIVE_STEPS};
use terravox_core::math::get_voxel_pos;
use terravox_core::HitInfo;
use terravox_world::ScalarField;

/// Traversal state of one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceMode {
    /// Free sphere tracing through the field.
    Marching,
    /// Locked onto the voxel centred at `vpos`, `vi` steps after locking.
    Voxel { vpos: Vec3, vi: u32 },
}

/// Snapshot of the tracer at the start of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStep {
    pub iteration: u32,
    pub mode: TraceMode,
    pub t: f32,
}

#[derive(Clone, Copy)]
pub struct HybridTracer<'a> {
    field: ScalarField<'a>,
}

impl<'a> HybridTracer<'a> {
    pub fn new(field: ScalarField<'a>) -> Self {
        Self { field }
    }

    pub fn field(&self) -> ScalarField<'a> {
        self.field
    }

    /// Trace a ray from `ro` along `rd` up to distance `tmax`.
    ///
    /// A `tmax <= 0` returns `HitInfo::miss(tmax, 0)` without sampling the field.
    pub fn trace(&self, ro: Vec3, rd: Vec3, tmax: f32) -> HitInfo {
        self.trace_observed(ro, rd, tmax, |_| {})
    }

    /// [`trace`](Self::trace), reporting the state at every iteration to `observe`.
    pub fn trace_observed<F>(&self, ro: Vec3, rd: Vec3, tmax: f32, mut observe: F) -> HitInfo
    where
        F: FnMut(&TraceStep),
    {
        if tmax <= 0.0 {
            return HitInfo::miss(tmax, 0);
        }

        let settings = self.field.settings();
        let size = settings.voxel_size;
        let sd = settings.voxel_lock_distance();

        let rd = guard_direction(rd);
        let inv_rd = rd.recip();
        let dir_sign = rd.signum();
        let half_extent = inv_rd.abs() * (size * 0.5);

        let mut t = 0.0f32;
        let mut mode = TraceMode::Marching;
        // Direction of the last voxel advance; its negation is the hit face normal.
        let mut prd = Vec3::ZERO;

        for i in 0..settings.steps {
            let pos = ro + rd * t;
            if t >= tmax || (rd.y > 0.0 && pos.y > settings.max_height) {
                return HitInfo::miss(t, i);
            }

            observe(&TraceStep {
                iteration: i,
                mode,
                t,
            });

            match mode {
                TraceMode::Marching => {
                    let d = self.field.map(pos);
                    if d < sd {
                        t = (t - sd).max(0.0);
                        let vpos = get_voxel_pos(ro + rd * t, size);
                        // Entry face: the slab plane crossed last on the way in
                        let enter = -(ro - vpos) * inv_rd - half_extent;
                        prd = last_axis(enter) * dir_sign;
                        mode = TraceMode::Voxel { vpos, vi: 0 };
                    } else {
                        t += d.max(settings.min_dist);
                    }
                }
                TraceMode::Voxel { vpos, vi } => {
                    let d = self.field.map(vpos);
                    if d < 0.0 {
                        return HitInfo::hit(t, -prd, vpos, i);
                    }

                    let exit = -(ro - vpos) * inv_rd + half_extent;
                    let (axis, exit_t) = first_axis(exit);

                    if d > sd && vi > VOXEL_FALSE_POSITIVE_STEPS {
                        t = exit_t + sd;
                        mode = TraceMode::Marching;
                    } else {
                        let step = axis * dir_sign;
                        prd = step;
                        t = exit_t + settings.eps;
                        mode = TraceMode::Voxel {
                            vpos: vpos + step * size,
                            vi: vi + 1,
                        };
                    }
                }
            }
        }

        HitInfo::miss(tmax, settings.steps)
    }
}

/// Replace zero (or denormal-small) direction components with a signed
/// `MIN_DIRECTION_COMPONENT` so the reciprocal stays finite.
fn guard_direction(rd: Vec3) -> Vec3 {
    let guard = |v: f32| {
        if v.abs() < MIN_DIRECTION_COMPONENT {
            MIN_DIRECTION_COMPONENT.copysign(v)
        } else {
            v
        }
    };
    Vec3::new(guard(rd.x), guard(rd.y), guard(rd.z))
}

/// Axis with the smallest component; ties go to x, then y.
fn first_axis(v: Vec3) -> (Vec3, f32) {
    if v.x <= v.y && v.x <= v.z {
        (Vec3::X, v.x)
    } else if v.y <= v.z {
        (Vec3::Y, v.y)
    } else {
        (Vec3::Z, v.z)
    }
}

/// Axis with the largest component; ties go to x, then y.
fn last_axis(v: Vec3) -> Vec3 {
    if v.x >= v.y && v.x >= v.z {
        Vec3::X
    } else if v.y >= v.z {
        Vec3::Y
    } else {
        Vec3::Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terravox_core::Settings;
    use terravox_world::sampler::mock::ConstantVolume;
    use terravox_world::GrayVolume;

    fn ceiling_settings() -> Settings {
        Settings {
            max_height: 50.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_non_positive_tmax_is_immediate_miss() {
        let settings = Settings::default();
        let volume = ConstantVolume(0.0);
        let tracer = HybridTracer::new(ScalarField::new(&settings, &volume));
        for tmax in [0.0, -1.0, -1e9] {
            let hit = tracer.trace(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, tmax);
            assert_eq!(hit, HitInfo::miss(tmax, 0));
        }
    }

    #[test]
    fn test_straight_down_hits_ceiling() {
        let settings = ceiling_settings();
        let volume = ConstantVolume(0.0);
        let tracer = HybridTracer::new(ScalarField::new(&settings, &volume));

        let hit = tracer.trace(Vec3::new(0.0, 100.0, 0.0), Vec3::NEG_Y, settings.max_dist);
        assert!(hit.is_hit, "{hit:?}");
        assert!(
            (hit.id.y - 50.0).abs() <= settings.voxel_size,
            "hit voxel at y = {}",
            hit.id.y
        );
        assert_eq!(hit.n, Vec3::Y);
        assert!((hit.t - 50.0).abs() < 1.0);
    }

    #[test]
    fn test_diagonal_hit_has_axis_normal() {
        let settings = ceiling_settings();
        let volume = ConstantVolume(0.0);
        let tracer = HybridTracer::new(ScalarField::new(&settings, &volume));

        let rd = Vec3::new(0.3, -1.0, 0.2).normalize();
        let hit = tracer.trace(Vec3::new(1.1, 80.0, -2.3), rd, settings.max_dist);
        assert!(hit.is_hit);
        let axes = [Vec3::X, Vec3::Y, Vec3::Z];
        assert!(
            axes.iter().any(|a| hit.n == *a || hit.n == -*a),
            "normal {:?} is not a signed axis",
            hit.n
        );
        assert!((hit.id.y - 50.0).abs() <= settings.voxel_size);
    }

    #[test]
    fn test_upward_ray_above_ceiling_exits() {
        let settings = ceiling_settings();
        let volume = ConstantVolume(0.0);
        let tracer = HybridTracer::new(ScalarField::new(&settings, &volume));

        let hit = tracer.trace(Vec3::new(0.0, 60.0, 0.0), Vec3::Y, settings.max_dist);
        assert!(!hit.is_hit);
        assert_eq!(hit.iterations, 0);
        assert_eq!(hit.t, 0.0);
    }

    #[test]
    fn test_tmax_reached_reports_current_t() {
        let settings = ceiling_settings();
        let volume = ConstantVolume(0.0);
        let tracer = HybridTracer::new(ScalarField::new(&settings, &volume));

        // First step covers 50 units, overshooting tmax = 10
        let hit = tracer.trace(Vec3::new(0.0, 100.0, 0.0), Vec3::NEG_Y, 10.0);
        assert!(!hit.is_hit);
        assert_eq!(hit.t, 50.0);
        assert_eq!(hit.iterations, 1);
    }

    #[test]
    fn test_step_exhaustion_is_bounded_miss() {
        // Horizontal ray through empty space far below the ceiling never
        // locks on and never leaves through the top.
        let settings = Settings {
            steps: 64,
            ..Default::default()
        };
        let volume = ConstantVolume(1.0);
        let tracer = HybridTracer::new(ScalarField::new(&settings, &volume));

        let mut observed = 0;
        let hit = tracer.trace_observed(Vec3::ZERO, Vec3::X, 1e9, |_| observed += 1);
        assert!(!hit.is_hit);
        assert_eq!(hit.t, 1e9);
        assert_eq!(hit.iterations, settings.steps);
        assert_eq!(observed, settings.steps);
    }

    #[test]
    fn test_trace_is_deterministic() {
        let settings = Settings::default();
        let volume = GrayVolume::procedural(32, 17);
        let tracer = HybridTracer::new(ScalarField::new(&settings, &volume));

        let ro = Vec3::new(3.0, 4.5, -7.0);
        for i in 0..16 {
            let angle = i as f32 * 0.4;
            let rd = Vec3::new(angle.cos(), -0.35, angle.sin()).normalize();
            let a = tracer.trace(ro, rd, 500.0);
            let b = tracer.trace(ro, rd, 500.0);
            assert_eq!(a.is_hit, b.is_hit);
            assert_eq!(a.t.to_bits(), b.t.to_bits());
            assert_eq!(a.id, b.id);
            assert_eq!(a.n, b.n);
            assert_eq!(a.iterations, b.iterations);
        }
    }

    #[test]
    fn test_voxel_positions_are_grid_aligned() {
        let settings = Settings::default();
        let volume = GrayVolume::procedural(32, 2);
        let tracer = HybridTracer::new(ScalarField::new(&settings, &volume));
        let s = settings.voxel_size;

        let mut voxel_steps = 0;
        for i in 0..8 {
            let rd = Vec3::new(1.0, -0.2 - i as f32 * 0.05, 0.37).normalize();
            tracer.trace_observed(Vec3::new(0.0, 4.0, 0.0), rd, 400.0, |step| {
                if let TraceMode::Voxel { vpos, .. } = step.mode {
                    voxel_steps += 1;
                    let cell = vpos / s - Vec3::splat(0.5);
                    assert!(
                        (cell - cell.round()).abs().max_element() < 1e-3,
                        "voxel {vpos:?} is off-grid"
                    );
                }
            });
        }
        assert!(voxel_steps > 0, "no ray ever locked onto the grid");
    }

    #[test]
    fn test_marching_t_is_monotonic() {
        let settings = Settings::default();
        let volume = GrayVolume::procedural(32, 9);
        let tracer = HybridTracer::new(ScalarField::new(&settings, &volume));

        for i in 0..8 {
            let rd = Vec3::new(0.8, -0.15, i as f32 * 0.1).normalize();
            let mut last: Option<f32> = None;
            tracer.trace_observed(Vec3::new(-5.0, 4.0, 2.0), rd, 400.0, |step| {
                match step.mode {
                    TraceMode::Marching => {
                        if let Some(prev) = last {
                            assert!(step.t >= prev, "t went back from {prev} to {}", step.t);
                        }
                        last = Some(step.t);
                    }
                    // A voxel lock starts a new marching run when released
                    TraceMode::Voxel { .. } => last = None,
                }
            });
        }
    }

    #[test]
    fn test_axis_parallel_rays_stay_finite() {
        let settings = ceiling_settings();
        let volume = ConstantVolume(0.0);
        let tracer = HybridTracer::new(ScalarField::new(&settings, &volume));

        // Grazing horizontal ray inside the solid layer
        let hit = tracer.trace(Vec3::new(0.3, 49.0, 0.7), Vec3::Z, 100.0);
        assert!(hit.is_hit);
        assert!(hit.t.is_finite());
        assert!(hit.n.is_finite());
    }

    #[test]
    fn test_guard_direction_keeps_sign() {
        let g = guard_direction(Vec3::new(0.0, -0.0, 0.5));
        assert_eq!(g, Vec3::new(1e-8, -1e-8, 0.5));
    }

    #[test]
    fn test_first_axis_tie_break() {
        assert_eq!(first_axis(Vec3::splat(1.0)).0, Vec3::X);
        assert_eq!(first_axis(Vec3::new(2.0, 1.0, 1.0)).0, Vec3::Y);
        assert_eq!(first_axis(Vec3::new(2.0, 3.0, 1.0)).0, Vec3::Z);
    }
}
