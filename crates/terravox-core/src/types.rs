use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// Result of tracing one ray through the voxelized field.
///
/// Produced only by the tracer and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    pub is_hit: bool,
    /// Distance along the ray. For a miss, the distance at which tracing stopped.
    pub t: f32,
    /// Entry face normal of the hit voxel: one of the six signed unit axes.
    pub n: Vec3,
    /// Center of the hit voxel.
    pub id: Vec3,
    /// Loop iterations spent before the tracer returned.
    pub iterations: u32,
}

impl HitInfo {
    pub fn miss(t: f32, iterations: u32) -> Self {
        Self {
            is_hit: false,
            t,
            n: Vec3::ZERO,
            id: Vec3::ZERO,
            iterations,
        }
    }

    pub fn hit(t: f32, n: Vec3, id: Vec3, iterations: u32) -> Self {
        Self {
            is_hit: true,
            t,
            n,
            id,
            iterations,
        }
    }
}

/// Biome blend weights at a world position. The two weights are independent
/// and may both be non-zero; callers blend them one after the other.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BiomeWeights {
    pub desert: f32,
    pub snow: f32,
}

impl BiomeWeights {
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.desert, self.snow)
    }
}

/// Per-frame camera state, owned by the application loop and read-only to the
/// renderer. Matrix construction is the caller's job; only the inverse
/// view-projection is kept, for unprojecting screen rays.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub inv_view_proj: Mat4,
    pub position: Vec3,
    /// Elapsed time in seconds, drives water animation.
    pub time: f32,
}

impl Camera {
    /// Build from a view-projection matrix; the inverse is derived here.
    pub fn new(view_proj: Mat4, position: Vec3, time: f32) -> Self {
        Self {
            inv_view_proj: view_proj.inverse(),
            position,
            time,
        }
    }

    /// World-space ray through a screen position. `uv` is in `[0, 1]²` with
    /// the origin at the top-left corner. Returns `(origin, unit direction)`.
    pub fn ray(&self, uv: Vec2) -> (Vec3, Vec3) {
        let ndc = Vec2::new(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0);
        let far = self.inv_view_proj * ndc.extend(1.0).extend(1.0);
        let far = far.xyz() / far.w;
        let dir = (far - self.position).normalize();
        (self.position, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> Camera {
        let eye = Vec3::new(0.0, 2.0, 5.0);
        let view = Mat4::look_at_rh(eye, Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 1.0, 0.1, 100.0);
        Camera::new(proj * view, eye, 0.0)
    }

    #[test]
    fn test_center_ray_looks_forward() {
        let camera = test_camera();
        let (ro, rd) = camera.ray(Vec2::splat(0.5));
        assert_eq!(ro, camera.position);
        assert!((rd - Vec3::NEG_Z).length() < 1e-4, "{rd:?}");
    }

    #[test]
    fn test_top_of_screen_looks_up() {
        let camera = test_camera();
        let (_, top) = camera.ray(Vec2::new(0.5, 0.0));
        let (_, bottom) = camera.ray(Vec2::new(0.5, 1.0));
        assert!(top.y > 0.0);
        assert!(bottom.y < 0.0);
        assert!((top.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_miss_constructor() {
        let miss = HitInfo::miss(42.0, 7);
        assert!(!miss.is_hit);
        assert_eq!(miss.t, 42.0);
        assert_eq!(miss.iterations, 7);
    }
}
