//! Still water plane at `water_height` with animated ripples, reflection,
//! Fresnel blending, depth absorption and shoreline foam.

use glam::{Vec2, Vec3};
use terravox_core::constants::{
    FOAM_BAND, FOAM_FREQUENCY, FRESNEL_POWER, FRESNEL_R0, REFLECTION_DISTANCE, SPECULAR_POWER,
    WATER_ABSORPTION, WAVE_AMPLITUDE, WAVE_DIFF_STEP, WAVE_SCROLL_DIR, WAVE_SCROLL_SPEED,
};
use terravox_core::math::{mix3, reflect, smoothstep};
use terravox_core::{HitInfo, Settings};
use terravox_world::{ScalarField, WorldTextures};

use crate::shading::Shader;
use crate::sky::sky_color;

const WATER_COLOR: Vec3 = Vec3::new(0.02, 0.11, 0.16);
const DESERT_WATER_COLOR: Vec3 = Vec3::new(0.05, 0.16, 0.14);
const SNOW_WATER_COLOR: Vec3 = Vec3::new(0.06, 0.12, 0.2);
const FOAM_COLOR: Vec3 = Vec3::new(0.85, 0.9, 0.95);

/// Ripple frequencies of the two wave layers (world units to texture space).
const RIPPLE_FREQUENCIES: (f32, f32) = (0.08, 0.21);
/// Mip level the ripple heightmap is read at; keeps the waves smooth.
const RIPPLE_LOD: f32 = 4.0;
/// Reflection rays start this far above the surface.
const REFLECTION_BIAS: f32 = 0.001;

/// Everything the water pass computed for one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterSample {
    /// Ray distance to the water surface (or to where the ray leaves the
    /// water when the camera is submerged and no surface is in view).
    pub surface_t: f32,
    /// Length of the ray segment that travels through water.
    pub underwater_path: f32,
    /// Fraction of the reflected color in the final blend.
    pub fresnel: f32,
    /// Reflected scene or sky color, including the sun highlight.
    pub reflection: Vec3,
    /// Final pixel color.
    pub color: Vec3,
}

#[derive(Clone, Copy)]
pub struct WaterCompositor<'a> {
    settings: &'a Settings,
    textures: &'a WorldTextures,
    shader: Shader<'a>,
    field: ScalarField<'a>,
}

impl<'a> WaterCompositor<'a> {
    pub fn new(settings: &'a Settings, textures: &'a WorldTextures) -> Self {
        let shader = Shader::new(settings, textures);
        Self {
            settings,
            textures,
            shader,
            field: shader.tracer().field(),
        }
    }

    /// Blend water over `scene_color` for the primary ray `(ro, rd)`.
    /// Pixels the water does not touch pass through unchanged.
    pub fn composite(
        &self,
        ro: Vec3,
        rd: Vec3,
        hit: &HitInfo,
        scene_color: Vec3,
        time: f32,
    ) -> Vec3 {
        self.evaluate(ro, rd, hit, scene_color, time)
            .map_or(scene_color, |sample| sample.color)
    }

    /// Compute the water contribution, or `None` when the ray never
    /// touches water in front of the terrain hit.
    pub fn evaluate(
        &self,
        ro: Vec3,
        rd: Vec3,
        hit: &HitInfo,
        scene_color: Vec3,
        time: f32,
    ) -> Option<WaterSample> {
        let water_height = self.settings.water_height;
        let submerged = ro.y < water_height;
        let pt = (water_height - ro.y) / rd.y;
        let surface_in_view = pt > 0.0 && pt < hit.t;

        if !surface_in_view && !submerged {
            return None;
        }

        let light_dir = self.settings.light_dir();

        let (surface_t, underwater_path) = if !submerged {
            (pt, hit.t - pt)
        } else if surface_in_view {
            (pt, pt)
        } else {
            (hit.t, hit.t)
        };

        let surface = ro + rd * surface_t;
        let xz = Vec2::new(surface.x, surface.z);
        let wave_h = self.wave_height(xz, time);
        let wn = self.wave_normal(xz, time);

        let (fresnel, reflection) = if !submerged {
            let mut r = reflect(rd, wn);
            r.y = r.y.abs();
            let origin = surface + Vec3::Y * REFLECTION_BIAS;
            let rhit = self.shader.tracer().trace(origin, r, REFLECTION_DISTANCE);
            let mut reflection = if rhit.is_hit {
                let lod = (1.0 + pt).log2() * 0.5;
                self.shader
                    .shade_unshadowed(origin + r * rhit.t, light_dir, lod, &rhit)
            } else {
                sky_color(r)
            };
            reflection +=
                self.settings.light_rgb() * r.dot(light_dir).max(0.0).powi(SPECULAR_POWER);
            (schlick(-rd.dot(wn)), reflection)
        } else if surface_in_view {
            // Seen from below the surface normal faces down
            (schlick(rd.dot(wn)), sky_color(rd))
        } else {
            (0.0, sky_color(rd))
        };

        let biome = self.shader.biomes().biome(xz);
        let mut base = mix3(WATER_COLOR, DESERT_WATER_COLOR, biome.desert);
        base = mix3(base, SNOW_WATER_COLOR, biome.snow);

        let transmittance = (-Vec3::from(WATER_ABSORPTION) * underwater_path).exp();
        let refracted = scene_color * transmittance + base * (Vec3::ONE - transmittance);
        let mut color = mix3(refracted, reflection, fresnel);

        if surface_in_view {
            let foam = foam_mask(self.field.map(surface), time, wave_h);
            color = mix3(color, FOAM_COLOR, foam);
        }

        Some(WaterSample {
            surface_t,
            underwater_path,
            fresnel,
            reflection,
            color,
        })
    }

    /// Ripple height at world `xz`: two scrolling layers of the noise texture.
    pub fn wave_height(&self, xz: Vec2, time: f32) -> f32 {
        let scroll = Vec2::from(WAVE_SCROLL_DIR) * (time * WAVE_SCROLL_SPEED);
        let a = self.ripple(xz * RIPPLE_FREQUENCIES.0 + scroll);
        let b = self.ripple(xz * RIPPLE_FREQUENCIES.1 - scroll);
        (a + 0.5 * b) * WAVE_AMPLITUDE
    }

    /// Surface normal of the ripple heightmap by central differences.
    pub fn wave_normal(&self, xz: Vec2, time: f32) -> Vec3 {
        let e = WAVE_DIFF_STEP;
        let dx = self.wave_height(xz + Vec2::new(e, 0.0), time)
            - self.wave_height(xz - Vec2::new(e, 0.0), time);
        let dz = self.wave_height(xz + Vec2::new(0.0, e), time)
            - self.wave_height(xz - Vec2::new(0.0, e), time);
        Vec3::new(-dx / (2.0 * e), 1.0, -dz / (2.0 * e)).normalize()
    }

    fn ripple(&self, uv: Vec2) -> f32 {
        self.textures.noise.sample_level(uv, RIPPLE_LOD).z
    }
}

/// Schlick Fresnel for the cosine between view and surface normal.
fn schlick(cos_theta: f32) -> f32 {
    FRESNEL_R0 + (1.0 - FRESNEL_R0) * (1.0 - cos_theta.max(0.0)).powi(FRESNEL_POWER)
}

/// Animated foam stripes near the shoreline. `fd` is the field value at the
/// water surface, so the band hugs the terrain.
pub fn foam_mask(fd: f32, time: f32, wave_h: f32) -> f32 {
    let band = 1.0 - smoothstep(0.0, FOAM_BAND, fd);
    let stripes = 0.5 + 0.5 * (fd * FOAM_FREQUENCY - time * 2.0 + wave_h * 6.0).sin();
    band * smoothstep(0.55, 0.95, stripes)
}
