use glam::{Vec2, Vec3};
use terravox_core::constants::{
    AMBIENT_COLOR, HEIGHT_OCCLUSION_DEPTH, OCCLUSION_FLOOR, SHADOW_BIAS, SHADOW_DISTANCE,
    TRIPLANAR_SHARPNESS,
};
use terravox_core::math::{mix, mix3, smoothstep};
use terravox_core::{BiomeWeights, HitInfo, Settings};
use terravox_world::{BiomeClassifier, GradientEstimator, ScalarField, WorldTextures};

use crate::tracer::HybridTracer;
use crate::triplanar::triplanar;

// Albedo recipe. These only affect the look, never the geometry.
const ROCK_TINT: Vec3 = Vec3::new(0.62, 0.58, 0.54);
const GRASS_TINT: Vec3 = Vec3::new(0.42, 0.72, 0.28);
const GRASS_SLOPE: (f32, f32) = (0.55, 0.8);
const SAND_COLOR: Vec3 = Vec3::new(0.78, 0.7, 0.52);
/// Sand fades out between these heights above the water line.
const SAND_BAND: (f32, f32) = (0.3, 0.8);
const DESERT_COLOR: Vec3 = Vec3::new(0.86, 0.62, 0.38);
const SNOW_COLOR: Vec3 = Vec3::new(0.95, 0.97, 1.0);
const SNOW_SLOPE: (f32, f32) = (0.3, 0.6);

/// Surface shading of terrain hits: textured albedo, one directional light
/// with hard shadows, ambient, field-based occlusion and height occlusion.
#[derive(Clone, Copy)]
pub struct Shader<'a> {
    settings: &'a Settings,
    textures: &'a WorldTextures,
    tracer: HybridTracer<'a>,
    gradient: GradientEstimator<'a>,
    biomes: BiomeClassifier<'a>,
}

impl<'a> Shader<'a> {
    pub fn new(settings: &'a Settings, textures: &'a WorldTextures) -> Self {
        let field = ScalarField::new(settings, textures.volume.as_ref());
        Self {
            settings,
            textures,
            tracer: HybridTracer::new(field),
            gradient: GradientEstimator::new(field),
            biomes: BiomeClassifier::new(textures.noise.as_ref()),
        }
    }

    pub fn tracer(&self) -> HybridTracer<'a> {
        self.tracer
    }

    pub fn biomes(&self) -> BiomeClassifier<'a> {
        self.biomes
    }

    /// Shade a primary hit at `pos`, casting a shadow ray towards `light_dir`.
    pub fn shade(&self, pos: Vec3, light_dir: Vec3, lod: f32, hit: &HitInfo) -> Vec3 {
        self.shade_inner(pos, light_dir, lod, hit, true)
    }

    /// [`shade`](Self::shade) without the shadow ray, for secondary hits.
    pub fn shade_unshadowed(&self, pos: Vec3, light_dir: Vec3, lod: f32, hit: &HitInfo) -> Vec3 {
        self.shade_inner(pos, light_dir, lod, hit, false)
    }

    fn shade_inner(
        &self,
        pos: Vec3,
        light_dir: Vec3,
        lod: f32,
        hit: &HitInfo,
        shadows: bool,
    ) -> Vec3 {
        // Texturing follows the smooth field at the voxel centre, lighting
        // follows the blocky face.
        let nv = self.gradient.normal_or(hit.id, hit.n);
        let biome = self.biomes.biome(Vec2::new(pos.x, pos.z));
        let albedo = self.albedo(pos, nv, lod, biome);

        let mut diffuse = hit.n.dot(light_dir).max(0.0);
        if shadows && diffuse > 0.0 {
            let shadow = self
                .tracer
                .trace(pos + hit.n * SHADOW_BIAS, light_dir, SHADOW_DISTANCE);
            if shadow.is_hit {
                diffuse = 0.0;
            }
        }

        let ao = mix(OCCLUSION_FLOOR, 1.0, self.gradient.ao_factor(pos));
        let height_occ = mix(OCCLUSION_FLOOR, 1.0, self.height_occlusion(pos.y));

        let ambient = Vec3::from(AMBIENT_COLOR) * (0.5 + 0.5 * hit.n.y);
        albedo * (self.settings.light_rgb() * diffuse + ambient) * ao * height_occ
    }

    /// Terrain albedo at `pos` for the smooth normal `nv`.
    ///
    /// Rock everywhere, grass on up-facing voxels, sand just above the water
    /// line, then desert and snow blended on top by their biome weights.
    pub fn albedo(&self, pos: Vec3, nv: Vec3, lod: f32, biome: BiomeWeights) -> Vec3 {
        let grain = triplanar(self.textures.grain.as_ref(), pos, nv, TRIPLANAR_SHARPNESS, lod)
            .truncate();
        let dirt = triplanar(self.textures.dirt.as_ref(), pos, nv, TRIPLANAR_SHARPNESS, lod)
            .truncate();

        let rock = grain * ROCK_TINT;
        let grass = dirt * GRASS_TINT;
        let mut color = mix3(rock, grass, smoothstep(GRASS_SLOPE.0, GRASS_SLOPE.1, nv.y));

        let water = self.settings.water_height;
        let sand = 1.0 - smoothstep(water + SAND_BAND.0, water + SAND_BAND.1, pos.y);
        color = mix3(color, SAND_COLOR * (0.7 + 0.3 * dirt), sand);

        color = mix3(color, DESERT_COLOR * (0.6 + 0.4 * grain.x), biome.desert);

        let snow = biome.snow * smoothstep(SNOW_SLOPE.0, SNOW_SLOPE.1, nv.y);
        mix3(color, SNOW_COLOR, snow)
    }

    /// 0 deep under water, rising to 1 at the terrain ceiling.
    fn height_occlusion(&self, y: f32) -> f32 {
        smoothstep(
            self.settings.water_height - HEIGHT_OCCLUSION_DEPTH,
            self.settings.max_height,
            y,
        )
    }
}
