//! Single source of truth for the renderer's fixed tuning constants.
//! Everything here is baked into the look of the terrain; the knobs that a
//! user is expected to change live in [`crate::settings::Settings`] instead.

// -- Scalar field --

/// Base frequency of the terrain density noise (texture periods per world unit).
pub const FIELD_SCALE: f32 = 1.0 / 24.0;

/// Horizontal compression applied to x/z before sampling the density noise.
/// Values below 1 stretch features sideways relative to their height.
pub const HORIZONTAL_COMPRESSION: f32 = 0.5;

/// Octave weights of the three-level fractal density noise (×1, ×2, ×4).
pub const OCTAVE_WEIGHTS: [f32; 3] = [0.5, 0.25, 0.125];

/// Sum of [`OCTAVE_WEIGHTS`], used to normalize the fractal sum back to [0, 1].
pub const OCTAVE_WEIGHT_SUM: f32 = 0.875;

/// Sampling offset of the second density octave (hides tiling seams).
pub const OCTAVE_OFFSET_1: [f32; 3] = [0.37, 0.11, 0.73];

/// Sampling offset of the third density octave.
pub const OCTAVE_OFFSET_2: [f32; 3] = [0.61, 0.29, 0.17];

/// Blend width of the smooth height ceiling.
pub const HEIGHT_CEILING_BLEND: f32 = 0.6;

// -- Gradient --

/// Backward-difference step of the gradient estimator.
pub const GRADIENT_STEP: f32 = 0.1;

/// Edges of the ambient occlusion smoothstep over `map(p) / |grad(p)|`.
pub const AO_EDGE_LOW: f32 = -0.08;
pub const AO_EDGE_HIGH: f32 = 0.04;

// -- Tracer --

/// Consecutive voxel steps that must pass before an empty voxel far from the
/// surface drops the tracer back into marching.
pub const VOXEL_FALSE_POSITIVE_STEPS: u32 = 2;

/// Replacement magnitude for zero ray direction components before inversion.
pub const MIN_DIRECTION_COMPONENT: f32 = 1e-8;

// -- Biomes --

/// World-to-texture scale of the biome masks.
pub const BIOME_SCALE: f32 = 1.0 / 1024.0;

/// Offset added to the mirrored desert lookup.
pub const DESERT_UV_OFFSET: [f32; 2] = [0.43, 0.17];

pub const DESERT_EDGE: (f32, f32) = (0.67, 0.672);
pub const SNOW_EDGE: (f32, f32) = (0.695, 0.7);

// -- Shading --

/// Sharpness exponent of triplanar blending.
pub const TRIPLANAR_SHARPNESS: f32 = 4.0;

/// World-to-texture scale of the surface detail layers.
pub const TEXTURE_SCALE: f32 = 0.25;

/// Offset along the face normal for shadow ray origins.
pub const SHADOW_BIAS: f32 = 1e-3;

/// Maximum length of shadow rays.
pub const SHADOW_DISTANCE: f32 = 200.0;

/// Sky ambient added on top of the directional term.
pub const AMBIENT_COLOR: [f32; 3] = [0.15, 0.17, 0.22];

/// Lower bound both occlusion factors are remapped to.
pub const OCCLUSION_FLOOR: f32 = 0.4;

/// How far below the water line the height occlusion starts to fade in.
pub const HEIGHT_OCCLUSION_DEPTH: f32 = 4.0;

// -- Water --

pub const WAVE_SCROLL_SPEED: f32 = 0.01;
pub const WAVE_SCROLL_DIR: [f32; 2] = [1.0, 0.8];
pub const WAVE_AMPLITUDE: f32 = 0.15;
pub const WAVE_DIFF_STEP: f32 = 0.05;
pub const FRESNEL_R0: f32 = 0.35;
pub const FRESNEL_POWER: i32 = 5;
pub const SPECULAR_POWER: i32 = 50;
pub const REFLECTION_DISTANCE: f32 = 300.0;

/// Per-channel Beer-Lambert absorption of the water body (red absorbed most).
pub const WATER_ABSORPTION: [f32; 3] = [0.24, 0.08, 0.04];

pub const FOAM_FREQUENCY: f32 = 60.0;
pub const FOAM_BAND: f32 = 0.22;

// -- Sky --

/// Sky zenith color (looking straight up).
pub const SKY_ZENITH: [f32; 3] = [0.22, 0.42, 0.85];

/// Sky horizon color.
pub const SKY_HORIZON: [f32; 3] = [0.75, 0.82, 0.9];

// -- Debug views --

/// Distance along the view ray at which the distance-field view samples.
pub const DEBUG_FIELD_DISTANCE: f32 = 10.0;
