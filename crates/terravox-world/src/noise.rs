//! Deterministic lattice hashing and the value noise built on it.
//!
//! Pure functions: `lattice_hash(x, y, z, seed) -> u32`. No state, so the
//! procedural texture sources are reproducible from a seed alone.

/// Hash an integer lattice point and seed into a well-mixed u32.
///
/// Each coordinate is folded into a seed-derived accumulator with
/// xxHash32-style multiply/rotate rounds, then finished with the
/// MurmurHash3 `fmix32` avalanche.
pub fn lattice_hash(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    let mut h = seed.wrapping_mul(0x9E37_79B1).wrapping_add(0x1656_67B1);
    for v in [x, y, z] {
        h = h.wrapping_add((v as u32).wrapping_mul(0xC2B2_AE3D));
        h = h.rotate_left(17).wrapping_mul(0x27D4_EB2F);
    }
    fmix32(h)
}

#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^ (h >> 16)
}

/// Top 24 bits of a hash as a float in [0, 1).
pub fn hash_to_float(hash: u32) -> f32 {
    (hash >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// White noise value in [0, 1) at a lattice point.
pub fn lattice_value(x: i32, y: i32, z: i32, seed: u32) -> f32 {
    hash_to_float(lattice_hash(x, y, z, seed))
}

/// Periodic 2-D value noise with period `period` lattice cells, sampled at
/// `(x, y)` in lattice units. Returns [0, 1).
pub fn periodic_value_noise_2d(x: f32, y: f32, period: i32, seed: u32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = fade(x - x0);
    let fy = fade(y - y0);
    let ix = (x0 as i32).rem_euclid(period);
    let iy = (y0 as i32).rem_euclid(period);

    let corner = |dx: i32, dy: i32| {
        lattice_value(
            (ix + dx).rem_euclid(period),
            (iy + dy).rem_euclid(period),
            0,
            seed,
        )
    };

    let top = lerp(corner(0, 0), corner(1, 0), fx);
    let bottom = lerp(corner(0, 1), corner(1, 1), fx);
    lerp(top, bottom, fy)
}

/// Periodic fractal value noise: `octaves` layers, each doubling frequency
/// and halving amplitude. Normalized to [0, 1).
pub fn periodic_fbm_2d(x: f32, y: f32, period: i32, octaves: u32, seed: u32) -> f32 {
    let mut sum = 0.0;
    let mut amplitude = 0.5;
    let mut total = 0.0;
    let mut scale = 1.0;
    let mut cells = period;
    for octave in 0..octaves {
        sum += amplitude
            * periodic_value_noise_2d(x * scale, y * scale, cells, seed.wrapping_add(octave));
        total += amplitude;
        amplitude *= 0.5;
        scale *= 2.0;
        cells *= 2;
    }
    if total > 0.0 {
        sum / total
    } else {
        0.0
    }
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
