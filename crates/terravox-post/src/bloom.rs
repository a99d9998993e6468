//! Threshold bloom over a mip chain of blurred, downsampled copies.

use glam::{Vec2, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use terravox_core::math::{luma, smoothstep};
use terravox_core::FrameBuffer;

/// One-sided weights of the 5-tap Gaussian (centre tap first).
pub const BLUR_WEIGHTS: [f32; 5] = [0.19638062, 0.29675293, 0.09442139, 0.01037598, 0.00025940];

/// Contribution of each mip level to the recombined bloom, finest first.
pub const LEVEL_WEIGHTS: [f32; 8] = [1.0, 1.5, 1.0, 1.5, 1.8, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    pub enabled: bool,
    /// Luma at which pixels start to bloom.
    pub min_brightness: f32,
    /// Luma at which pixels bloom fully.
    pub max_brightness: f32,
    /// Tap spacing of the blur, in pixels of the level being blurred.
    pub blur_radius: f32,
    /// Number of blurred levels, at most [`LEVEL_WEIGHTS`]`.len()`.
    pub levels: usize,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_brightness: 0.9,
            max_brightness: 1.0,
            blur_radius: 1.0,
            levels: LEVEL_WEIGHTS.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurAxis {
    Horizontal,
    Vertical,
}

/// Keep only the bright part of the image: `c * smoothstep(min, max, luma(c))`.
pub fn prefilter(frame: &FrameBuffer, min_brightness: f32, max_brightness: f32) -> FrameBuffer {
    frame.map(|c| c * smoothstep(min_brightness, max_brightness, luma(c)))
}

/// Half-resolution copy, each output pixel the mean of a 2×2 block.
/// Odd edges are clamped; a 1-pixel axis stays 1 pixel.
pub fn downsample(frame: &FrameBuffer) -> FrameBuffer {
    if frame.is_empty() {
        return FrameBuffer::new(0, 0);
    }
    let width = (frame.width() / 2).max(1);
    let height = (frame.height() / 2).max(1);
    let mut out = FrameBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = (x as i64 * 2, y as i64 * 2);
            let sum = frame.get_clamped(sx, sy)
                + frame.get_clamped(sx + 1, sy)
                + frame.get_clamped(sx, sy + 1)
                + frame.get_clamped(sx + 1, sy + 1);
            out.set(x, y, sum * 0.25);
        }
    }
    out
}

/// One pass of the separable 5-tap Gaussian along `axis`. Taps sit
/// `spacing` pixels apart and are linearly interpolated; edges clamp.
pub fn blur(frame: &FrameBuffer, axis: BlurAxis, spacing: f32) -> FrameBuffer {
    let mut out = FrameBuffer::new(frame.width(), frame.height());
    if frame.is_empty() {
        return out;
    }

    let width = frame.width();
    out.pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let tap = |offset: f32| sample_along(frame, x, y, axis, offset);
                let mut sum = tap(0.0) * BLUR_WEIGHTS[0];
                for (i, &w) in BLUR_WEIGHTS.iter().enumerate().skip(1) {
                    let d = i as f32 * spacing;
                    sum += (tap(d) + tap(-d)) * w;
                }
                *pixel = sum;
            }
        });
    out
}

fn sample_along(frame: &FrameBuffer, x: usize, y: usize, axis: BlurAxis, offset: f32) -> Vec3 {
    let base = offset.floor();
    let f = offset - base;
    let (x, y, o) = (x as i64, y as i64, base as i64);
    let (a, b) = match axis {
        BlurAxis::Horizontal => (frame.get_clamped(x + o, y), frame.get_clamped(x + o + 1, y)),
        BlurAxis::Vertical => (frame.get_clamped(x, y + o), frame.get_clamped(x, y + o + 1)),
    };
    a.lerp(b, f)
}

/// Cubic B-spline weights for the four taps around a fractional position.
fn bspline_weights(f: f32) -> [f32; 4] {
    let f2 = f * f;
    let f3 = f2 * f;
    [
        (1.0 - f).powi(3) / 6.0,
        (3.0 * f3 - 6.0 * f2 + 4.0) / 6.0,
        (-3.0 * f3 + 3.0 * f2 + 3.0 * f + 1.0) / 6.0,
        f3 / 6.0,
    ]
}

/// Smooth upsampling lookup: cubic B-spline filter over the 4×4 texels
/// around `uv` (`[0, 1]²`, texel centres at `(i + 0.5) / size`).
pub fn sample_bicubic(frame: &FrameBuffer, uv: Vec2) -> Vec3 {
    if frame.is_empty() {
        return Vec3::ZERO;
    }
    let p = uv * Vec2::new(frame.width() as f32, frame.height() as f32) - Vec2::splat(0.5);
    let base = p.floor();
    let f = p - base;
    let wx = bspline_weights(f.x);
    let wy = bspline_weights(f.y);
    let (bx, by) = (base.x as i64 - 1, base.y as i64 - 1);

    let mut sum = Vec3::ZERO;
    for (j, wy) in wy.iter().enumerate() {
        for (i, wx) in wx.iter().enumerate() {
            sum += frame.get_clamped(bx + i as i64, by + j as i64) * (wx * wy);
        }
    }
    sum
}

#[derive(Debug, Clone, Copy)]
pub struct Bloom {
    settings: BloomSettings,
}

impl Bloom {
    pub fn new(settings: BloomSettings) -> Self {
        Self { settings }
    }

    /// Build the blurred mip chain of the bright parts of `scene`, finest first.
    pub fn mip_chain(&self, scene: &FrameBuffer) -> Vec<FrameBuffer> {
        let s = &self.settings;
        let levels = s.levels.min(LEVEL_WEIGHTS.len());
        let mut chain = Vec::with_capacity(levels);
        if scene.is_empty() {
            return chain;
        }

        let mut current = downsample(&prefilter(scene, s.min_brightness, s.max_brightness));
        for _ in 0..levels {
            current = downsample(&current);
            let h = blur(&current, BlurAxis::Horizontal, s.blur_radius);
            chain.push(blur(&h, BlurAxis::Vertical, s.blur_radius));
            if current.width() == 1 && current.height() == 1 {
                break;
            }
        }
        chain
    }

    /// Bloom layer at full scene resolution: the weighted mean of the
    /// bicubically upsampled mip chain.
    pub fn apply(&self, scene: &FrameBuffer) -> FrameBuffer {
        let chain = self.mip_chain(scene);
        let mut out = FrameBuffer::new(scene.width(), scene.height());
        if chain.is_empty() {
            return out;
        }

        let total: f32 = LEVEL_WEIGHTS[..chain.len()].iter().sum();
        let size = Vec2::new(scene.width() as f32, scene.height() as f32);
        let width = scene.width();
        out.pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    let uv = (Vec2::new(x as f32, y as f32) + Vec2::splat(0.5)) / size;
                    let sum: Vec3 = chain
                        .iter()
                        .zip(LEVEL_WEIGHTS)
                        .map(|(level, w)| sample_bicubic(level, uv) * w)
                        .sum();
                    *pixel = sum / total;
                }
            });

        log::debug!("Bloom combined {} levels", chain.len());
        out
    }
}
