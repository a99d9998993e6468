//! In-memory texture sources: a mip-mapped RGBA texture and a gray noise volume.
//!
//! Both use texel-centre addressing (`uv = (i + 0.5) / size`) and repeat
//! wrapping, so a texture tiles seamlessly over the infinite terrain.

use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use terravox_core::TerravoxError;

use crate::noise::{lattice_value, periodic_fbm_2d};
use crate::sampler::{NoiseVolume, Texture2d};

/// Reduce a floored lattice coordinate into `[0, n]` before it becomes an
/// index, so neighbour offsets cannot overflow for huge coordinates.
/// Non-finite input maps to cell 0.
#[inline]
fn wrap_cell(v: f32, n: usize) -> i32 {
    v.rem_euclid(n as f32) as i32
}

/// One level of a mip chain.
#[derive(Debug, Clone)]
struct MipLevel {
    width: usize,
    height: usize,
    texels: Vec<Vec4>,
}

impl MipLevel {
    #[inline]
    fn texel(&self, x: i32, y: i32) -> Vec4 {
        let x = x.rem_euclid(self.width as i32) as usize;
        let y = y.rem_euclid(self.height as i32) as usize;
        self.texels[y * self.width + x]
    }

    fn sample_bilinear(&self, uv: Vec2) -> Vec4 {
        let x = uv.x * self.width as f32 - 0.5;
        let y = uv.y * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (ix, iy) = (wrap_cell(x0, self.width), wrap_cell(y0, self.height));

        let top = self.texel(ix, iy).lerp(self.texel(ix + 1, iy), fx);
        let bottom = self.texel(ix, iy + 1).lerp(self.texel(ix + 1, iy + 1), fx);
        top.lerp(bottom, fy)
    }

    /// Half-resolution 2×2 box filtered copy (odd edges wrap).
    fn downsample(&self) -> MipLevel {
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        let mut texels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let (sx, sy) = ((x * 2) as i32, (y * 2) as i32);
                let sum = self.texel(sx, sy)
                    + self.texel(sx + 1, sy)
                    + self.texel(sx, sy + 1)
                    + self.texel(sx + 1, sy + 1);
                texels.push(sum * 0.25);
            }
        }
        MipLevel {
            width,
            height,
            texels,
        }
    }
}

/// RGBA texture with a full box-filtered mip chain.
#[derive(Debug, Clone)]
pub struct MipTexture {
    levels: Vec<MipLevel>,
}

impl MipTexture {
    /// Build from linear texels in row-major order.
    pub fn from_texels(
        width: usize,
        height: usize,
        texels: Vec<Vec4>,
    ) -> Result<Self, TerravoxError> {
        if width == 0 || height == 0 || texels.len() != width * height {
            return Err(TerravoxError::TextureFormat {
                expected: width * height,
                actual: texels.len(),
            });
        }

        let mut levels = vec![MipLevel {
            width,
            height,
            texels,
        }];
        while let Some(last) = levels.last() {
            if last.width == 1 && last.height == 1 {
                break;
            }
            let next = last.downsample();
            levels.push(next);
        }
        Ok(Self { levels })
    }

    /// Build from 8-bit RGBA bytes (as decoded from an image file).
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, TerravoxError> {
        if bytes.len() != width * height * 4 {
            return Err(TerravoxError::TextureFormat {
                expected: width * height * 4,
                actual: bytes.len(),
            });
        }
        let texels = bytes
            .chunks_exact(4)
            .map(|c| Vec4::new(c[0] as f32, c[1] as f32, c[2] as f32, c[3] as f32) / 255.0)
            .collect();
        Self::from_texels(width, height, texels)
    }

    /// Decode an image file (any format the `image` crate reads).
    pub fn load(path: &Path) -> Result<Self, TerravoxError> {
        let img = image::open(path).map_err(|e| TerravoxError::TextureLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let texture = Self::from_rgba8(width as usize, height as usize, rgba.as_raw())?;
        log::info!(
            "Loaded texture {} ({}x{}, {} mips)",
            path.display(),
            width,
            height,
            texture.mip_count()
        );
        Ok(texture)
    }

    /// Per-texel RGBA white noise, one independent value per channel.
    pub fn procedural_noise(size: usize, seed: u32) -> Self {
        let size = size.max(1);
        let mut texels = Vec::with_capacity(size * size);
        for y in 0..size as i32 {
            for x in 0..size as i32 {
                texels.push(Vec4::new(
                    lattice_value(x, y, 0, seed),
                    lattice_value(x, y, 1, seed),
                    lattice_value(x, y, 2, seed),
                    lattice_value(x, y, 3, seed),
                ));
            }
        }
        Self::square(size, texels)
    }

    /// Tileable fractal detail texture tinted by `tint`.
    pub fn procedural_detail(size: usize, seed: u32, tint: Vec3) -> Self {
        const CELLS: i32 = 8;
        const OCTAVES: u32 = 5;

        let size = size.max(1);
        let scale = CELLS as f32 / size as f32;
        let mut texels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let v = periodic_fbm_2d(x as f32 * scale, y as f32 * scale, CELLS, OCTAVES, seed);
                let shade = 0.6 + 0.8 * v;
                texels.push((tint * shade).min(Vec3::ONE).extend(1.0));
            }
        }
        Self::square(size, texels)
    }

    fn square(size: usize, texels: Vec<Vec4>) -> Self {
        let mut levels = vec![MipLevel {
            width: size,
            height: size,
            texels,
        }];
        while levels[levels.len() - 1].width > 1 {
            let next = levels[levels.len() - 1].downsample();
            levels.push(next);
        }
        Self { levels }
    }

    pub fn width(&self) -> usize {
        self.levels[0].width
    }

    pub fn height(&self) -> usize {
        self.levels[0].height
    }

    pub fn mip_count(&self) -> usize {
        self.levels.len()
    }
}

impl Texture2d for MipTexture {
    fn sample_level(&self, uv: Vec2, lod: f32) -> Vec4 {
        let max_level = (self.levels.len() - 1) as f32;
        let lod = if lod.is_nan() { 0.0 } else { lod.clamp(0.0, max_level) };
        let lo = lod.floor() as usize;
        let hi = lod.ceil() as usize;
        let a = self.levels[lo].sample_bilinear(uv);
        if hi == lo {
            return a;
        }
        let b = self.levels[hi].sample_bilinear(uv);
        a.lerp(b, lod - lo as f32)
    }
}

/// Cube of scalar texels in [0, 1] with trilinear filtering.
#[derive(Debug, Clone)]
pub struct GrayVolume {
    size: usize,
    texels: Vec<f32>,
}

impl GrayVolume {
    /// Build from raw bytes, one `u8` per texel, x fastest then y then z.
    pub fn from_raw(bytes: &[u8], size: usize) -> Result<Self, TerravoxError> {
        let expected = size * size * size;
        if size == 0 || bytes.len() != expected {
            return Err(TerravoxError::TextureFormat {
                expected,
                actual: bytes.len(),
            });
        }
        let texels = bytes.iter().map(|&b| b as f32 / 255.0).collect();
        Ok(Self { size, texels })
    }

    /// Build from raw native-endian `f32` texels (4 bytes each), clamped
    /// to [0, 1]. The byte slice needs no particular alignment.
    pub fn from_raw_f32(bytes: &[u8], size: usize) -> Result<Self, TerravoxError> {
        let count = size * size * size;
        let texel_bytes = std::mem::size_of::<f32>();
        if size == 0 || bytes.len() != count * texel_bytes {
            return Err(TerravoxError::TextureFormat {
                expected: count * texel_bytes,
                actual: bytes.len(),
            });
        }
        let texels = bytes
            .chunks_exact(texel_bytes)
            .map(|chunk| bytemuck::pod_read_unaligned::<f32>(chunk).clamp(0.0, 1.0))
            .collect();
        Ok(Self { size, texels })
    }

    /// Read a raw volume file. The texel format follows from the file
    /// length: `size³` bytes are `u8` texels, `4·size³` bytes are `f32`.
    pub fn load(path: &Path, size: usize) -> Result<Self, TerravoxError> {
        let bytes = std::fs::read(path).map_err(|e| TerravoxError::TextureLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let count = size * size * size;
        let volume = if count > 0 && bytes.len() == count * std::mem::size_of::<f32>() {
            Self::from_raw_f32(&bytes, size)?
        } else {
            Self::from_raw(&bytes, size)?
        };
        log::info!("Loaded noise volume {} ({size}³)", path.display());
        Ok(volume)
    }

    /// Seeded white noise, softened by one wrapping [1, 2, 1] pass per axis
    /// and stretched back to the full [0, 1] range.
    pub fn procedural(size: usize, seed: u32) -> Self {
        let size = size.max(2);
        let mut texels = Vec::with_capacity(size * size * size);
        for z in 0..size as i32 {
            for y in 0..size as i32 {
                for x in 0..size as i32 {
                    texels.push(lattice_value(x, y, z, seed));
                }
            }
        }

        let mut volume = Self { size, texels };
        for axis in 0..3 {
            volume.blur_axis(axis);
        }
        volume.normalize();
        volume
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        let n = self.size as i32;
        let x = x.rem_euclid(n) as usize;
        let y = y.rem_euclid(n) as usize;
        let z = z.rem_euclid(n) as usize;
        (z * self.size + y) * self.size + x
    }

    fn blur_axis(&mut self, axis: usize) {
        let n = self.size as i32;
        let mut out = vec![0.0; self.texels.len()];
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    let step = |d: i32| match axis {
                        0 => self.index(x + d, y, z),
                        1 => self.index(x, y + d, z),
                        _ => self.index(x, y, z + d),
                    };
                    out[self.index(x, y, z)] = 0.25 * self.texels[step(-1)]
                        + 0.5 * self.texels[step(0)]
                        + 0.25 * self.texels[step(1)];
                }
            }
        }
        self.texels = out;
    }

    fn normalize(&mut self) {
        let min = self.texels.iter().copied().fold(f32::INFINITY, f32::min);
        let max = self.texels.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;
        if range > 0.0 {
            for v in &mut self.texels {
                *v = (*v - min) / range;
            }
        }
    }
}

impl NoiseVolume for GrayVolume {
    fn sample(&self, uvw: Vec3) -> f32 {
        let p = uvw * self.size as f32 - Vec3::splat(0.5);
        let p0 = p.floor();
        let f = p - p0;
        let (x, y, z) = (
            wrap_cell(p0.x, self.size),
            wrap_cell(p0.y, self.size),
            wrap_cell(p0.z, self.size),
        );

        let t = |dx: i32, dy: i32, dz: i32| self.texels[self.index(x + dx, y + dy, z + dz)];
        let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;

        let x00 = lerp(t(0, 0, 0), t(1, 0, 0), f.x);
        let x10 = lerp(t(0, 1, 0), t(1, 1, 0), f.x);
        let x01 = lerp(t(0, 0, 1), t(1, 0, 1), f.x);
        let x11 = lerp(t(0, 1, 1), t(1, 1, 1), f.x);
        let y0 = lerp(x00, x10, f.y);
        let y1 = lerp(x01, x11, f.y);
        lerp(y0, y1, f.z)
    }
}
