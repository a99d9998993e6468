use std::path::{Path, PathBuf};
use std::time::Instant;

use terravox_core::{FrameBuffer, Settings, TerravoxError};
use terravox_post::PostProcess;
use terravox_render::FrameAssembler;
use terravox_world::WorldTextures;

use crate::scenes::SceneConfig;

/// Frame-time statistics of one scene, in milliseconds.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Outcome of rendering one scene `frame_count` times.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub width: u32,
    pub height: u32,
    pub frame_count: u32,
    /// Mean linear luma of the last frame, a cheap check that the scene
    /// still renders the same content.
    pub mean_luma: f32,
    pub timings: TimingSeries,
}

/// Renders benchmark scenes on the CPU and times full frames
/// (trace + shade + water + post resolve).
pub struct BenchmarkRunner {
    settings: Settings,
    textures: WorldTextures,
    post: PostProcess,
    width: u32,
    height: u32,
    frame_count: u32,
    image_dir: Option<PathBuf>,
}

impl BenchmarkRunner {
    pub fn new(
        settings: Settings,
        textures: WorldTextures,
        post: PostProcess,
        width: u32,
        height: u32,
        frame_count: u32,
    ) -> Self {
        Self {
            settings,
            textures,
            post,
            width,
            height,
            frame_count,
            image_dir: None,
        }
    }

    /// Write the resolved last frame of each scene as `<dir>/<scene>.png`.
    pub fn with_image_dir(mut self, dir: PathBuf) -> Self {
        self.image_dir = Some(dir);
        self
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> Result<BenchmarkResult, TerravoxError> {
        log::info!(
            "Running scene '{}' ({}x{}, {} frames)...",
            config.name,
            self.width,
            self.height,
            self.frame_count
        );

        let settings = config.settings(&self.settings);
        settings.validate()?;

        let aspect = self.width as f32 / self.height.max(1) as f32;
        let camera = config.camera(aspect);
        let assembler = FrameAssembler::new(&settings, &self.textures);

        let mut frame_times = Vec::with_capacity(self.frame_count as usize);
        let mut last_frame = FrameBuffer::new(0, 0);
        let mut last_pixels = Vec::new();

        for _ in 0..self.frame_count {
            let frame_start = Instant::now();

            let frame = assembler.render_frame(&camera, self.width as usize, self.height as usize);
            last_pixels = self.post.resolve(&frame);
            last_frame = frame;

            let elapsed = frame_start.elapsed().as_secs_f64() * 1000.0;
            frame_times.push(elapsed);
        }

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: mean={:.2}ms, p95={:.2}ms, p99={:.2}ms",
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms
        );

        if let Some(dir) = &self.image_dir {
            if !last_pixels.is_empty() {
                let path = dir.join(format!("{}.png", config.name));
                write_png(&path, self.width, self.height, &last_pixels)?;
                log::info!("  Wrote {}", path.display());
            }
        }

        Ok(BenchmarkResult {
            scene_name: config.name.to_string(),
            width: self.width,
            height: self.height,
            frame_count: self.frame_count,
            mean_luma: mean_luma(&last_frame),
            timings,
        })
    }
}

/// Save RGBA8 pixels as a PNG, creating the parent directory if needed.
pub fn write_png(
    path: &Path,
    width: u32,
    height: u32,
    pixels: &[[u8; 4]],
) -> Result<(), TerravoxError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes: Vec<u8> = pixels.iter().flatten().copied().collect();
    let image_write_error = |reason: String| TerravoxError::ImageWrite {
        path: path.display().to_string(),
        reason,
    };
    let image = image::RgbaImage::from_raw(width, height, bytes)
        .ok_or_else(|| image_write_error("pixel count does not match dimensions".to_string()))?;
    image
        .save(path)
        .map_err(|e| image_write_error(e.to_string()))
}

fn mean_luma(frame: &FrameBuffer) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum: f32 = frame
        .pixels()
        .iter()
        .map(|&c| terravox_core::math::luma(c))
        .sum();
    sum / frame.pixels().len() as f32
}

/// Summarize frame times in milliseconds. Percentiles use the nearest-rank
/// method on the sorted samples; an empty slice yields all zeros.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    let mut sorted = times.to_vec();
    sorted.sort_by(f64::total_cmp);

    let (Some(&min_ms), Some(&max_ms)) = (sorted.first(), sorted.last()) else {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    };

    let n = sorted.len();
    let percentile = |p: f64| sorted[((n as f64 * p).ceil() as usize).min(n - 1)];
    let median_ms = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) * 0.5
    } else {
        sorted[n / 2]
    };

    TimingSeries {
        mean_ms: sorted.iter().sum::<f64>() / n as f64,
        median_ms,
        p95_ms: percentile(0.95),
        p99_ms: percentile(0.99),
        min_ms,
        max_ms,
    }
}
