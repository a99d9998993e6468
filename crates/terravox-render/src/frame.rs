use std::time::Instant;

use glam::{Vec2, Vec3};
use rayon::prelude::*;
use terravox_core::math::scrub_color;
use terravox_core::{Camera, FrameBuffer, Settings};
use terravox_world::WorldTextures;

use crate::debug::{distance_field_color, normal_color, steps_color, DebugView};
use crate::shading::Shader;
use crate::sky::sky_color;
use crate::water::WaterCompositor;

/// Per-pixel pipeline: trace, shade or sky, water, then scrub. Borrowed
/// state only, so one assembler is shared by every worker thread.
#[derive(Clone, Copy)]
pub struct FrameAssembler<'a> {
    settings: &'a Settings,
    shader: Shader<'a>,
    water: WaterCompositor<'a>,
    debug: Option<DebugView>,
}

impl<'a> FrameAssembler<'a> {
    /// `settings` must already be validated.
    pub fn new(settings: &'a Settings, textures: &'a WorldTextures) -> Self {
        Self {
            settings,
            shader: Shader::new(settings, textures),
            water: WaterCompositor::new(settings, textures),
            debug: DebugView::from_settings(settings),
        }
    }

    /// Linear, unclamped color seen along the ray `(ro, rd)` at `time`.
    pub fn shade_pixel(&self, ro: Vec3, rd: Vec3, time: f32) -> Vec3 {
        let tracer = self.shader.tracer();

        if self.debug == Some(DebugView::DistanceField) {
            return distance_field_color(&tracer.field(), ro, rd);
        }

        let hit = tracer.trace(ro, rd, self.settings.max_dist);

        match self.debug {
            Some(DebugView::Normals) => return normal_color(&hit),
            Some(DebugView::Steps) => return steps_color(&hit, self.settings.steps),
            _ => {}
        }

        let color = if hit.is_hit {
            let pos = ro + rd * hit.t;
            self.shader.shade(pos, self.settings.light_dir(), 0.0, &hit)
        } else {
            sky_color(rd)
        };

        let color = self.water.composite(ro, rd, &hit, color, time);
        scrub_color(color)
    }

    /// Color at screen position `uv` in `[0, 1]²` (origin top-left).
    pub fn render_pixel(&self, camera: &Camera, uv: Vec2) -> Vec3 {
        let (ro, rd) = camera.ray(uv);
        self.shade_pixel(ro, rd, camera.time)
    }

    /// Render a full frame, rows in parallel, sampling pixel centres.
    pub fn render_frame(&self, camera: &Camera, width: usize, height: usize) -> FrameBuffer {
        let mut frame = FrameBuffer::new(width, height);
        if frame.is_empty() {
            return frame;
        }

        let start = Instant::now();
        let size = Vec2::new(width as f32, height as f32);
        frame
            .pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    let uv = (Vec2::new(x as f32, y as f32) + Vec2::splat(0.5)) / size;
                    *pixel = self.render_pixel(camera, uv);
                }
            });

        log::debug!(
            "Rendered {}x{} frame in {:.2} ms",
            width,
            height,
            start.elapsed().as_secs_f64() * 1000.0
        );
        frame
    }
}
