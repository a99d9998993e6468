use glam::Vec3;

/// Row-major buffer of linear RGB pixels. The hand-off between the renderer
/// and post-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Vec3>,
}

impl FrameBuffer {
    /// Black frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; width * height],
        }
    }

    /// Wrap existing pixels. Returns `None` if the count does not match.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Vec3>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Vec3] {
        &mut self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Vec3 {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, color: Vec3) {
        self.pixels[y * self.width + x] = color;
    }

    /// Pixel lookup with coordinates clamped to the frame edge.
    /// Must not be called on an empty frame.
    pub fn get_clamped(&self, x: i64, y: i64) -> Vec3 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.get(x, y)
    }

    /// Apply `f` to every pixel, producing a new frame of the same size.
    pub fn map(&self, f: impl Fn(Vec3) -> Vec3) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&c| f(c)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pixels_checks_size() {
        assert!(FrameBuffer::from_pixels(2, 2, vec![Vec3::ZERO; 4]).is_some());
        assert!(FrameBuffer::from_pixels(2, 2, vec![Vec3::ZERO; 3]).is_none());
    }

    #[test]
    fn test_clamped_lookup() {
        let mut frame = FrameBuffer::new(3, 2);
        frame.set(0, 0, Vec3::X);
        frame.set(2, 1, Vec3::Y);
        assert_eq!(frame.get_clamped(-5, -1), Vec3::X);
        assert_eq!(frame.get_clamped(10, 10), Vec3::Y);
    }

    #[test]
    fn test_map() {
        let frame = FrameBuffer::new(2, 1).map(|c| c + Vec3::ONE);
        assert!(frame.pixels().iter().all(|&c| c == Vec3::ONE));
    }
}
