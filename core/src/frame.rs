/// # FrameBuffer
/// A monochrome grid of `width` x `height` pixels, stored row-major.
///
/// Coordinates wrap on both axes, so any `(x, y)` addresses some pixel.
/// The buffer remembers whether it changed since the last `take_dirty` so a display only has to
/// redraw when something was cleared or drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
    dirty: bool,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            pixels: vec![false; width * height],
            dirty: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|pixel| *pixel = false);
        self.dirty = true;
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        let index = self.index(x, y);
        self.pixels[index] = on;
        self.dirty = true;
    }

    /// Rows of pixels from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks(self.width)
    }

    /// Number of lit pixels
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|&&pixel| pixel).count()
    }

    /// Returns whether the frame changed since the last call, and resets the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y % self.height) * self.width + (x % self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_dark() {
        let frame = FrameBuffer::new(64, 32);
        assert_eq!(frame.lit(), 0);
        assert_eq!(frame.rows().count(), 32);
        assert!(frame.rows().all(|row| row.len() == 64));
    }

    #[test]
    fn test_set_and_get() {
        let mut frame = FrameBuffer::new(64, 32);
        frame.set(3, 4, true);
        assert!(frame.get(3, 4));
        assert!(!frame.get(4, 3));
        frame.set(3, 4, false);
        assert!(!frame.get(3, 4));
    }

    #[test]
    fn test_coordinates_wrap() {
        let mut frame = FrameBuffer::new(64, 32);
        frame.set(64, 32, true);
        assert!(frame.get(0, 0));
        frame.set(65 + 64, 33, true);
        assert!(frame.get(1, 1));
        assert_eq!(frame.lit(), 2);
    }

    #[test]
    fn test_clear() {
        let mut frame = FrameBuffer::new(8, 4);
        frame.set(1, 1, true);
        frame.set(7, 3, true);
        frame.clear();
        assert_eq!(frame.lit(), 0);
    }

    #[test]
    fn test_dirty_flag() {
        let mut frame = FrameBuffer::new(8, 4);
        assert!(!frame.take_dirty());
        frame.set(1, 1, true);
        assert!(frame.take_dirty());
        assert!(!frame.take_dirty());
        frame.clear();
        assert!(frame.take_dirty());
    }
}
