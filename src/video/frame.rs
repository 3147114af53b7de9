/// One captured image, stored as packed `0RGB` pixels in row-major order.
///
/// This is the layout the display window consumes directly, so overlays are
/// drawn in place and the buffer is handed to the window without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Set a pixel, ignoring coordinates outside the frame.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: u32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// `[r, g, b]` of the pixel at `(x, y)`.
    pub fn rgb_at(&self, x: usize, y: usize) -> [u8; 3] {
        let p = self.pixel(x, y);
        [(p >> 16) as u8, (p >> 8) as u8, p as u8]
    }

    /// Flip left and right so the image behaves like a mirror.
    pub fn mirror_horizontal(&mut self) {
        if self.width == 0 {
            return;
        }
        for row in self.pixels.chunks_exact_mut(self.width) {
            row.reverse();
        }
    }
}
