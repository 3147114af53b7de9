use super::frame::{Frame, rgb};
use super::source::FrameSource;
use anyhow::Result;

/// Camera stand-in for simulation mode: a dark vertical gradient with a
/// slowly drifting scan line, so a frozen window is easy to spot.
pub struct TestPattern {
    width: usize,
    height: usize,
    tick: usize,
}

impl TestPattern {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tick: 0,
        }
    }
}

impl FrameSource for TestPattern {
    fn read(&mut self) -> Result<Frame> {
        let mut frame = Frame::new(self.width, self.height);

        for y in 0..self.height {
            let shade = (16 + 40 * y / self.height.max(1)) as u8;
            let color = rgb(shade / 2, shade / 2, shade);
            frame.pixels[y * self.width..(y + 1) * self.width].fill(color);
        }

        if self.height > 0 {
            let scan = (self.tick * 2) % self.height;
            frame.pixels[scan * self.width..(scan + 1) * self.width].fill(rgb(40, 40, 72));
        }

        self.tick = self.tick.wrapping_add(1);
        Ok(frame)
    }
}
