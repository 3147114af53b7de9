use super::frame::{Frame, rgb};
use super::source::FrameSource;
use anyhow::{Context, Result};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::{CaptureStream, Stream};
use v4l::video::Capture;
use v4l::{Device, FourCC};

const YUYV: &[u8; 4] = b"YUYV";
const BUFFER_COUNT: u32 = 4;

/// Webcam capture through Video4Linux2, negotiated to YUYV.
pub struct V4lCamera {
    stream: Option<MmapStream<'static>>,
    width: usize,
    height: usize,
    stride: usize,
}

impl V4lCamera {
    /// Open `/dev/video{index}` and start streaming at (or near) the requested size.
    pub fn open(index: usize, width: usize, height: usize) -> Result<Self> {
        let device =
            Device::new(index).with_context(|| format!("Cannot open webcam /dev/video{}", index))?;

        let mut format = device.format().context("Failed to query webcam format")?;
        format.width = width as u32;
        format.height = height as u32;
        format.fourcc = FourCC::new(YUYV);
        let format = device
            .set_format(&format)
            .context("Failed to set webcam format")?;

        if format.fourcc != FourCC::new(YUYV) {
            return Err(anyhow::anyhow!(
                "Webcam does not support YUYV capture (offered {})",
                format.fourcc
            ));
        }

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT)
            .context("Failed to start webcam stream")?;

        tracing::info!(
            "Opened /dev/video{} at {}x{}",
            index,
            format.width,
            format.height
        );

        Ok(Self {
            stream: Some(stream),
            width: format.width as usize,
            height: format.height as usize,
            stride: format.stride as usize,
        })
    }
}

impl FrameSource for V4lCamera {
    fn read(&mut self) -> Result<Frame> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Webcam already released"))?;

        let (buf, meta) = stream.next().context("Failed to dequeue webcam buffer")?;
        let used = (meta.bytesused as usize).min(buf.len());
        yuyv_to_frame(&buf[..used], self.width, self.height, self.stride)
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.stop() {
                tracing::warn!("Failed to stop webcam stream: {}", e);
            }
        }
    }
}

/// Convert packed YUYV 4:2:2 (two pixels per four bytes) to `0RGB`.
fn yuyv_to_frame(data: &[u8], width: usize, height: usize, stride: usize) -> Result<Frame> {
    let stride = stride.max(width * 2);
    if data.len() < stride * height.saturating_sub(1) + width * 2 {
        return Err(anyhow::anyhow!(
            "Short webcam frame: {} bytes for {}x{}",
            data.len(),
            width,
            height
        ));
    }

    let mut frame = Frame::new(width, height);
    for y in 0..height {
        let row = &data[y * stride..y * stride + width * 2];
        for (pair, chunk) in row.chunks_exact(4).enumerate() {
            let (y0, u, y1, v) = (chunk[0], chunk[1], chunk[2], chunk[3]);
            frame.pixels[y * width + pair * 2] = yuv_to_rgb(y0, u, v);
            frame.pixels[y * width + pair * 2 + 1] = yuv_to_rgb(y1, u, v);
        }
    }
    Ok(frame)
}

/// BT.601 limited-range conversion.
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> u32 {
    let c = y as i32 - 16;
    let d = u as i32 - 128;
    let e = v as i32 - 128;

    let clamp = |x: i32| ((x + 128) >> 8).clamp(0, 255) as u8;
    rgb(
        clamp(298 * c + 409 * e),
        clamp(298 * c - 100 * d - 208 * e),
        clamp(298 * c + 516 * d),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_grey_levels() {
        // Black then white, neutral chroma.
        let data = [16, 128, 235, 128];
        let frame = yuyv_to_frame(&data, 2, 1, 4).unwrap();
        assert_eq!(frame.rgb_at(0, 0), [0, 0, 0]);
        assert_eq!(frame.rgb_at(1, 0), [255, 255, 255]);
    }

    #[test]
    fn test_yuyv_short_buffer_is_rejected() {
        assert!(yuyv_to_frame(&[0; 6], 2, 2, 4).is_err());
    }
}
