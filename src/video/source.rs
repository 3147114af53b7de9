use super::frame::Frame;
use anyhow::Result;

/// A capture device delivering frames one at a time.
///
/// `read` blocks until the next frame is available. An error ends the
/// capture loop; sources never retry on their own.
pub trait FrameSource {
    fn read(&mut self) -> Result<Frame>;

    /// Give the device back to the system. Called once when the loop ends.
    fn release(&mut self) {}
}
