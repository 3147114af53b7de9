use super::landmarks::HandLandmarkSet;
use crate::video::Frame;
use anyhow::Result;

/// Anything that can find hands in a frame.
///
/// Returns one landmark set per detected hand (possibly none). Implementations
/// apply their own confidence threshold; callers take every returned hand as real.
pub trait LandmarkProvider {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandLandmarkSet>>;
}
