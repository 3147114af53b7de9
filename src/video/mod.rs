pub mod frame;
pub mod source;
pub mod test_pattern;
#[cfg(feature = "webcam")]
pub mod v4l_camera;

pub use frame::{Frame, rgb};
pub use source::FrameSource;
pub use test_pattern::TestPattern;
#[cfg(feature = "webcam")]
pub use v4l_camera::V4lCamera;
