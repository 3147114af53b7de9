pub mod fingers;
pub mod landmarks;
#[cfg(feature = "webcam")]
pub mod onnx;
pub mod provider;
pub mod simulated;

pub use fingers::total_raised_fingers;
pub use landmarks::{HandLandmarkSet, Landmark};
#[cfg(feature = "webcam")]
pub use onnx::OnnxLandmarks;
pub use provider::LandmarkProvider;
pub use simulated::{SimPose, SimulatedHands};
