use super::landmarks::{HandLandmarkSet, LANDMARK_COUNT, Landmark};
use super::provider::LandmarkProvider;
use crate::video::Frame;
use anyhow::{Context, Result};
use std::path::Path;
use tract_onnx::prelude::*;

/// Side length of the square RGB input the landmark model expects.
const INPUT_SIZE: usize = 224;

type Plan = TypedSimplePlan<TypedModel>;

/// A rectangle of the frame evaluated on its own, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Region {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

/// Hand landmarks from a MediaPipe-style ONNX model run with `tract`.
///
/// The model takes a `[1, 224, 224, 3]` RGB tensor scaled to `0..1` and
/// returns 21 `(x, y, z)` landmarks in input pixels plus a hand-presence
/// score. It finds at most one hand per evaluated region, so with two hands
/// allowed the frame is split into a left and a right half.
pub struct OnnxLandmarks {
    model: Plan,
    max_hands: usize,
    min_confidence: f32,
}

impl OnnxLandmarks {
    pub fn load(path: &Path, max_hands: usize, min_confidence: f32) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .with_context(|| format!("Failed to load landmark model {:?}", path))?
            .with_input_fact(0, f32::fact([1, INPUT_SIZE, INPUT_SIZE, 3]).into())?
            .into_optimized()?
            .into_runnable()
            .context("Failed to prepare landmark model")?;

        tracing::info!("Loaded landmark model from {:?}", path);
        Ok(Self {
            model,
            max_hands,
            min_confidence,
        })
    }

    fn detect_in(&self, frame: &Frame, region: Region) -> Result<Option<HandLandmarkSet>> {
        let input: Tensor = tract_ndarray::Array4::from_shape_fn(
            (1, INPUT_SIZE, INPUT_SIZE, 3),
            |(_, y, x, c)| {
                let sx = region.x + x * region.width / INPUT_SIZE;
                let sy = region.y + y * region.height / INPUT_SIZE;
                frame.rgb_at(sx, sy)[c] as f32 / 255.0
            },
        )
        .into();

        let outputs = self.model.run(tvec!(input.into()))?;
        let coords = outputs[0].to_array_view::<f32>()?;
        let presence = outputs
            .get(1)
            .context("Landmark model has no presence output")?
            .to_array_view::<f32>()?
            .iter()
            .copied()
            .next()
            .unwrap_or(0.0);

        if presence < self.min_confidence {
            return Ok(None);
        }

        let coords: Vec<f32> = coords.iter().copied().collect();
        if coords.len() < LANDMARK_COUNT * 3 {
            return Err(anyhow::anyhow!(
                "Landmark model returned {} values, expected {}",
                coords.len(),
                LANDMARK_COUNT * 3
            ));
        }

        let mut points = [Landmark::default(); LANDMARK_COUNT];
        for (i, point) in points.iter_mut().enumerate() {
            let (mx, my) = (coords[i * 3], coords[i * 3 + 1]);
            *point = to_frame_coords(mx, my, region, frame);
        }
        Ok(Some(HandLandmarkSet::new(points)))
    }
}

impl LandmarkProvider for OnnxLandmarks {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<HandLandmarkSet>> {
        let mut hands = Vec::new();
        for region in regions(frame, self.max_hands) {
            if let Some(hand) = self.detect_in(frame, region)? {
                hands.push(hand);
            }
        }
        Ok(hands)
    }
}

fn regions(frame: &Frame, max_hands: usize) -> Vec<Region> {
    let full = Region {
        x: 0,
        y: 0,
        width: frame.width,
        height: frame.height,
    };
    if max_hands < 2 {
        return vec![full];
    }

    let half = frame.width / 2;
    vec![
        Region { width: half, ..full },
        Region {
            x: half,
            width: frame.width - half,
            ..full
        },
    ]
}

/// Map model-input pixels of `region` to normalized whole-frame coordinates.
fn to_frame_coords(mx: f32, my: f32, region: Region, frame: &Frame) -> Landmark {
    let px = region.x as f32 + mx / INPUT_SIZE as f32 * region.width as f32;
    let py = region.y as f32 + my / INPUT_SIZE as f32 * region.height as f32;
    Landmark::new(px / frame.width as f32, py / frame.height as f32)
}
