//! Keyboard-driven hands for running without a camera or landmark model.
//!
//! The display window translates key presses into [`SimPose`]s and sends them
//! over a channel; [`SimulatedHands`] turns the latest pose into landmark sets
//! laid out like real hands, so the counter, overlay and dispatcher all run
//! exactly as they would on camera input.

use super::landmarks::*;
use super::provider::LandmarkProvider;
use crate::video::Frame;
use anyhow::Result;
use std::sync::mpsc::{self, Receiver, Sender};

/// Fingers a single hand can raise.
const FINGERS_PER_HAND: u32 = 5;

/// What the operator asked the simulated hands to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    /// Raise this many fingers in total; above five a second hand appears.
    Fingers(u32),
    /// Take every hand out of view.
    NoHands,
}

pub struct SimulatedHands {
    rx: Receiver<SimPose>,
    pose: SimPose,
}

impl SimulatedHands {
    /// Create the provider and the sender the input side feeds it through.
    pub fn channel() -> (Sender<SimPose>, Self) {
        let (tx, rx) = mpsc::channel();
        (
            tx,
            Self {
                rx,
                pose: SimPose::NoHands,
            },
        )
    }
}

impl LandmarkProvider for SimulatedHands {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<HandLandmarkSet>> {
        while let Ok(pose) = self.rx.try_recv() {
            tracing::debug!("Simulated pose: {:?}", pose);
            self.pose = pose;
        }

        Ok(hands_for_pose(self.pose))
    }
}

/// Landmark sets whose raised-finger total equals the requested pose.
pub fn hands_for_pose(pose: SimPose) -> Vec<HandLandmarkSet> {
    match pose {
        SimPose::NoHands => Vec::new(),
        SimPose::Fingers(total) if total <= FINGERS_PER_HAND => {
            vec![synthetic_hand(0.5, total)]
        }
        SimPose::Fingers(total) => vec![
            synthetic_hand(0.3, FINGERS_PER_HAND),
            synthetic_hand(0.7, (total - FINGERS_PER_HAND).min(FINGERS_PER_HAND)),
        ],
    }
}

/// An upright hand centred at `cx` raising `raised` digits, picked in the
/// order index, middle, ring, pinky, thumb.
fn synthetic_hand(cx: f32, raised: u32) -> HandLandmarkSet {
    const CY: f32 = 0.62;
    let mut points = [Landmark::default(); LANDMARK_COUNT];

    points[WRIST] = Landmark::new(cx, CY + 0.18);

    // (mcp, pip, dip, tip, x offset, length)
    let fingers = [
        (INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP, -0.045, 1.0),
        (MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP, -0.015, 1.1),
        (RING_MCP, RING_PIP, RING_DIP, RING_TIP, 0.015, 1.0),
        (PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP, 0.045, 0.8),
    ];

    for (i, &(mcp, pip, dip, tip, dx, len)) in fingers.iter().enumerate() {
        let x = cx + dx;
        points[mcp] = Landmark::new(x, CY);
        if (i as u32) < raised {
            points[pip] = Landmark::new(x, CY - 0.07 * len);
            points[dip] = Landmark::new(x, CY - 0.12 * len);
            points[tip] = Landmark::new(x, CY - 0.16 * len);
        } else {
            points[pip] = Landmark::new(x, CY - 0.05 * len);
            points[dip] = Landmark::new(x + 0.005, CY - 0.02 * len);
            points[tip] = Landmark::new(x + 0.005, CY + 0.01);
        }
    }

    points[THUMB_CMC] = Landmark::new(cx - 0.05, CY + 0.13);
    points[THUMB_MCP] = Landmark::new(cx - 0.08, CY + 0.08);
    points[THUMB_IP] = Landmark::new(cx - 0.10, CY + 0.04);
    points[THUMB_TIP] = if raised >= FINGERS_PER_HAND {
        Landmark::new(cx - 0.13, CY + 0.01)
    } else {
        Landmark::new(cx - 0.07, CY + 0.03)
    };

    HandLandmarkSet::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::fingers::{count_raised_fingers, total_raised_fingers};

    #[test]
    fn test_every_total_counts_back_exactly() {
        for total in 0..=10 {
            let hands = hands_for_pose(SimPose::Fingers(total));
            assert_eq!(total_raised_fingers(&hands), total, "pose {}", total);
        }
    }

    #[test]
    fn test_hand_count_per_pose() {
        assert!(hands_for_pose(SimPose::NoHands).is_empty());
        assert_eq!(hands_for_pose(SimPose::Fingers(0)).len(), 1);
        assert_eq!(hands_for_pose(SimPose::Fingers(5)).len(), 1);
        assert_eq!(hands_for_pose(SimPose::Fingers(6)).len(), 2);

        let hands = hands_for_pose(SimPose::Fingers(7));
        assert_eq!(count_raised_fingers(&hands[0]), 5);
        assert_eq!(count_raised_fingers(&hands[1]), 2);
    }

    #[test]
    fn test_detect_follows_latest_pose() {
        let (tx, mut hands) = SimulatedHands::channel();
        let frame = Frame::new(4, 4);

        assert!(hands.detect(&frame).unwrap().is_empty());

        tx.send(SimPose::Fingers(2)).unwrap();
        tx.send(SimPose::Fingers(9)).unwrap();
        let detected = hands.detect(&frame).unwrap();
        assert_eq!(total_raised_fingers(&detected), 9);

        // Pose persists across frames until changed.
        let detected = hands.detect(&frame).unwrap();
        assert_eq!(total_raised_fingers(&detected), 9);

        tx.send(SimPose::NoHands).unwrap();
        drop(tx);
        assert!(hands.detect(&frame).unwrap().is_empty());
    }
}
