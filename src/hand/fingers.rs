use super::landmarks::*;

/// Tip and PIP joint of the four long fingers.
const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Count the raised fingers of one hand, `0..=5`.
///
/// The thumb counts when its tip lies left of the IP joint, which holds for
/// a thumb stretched sideways in a mirrored front-camera image. This is
/// sensitive to hand chirality: the other hand's thumb reads inverted.
/// A long finger counts when its tip is above its PIP joint.
pub fn count_raised_fingers(hand: &HandLandmarkSet) -> u32 {
    let thumb = hand.point(THUMB_TIP).x < hand.point(THUMB_IP).x;

    let fingers = FINGER_JOINTS
        .iter()
        .filter(|&&(tip, pip)| hand.point(tip).y < hand.point(pip).y)
        .count() as u32;

    thumb as u32 + fingers
}

/// Sum of raised fingers across every hand in the frame.
pub fn total_raised_fingers(hands: &[HandLandmarkSet]) -> u32 {
    hands.iter().map(count_raised_fingers).sum()
}
