/// Number of landmarks reported per detected hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Bones drawn for the hand skeleton overlay.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC),
    (THUMB_CMC, THUMB_MCP),
    (THUMB_MCP, THUMB_IP),
    (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP),
    (INDEX_MCP, INDEX_PIP),
    (INDEX_PIP, INDEX_DIP),
    (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP),
    (MIDDLE_MCP, MIDDLE_PIP),
    (MIDDLE_PIP, MIDDLE_DIP),
    (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP),
    (RING_MCP, RING_PIP),
    (RING_PIP, RING_DIP),
    (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP),
    (WRIST, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP),
    (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
];

/// A single landmark in normalized image coordinates.
///
/// `x` grows to the right and `y` grows downward; both are nominally in
/// `0.0..=1.0` but providers may report points slightly outside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The 21 landmarks of one detected hand, indexed by the constants above.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarkSet {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn point(&self, index: usize) -> Landmark {
        self.points[index]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }
}
