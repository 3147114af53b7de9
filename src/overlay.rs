//! Annotations drawn into the captured frame before it is shown.

use crate::hand::HandLandmarkSet;
use crate::hand::landmarks::HAND_CONNECTIONS;
use crate::video::{Frame, rgb};

pub const BONE_COLOR: u32 = rgb(255, 255, 255);
pub const JOINT_COLOR: u32 = rgb(255, 0, 0);
/// Readout color while fingers are up.
pub const COUNT_ACTIVE_COLOR: u32 = rgb(0, 255, 0);
/// Readout color with no fingers up.
pub const COUNT_IDLE_COLOR: u32 = rgb(255, 0, 0);

const JOINT_RADIUS: i64 = 3;
const CLIP_MARGIN: i64 = 16;
const TEXT_X: usize = 10;
const TEXT_Y: usize = 16;
const TEXT_SCALE: usize = 5;

pub fn count_color(total_fingers: u32) -> u32 {
    if total_fingers > 0 {
        COUNT_ACTIVE_COLOR
    } else {
        COUNT_IDLE_COLOR
    }
}

/// Skeleton lines and joint dots for one hand.
///
/// Non-finite landmarks are skipped along with their bones. Finite points far
/// outside the frame are pulled in to `CLIP_MARGIN` pixels past its edges.
pub fn draw_hand(frame: &mut Frame, hand: &HandLandmarkSet) {
    let joints: Vec<Option<(i64, i64)>> = hand
        .points()
        .iter()
        .map(|p| to_pixel(frame, p.x, p.y))
        .collect();

    for &(a, b) in HAND_CONNECTIONS.iter() {
        if let (Some(a), Some(b)) = (joints[a], joints[b]) {
            draw_line(frame, a, b, BONE_COLOR);
        }
    }
    for (x, y) in joints.into_iter().flatten() {
        fill_disc(frame, x, y, JOINT_RADIUS, JOINT_COLOR);
    }
}

/// Normalized coordinates to pixels, clamped to the frame plus a margin.
fn to_pixel(frame: &Frame, x: f32, y: f32) -> Option<(i64, i64)> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    let clamp = |v: f32, extent: usize| {
        let px = (v * extent as f32).round() as i64;
        px.clamp(-CLIP_MARGIN, extent as i64 + CLIP_MARGIN)
    };
    Some((clamp(x, frame.width), clamp(y, frame.height)))
}

/// The `Fingers: N` readout in the top-left corner.
pub fn draw_finger_count(frame: &mut Frame, total_fingers: u32) {
    draw_label(
        frame,
        &format!("Fingers: {}", total_fingers),
        TEXT_X,
        TEXT_Y,
        TEXT_SCALE,
        count_color(total_fingers),
    );
}

/// Bresenham line, clipped per pixel.
fn draw_line(frame: &mut Frame, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: u32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y, mut err) = (x0, y0, dx + dy);

    loop {
        frame.set_pixel(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn fill_disc(frame: &mut Frame, cx: i64, cy: i64, r: i64, color: u32) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                frame.set_pixel(cx + dx, cy + dy, color);
            }
        }
    }
}

/// 3×5 bitmap font, each glyph pixel drawn as a `scale`×`scale` block.
fn draw_label(frame: &mut Frame, text: &str, x: usize, y: usize, scale: usize, color: u32) {
    let mut cx = x;
    for ch in text.chars() {
        let glyph = char_glyph(ch);
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..3usize {
                if bits & (1 << (2 - col)) == 0 {
                    continue;
                }
                for py in 0..scale {
                    for px in 0..scale {
                        frame.set_pixel(
                            (cx + col * scale + px) as i64,
                            (y + row * scale + py) as i64,
                            color,
                        );
                    }
                }
            }
        }
        cx += 4 * scale;
        if cx >= frame.width {
            break;
        }
    }
}

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::landmarks::{INDEX_MCP, LANDMARK_COUNT, THUMB_CMC, WRIST};
    use crate::hand::{Landmark, SimPose, simulated::hands_for_pose};
    use std::time::{Duration, Instant};

    #[test]
    fn test_count_color() {
        assert_eq!(count_color(0), COUNT_IDLE_COLOR);
        assert_eq!(count_color(1), COUNT_ACTIVE_COLOR);
        assert_eq!(count_color(10), COUNT_ACTIVE_COLOR);
    }

    #[test]
    fn test_finger_count_uses_count_color() {
        let mut frame = Frame::new(320, 80);
        draw_finger_count(&mut frame, 4);
        assert!(frame.pixels.contains(&COUNT_ACTIVE_COLOR));
        assert!(!frame.pixels.contains(&COUNT_IDLE_COLOR));

        let mut frame = Frame::new(320, 80);
        draw_finger_count(&mut frame, 0);
        assert!(frame.pixels.contains(&COUNT_IDLE_COLOR));
    }

    #[test]
    fn test_label_is_clipped_to_small_frames() {
        let mut frame = Frame::new(20, 10);
        draw_finger_count(&mut frame, 10);
    }

    #[test]
    fn test_draw_hand_marks_joints() {
        let mut frame = Frame::new(200, 100);
        for hand in hands_for_pose(SimPose::Fingers(3)) {
            draw_hand(&mut frame, &hand);
        }
        assert!(frame.pixels.contains(&BONE_COLOR));
        assert!(frame.pixels.contains(&JOINT_COLOR));
    }

    #[test]
    fn test_line_endpoints_are_drawn() {
        let mut frame = Frame::new(10, 10);
        draw_line(&mut frame, (1, 8), (7, 2), 5);
        assert_eq!(frame.pixel(1, 8), 5);
        assert_eq!(frame.pixel(7, 2), 5);
    }

    #[test]
    fn test_offscreen_hand_does_not_panic() {
        let mut frame = Frame::new(50, 50);
        let hand = HandLandmarkSet::new([Landmark::new(-0.5, 1.7); LANDMARK_COUNT]);
        draw_hand(&mut frame, &hand);
        assert!(frame.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_non_finite_landmarks_are_skipped() {
        let mut frame = Frame::new(64, 48);
        let mut points = *hands_for_pose(SimPose::Fingers(5))[0].points();
        points[WRIST] = Landmark::new(f32::NEG_INFINITY, 0.5);
        points[THUMB_CMC] = Landmark::new(f32::INFINITY, 0.5);
        points[INDEX_MCP] = Landmark::new(0.5, f32::NAN);

        draw_hand(&mut frame, &HandLandmarkSet::new(points));
        assert!(frame.pixels.contains(&JOINT_COLOR));
    }

    #[test]
    fn test_far_landmarks_are_clamped() {
        assert_eq!(
            to_pixel(&Frame::new(64, 48), 2e6, -2e6),
            Some((64 + CLIP_MARGIN, -CLIP_MARGIN))
        );
        assert_eq!(to_pixel(&Frame::new(64, 48), f32::INFINITY, 0.5), None);

        let mut frame = Frame::new(64, 48);
        let mut points = *hands_for_pose(SimPose::Fingers(3))[0].points();
        points[WRIST] = Landmark::new(2e6, 0.5);
        let started = Instant::now();
        draw_hand(&mut frame, &HandLandmarkSet::new(points));
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(frame.pixels.contains(&BONE_COLOR));
    }
}
