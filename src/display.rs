use crate::hand::SimPose;
use crate::video::Frame;
use anyhow::Result;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::sync::mpsc::Sender;

/// Operator input gathered while showing a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayEvent {
    Continue,
    Quit,
    Closed,
}

/// A window that shows annotated frames and reports the operator's keys.
pub trait Display {
    fn show(&mut self, frame: &Frame) -> Result<DisplayEvent>;

    fn close(&mut self);
}

/// Software framebuffer window.
///
/// `q` quits. In simulation mode the number row and a few other keys drive
/// the simulated hands through `sim_tx`.
pub struct MinifbDisplay {
    window: Option<Window>,
    sim_tx: Option<Sender<SimPose>>,
}

impl MinifbDisplay {
    pub fn open(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| anyhow::anyhow!("Failed to open window: {}", e))?;
        window.set_target_fps(60);

        Ok(Self {
            window: Some(window),
            sim_tx: None,
        })
    }

    pub fn with_simulation(mut self, sim_tx: Sender<SimPose>) -> Self {
        tracing::info!(
            "Simulation mode: 1-9 raise fingers, 0 = ten, Space = fist, Backspace = no hands, Q = quit"
        );
        self.sim_tx = Some(sim_tx);
        self
    }
}

impl Display for MinifbDisplay {
    fn show(&mut self, frame: &Frame) -> Result<DisplayEvent> {
        let Some(window) = self.window.as_mut() else {
            return Ok(DisplayEvent::Closed);
        };
        if !window.is_open() {
            return Ok(DisplayEvent::Closed);
        }

        window
            .update_with_buffer(&frame.pixels, frame.width, frame.height)
            .map_err(|e| anyhow::anyhow!("Failed to update window: {}", e))?;

        if window.is_key_pressed(Key::Q, KeyRepeat::No) {
            return Ok(DisplayEvent::Quit);
        }

        if self.sim_tx.is_some() {
            let keys = window.get_keys_pressed(KeyRepeat::No);
            forward_sim_keys(&mut self.sim_tx, keys);
        }

        Ok(DisplayEvent::Continue)
    }

    fn close(&mut self) {
        self.window = None;
    }
}

/// Send the poses for `keys` to the simulated hands, dropping the sender
/// once they are gone.
fn forward_sim_keys(sim_tx: &mut Option<Sender<SimPose>>, keys: Vec<Key>) {
    let Some(tx) = sim_tx else {
        return;
    };
    let disconnected = keys
        .into_iter()
        .filter_map(sim_pose_for_key)
        .any(|pose| tx.send(pose).is_err());
    if disconnected {
        tracing::debug!("Simulated hands are gone, ignoring simulation keys");
        *sim_tx = None;
    }
}

fn sim_pose_for_key(key: Key) -> Option<SimPose> {
    let pose = match key {
        Key::Key1 => SimPose::Fingers(1),
        Key::Key2 => SimPose::Fingers(2),
        Key::Key3 => SimPose::Fingers(3),
        Key::Key4 => SimPose::Fingers(4),
        Key::Key5 => SimPose::Fingers(5),
        Key::Key6 => SimPose::Fingers(6),
        Key::Key7 => SimPose::Fingers(7),
        Key::Key8 => SimPose::Fingers(8),
        Key::Key9 => SimPose::Fingers(9),
        Key::Key0 => SimPose::Fingers(10),
        Key::Space => SimPose::Fingers(0),
        Key::Backspace => SimPose::NoHands,
        _ => return None,
    };
    Some(pose)
}
