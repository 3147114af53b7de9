use crate::audio::AudioPlayer;
use crate::dispatch::{DispatchState, Dispatcher};
use crate::display::{Display, DisplayEvent};
use crate::hand::{LandmarkProvider, total_raised_fingers};
use crate::messages::{LoopExit, Trigger};
use crate::overlay;
use crate::video::FrameSource;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// The capture → detect → count → dispatch → render loop.
pub struct App {
    source: Box<dyn FrameSource>,
    detector: Box<dyn LandmarkProvider>,
    display: Box<dyn Display>,
    player: Box<dyn AudioPlayer>,
    dispatcher: Dispatcher,
    state: DispatchState,
    interrupted: Arc<AtomicBool>,
}

impl App {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn LandmarkProvider>,
        display: Box<dyn Display>,
        player: Box<dyn AudioPlayer>,
        dispatcher: Dispatcher,
        interrupted: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            detector,
            display,
            player,
            dispatcher,
            state: DispatchState::new(),
            interrupted,
        }
    }

    /// Run until the operator quits, a frame cannot be read or Ctrl+C arrives.
    /// Devices are released on every exit path.
    pub fn run(mut self) -> LoopExit {
        tracing::info!("Ready! Show your fingers to the camera, press q to quit");

        let exit = loop {
            if let Some(exit) = self.step(Instant::now) {
                break exit;
            }
        };

        tracing::info!("Loop ended: {:?}", exit);
        self.shutdown();
        exit
    }

    /// Process one frame. `Some` ends the loop.
    ///
    /// `now` is read once the count is known, after capture and detection.
    fn step(&mut self, now: impl FnOnce() -> Instant) -> Option<LoopExit> {
        if self.interrupted.load(Ordering::SeqCst) {
            return Some(LoopExit::Interrupted);
        }

        let mut frame = match self.source.read() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Failed to read frame: {:#}", e);
                return Some(LoopExit::FrameReadFailed);
            }
        };
        frame.mirror_horizontal();

        let hands = self.detector.detect(&frame).unwrap_or_else(|e| {
            tracing::warn!("Hand detection failed: {:#}", e);
            Vec::new()
        });

        let total_fingers = total_raised_fingers(&hands);
        for hand in &hands {
            overlay::draw_hand(&mut frame, hand);
        }
        overlay::draw_finger_count(&mut frame, total_fingers);

        if let Some(trigger) = self
            .dispatcher
            .dispatch(&mut self.state, total_fingers, now())
        {
            self.handle_trigger(trigger);
        }

        match self.display.show(&frame) {
            Ok(DisplayEvent::Continue) => None,
            Ok(DisplayEvent::Quit) => Some(LoopExit::QuitKey),
            Ok(DisplayEvent::Closed) => Some(LoopExit::WindowClosed),
            Err(e) => {
                tracing::warn!("Display failed: {:#}", e);
                Some(LoopExit::WindowClosed)
            }
        }
    }

    fn handle_trigger(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::Play { fingers, path } => {
                tracing::info!("Playing song for {} fingers: {}", fingers, path.display());
                if let Err(e) = self.player.play(&path) {
                    tracing::warn!("Error playing audio: {}", e);
                }
            }
            Trigger::Unassigned { fingers } => {
                tracing::warn!("No file for {} fingers", fingers);
            }
            Trigger::Silence { fingers } => {
                tracing::info!(
                    "No fingers raised or invalid count ({}). No song played.",
                    fingers
                );
            }
        }
    }

    fn shutdown(&mut self) {
        self.source.release();
        self.display.close();
        self.player.stop();
        tracing::debug!("Capture released, window closed, playback stopped");
    }
}
