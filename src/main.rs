mod app;
mod audio;
mod config;
mod dispatch;
mod display;
mod hand;
mod messages;
mod overlay;
mod songs;
mod video;

use app::App;
use audio::RodioPlayer;
use config::Config;
use dispatch::Dispatcher;
use display::MinifbDisplay;
use hand::{LandmarkProvider, SimPose};
use video::FrameSource;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::sync::atomic::{AtomicBool, Ordering};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting gesture jukebox");

    // Load configuration
    let config = Config::load()?;
    config.validate()?;

    let interrupted = Arc::new(AtomicBool::new(false));
    tokio::spawn(watch_ctrl_c(interrupted.clone()));

    // The capture loop is blocking and the window has to stay on this thread.
    tokio::task::block_in_place(|| run_app(config, interrupted))
}

async fn watch_ctrl_c(interrupted: Arc<AtomicBool>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C, shutting down");
            interrupted.store(true, Ordering::SeqCst);
        }
        Err(e) => tracing::warn!("Cannot listen for Ctrl+C: {}", e),
    }
}

fn run_app(config: Config, interrupted: Arc<AtomicBool>) -> Result<()> {
    let songs = songs::load_song_map(Path::new(&config.songs_dir))?;
    let dispatcher = Dispatcher::new(songs, config.debounce());

    let (source, detector, sim_tx) = open_devices(&config)?;

    let mut display = MinifbDisplay::open(
        &config.window_title,
        config.frame_width,
        config.frame_height,
    )?;
    if let Some(sim_tx) = sim_tx {
        display = display.with_simulation(sim_tx);
    }

    let app = App::new(
        source,
        detector,
        Box::new(display),
        Box::new(RodioPlayer::new()),
        dispatcher,
        interrupted,
    );
    let exit = app.run();

    tracing::info!("Gesture jukebox shutdown complete ({:?})", exit);
    Ok(())
}

/// Frame source, landmark provider, and the key channel for simulated hands.
type Devices = (
    Box<dyn FrameSource>,
    Box<dyn LandmarkProvider>,
    Option<Sender<SimPose>>,
);

#[cfg(feature = "webcam")]
fn open_devices(config: &Config) -> Result<Devices> {
    use anyhow::Context;

    let camera = video::V4lCamera::open(
        config.camera_index,
        config.frame_width,
        config.frame_height,
    )
    .context("Error: Cannot open webcam")?;
    let landmarks = hand::OnnxLandmarks::load(
        Path::new(&config.landmark_model),
        config.max_hands,
        config.min_detection_confidence,
    )?;

    Ok((Box::new(camera), Box::new(landmarks), None))
}

#[cfg(not(feature = "webcam"))]
fn open_devices(config: &Config) -> Result<Devices> {
    tracing::info!("Built without the `webcam` feature, running in simulation mode");

    let source = video::TestPattern::new(config.frame_width, config.frame_height);
    let (sim_tx, hands) = hand::SimulatedHands::channel();

    Ok((Box::new(source), Box::new(hands), Some(sim_tx)))
}
