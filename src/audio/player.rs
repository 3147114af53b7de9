use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("audio output unavailable: {0}")]
    Output(#[from] rodio::StreamError),
}

/// Plays one clip at a time.
///
/// Starting a clip replaces whatever is playing; `play` returns as soon as
/// playback has started and never waits for the clip to end.
pub trait AudioPlayer {
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError>;

    fn stop(&mut self);
}
