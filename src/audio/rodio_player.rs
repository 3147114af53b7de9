use super::player::{AudioPlayer, PlaybackError};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Plays songs on the default output device.
///
/// The output stream is opened on first use and kept for the rest of the run,
/// so a machine without audio still gets through startup and only logs on play.
#[derive(Default)]
pub struct RodioPlayer {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
}

impl RodioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn output(&mut self) -> Result<&OutputStream, PlaybackError> {
        let stream = match self.stream.take() {
            Some(stream) => stream,
            None => {
                let mut stream = OutputStreamBuilder::open_default_stream()?;
                stream.log_on_drop(false);
                tracing::debug!("Opened default audio output");
                stream
            }
        };
        Ok(self.stream.insert(stream))
    }
}

impl AudioPlayer for RodioPlayer {
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError> {
        if !path.is_file() {
            return Err(PlaybackError::NotFound(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|source| PlaybackError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        self.stop();
        let sink = Sink::connect_new(self.output()?.mixer());
        sink.append(source);
        self.sink = Some(sink);

        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_reported_before_opening_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = RodioPlayer::new();

        let err = player.play(&dir.path().join("3.mp3")).unwrap_err();
        assert!(matches!(err, PlaybackError::NotFound(_)));
        assert!(player.stream.is_none());
    }

    #[test]
    fn test_undecodable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("4.wav");
        std::fs::write(&path, b"definitely not a wav file").unwrap();

        let mut player = RodioPlayer::new();
        let err = player.play(&path).unwrap_err();
        assert!(matches!(err, PlaybackError::Decode { .. }));
        assert!(player.stream.is_none());
    }

    #[test]
    fn test_stop_without_playback_is_harmless() {
        let mut player = RodioPlayer::new();
        player.stop();
        player.stop();
    }
}
