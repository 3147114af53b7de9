use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_songs_dir")]
    pub songs_dir: String,

    #[serde(default = "default_camera_index")]
    pub camera_index: usize,

    #[serde(default = "default_frame_width")]
    pub frame_width: usize,

    #[serde(default = "default_frame_height")]
    pub frame_height: usize,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_max_hands")]
    pub max_hands: usize,

    #[serde(default = "default_min_detection_confidence")]
    pub min_detection_confidence: f32,

    #[serde(default = "default_landmark_model")]
    pub landmark_model: String,

    #[serde(default = "default_window_title")]
    pub window_title: String,
}

fn default_songs_dir() -> String {
    "audio/numbered".to_string()
}

fn default_camera_index() -> usize {
    1
}

fn default_frame_width() -> usize {
    640
}

fn default_frame_height() -> usize {
    480
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_max_hands() -> usize {
    2
}

fn default_min_detection_confidence() -> f32 {
    0.8
}

fn default_landmark_model() -> String {
    "models/hand_landmark.onnx".to_string()
}

fn default_window_title() -> String {
    "Gesture Jukebox".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            songs_dir: default_songs_dir(),
            camera_index: default_camera_index(),
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            debounce_ms: default_debounce_ms(),
            max_hands: default_max_hands(),
            min_detection_confidence: default_min_detection_confidence(),
            landmark_model: default_landmark_model(),
            window_title: default_window_title(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/gesture-jukebox/config.json)
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing the defaults there first if it does not exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("gesture-jukebox").join("config.json"))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.songs_dir.is_empty() {
            return Err(anyhow::anyhow!("songs_dir cannot be empty"));
        }

        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(anyhow::anyhow!(
                "frame_width and frame_height must be greater than zero"
            ));
        }

        if !(1..=2).contains(&self.max_hands) {
            return Err(anyhow::anyhow!("max_hands must be 1 or 2"));
        }

        if !(0.0..=1.0).contains(&self.min_detection_confidence) {
            return Err(anyhow::anyhow!(
                "min_detection_confidence must be between 0.0 and 1.0"
            ));
        }

        if self.landmark_model.is_empty() {
            return Err(anyhow::anyhow!("landmark_model cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce(), Duration::from_secs(1));
        assert_eq!(config.camera_index, 1);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "songs_dir": "/srv/songs", "debounce_ms": 250 }"#).unwrap();

        assert_eq!(config.songs_dir, "/srv/songs");
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.max_hands, 2);
        assert_eq!(config.frame_width, 640);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            max_hands: 3,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            min_detection_confidence: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            songs_dir: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            frame_height: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.songs_dir, "audio/numbered");

        std::fs::write(&path, r#"{ "camera_index": 0 }"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.camera_index, 0);
        assert_eq!(config.window_title, "Gesture Jukebox");
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
