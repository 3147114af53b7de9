pub mod player;
pub mod rodio_player;

pub use player::{AudioPlayer, PlaybackError};
pub use rodio_player::RodioPlayer;
