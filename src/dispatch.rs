use crate::messages::Trigger;
use crate::songs::{MAX_SONGS, SongMap};
use std::time::{Duration, Instant};

/// Debounce memory carried from one frame to the next.
///
/// `None` fields mean "nothing reported yet": the first count always differs,
/// and a state that never played is always outside the debounce window.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DispatchState {
    pub last_total_fingers: Option<u32>,
    pub last_play: Option<Instant>,
}

impl DispatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `total_fingers` at `now`; true when the change should be acted on.
    ///
    /// Fires only when the count differs from the last acted-on count and
    /// strictly more than `window` has passed since the last firing. A
    /// suppressed change leaves the state untouched, so it fires later if
    /// the new count is still held once the window has passed.
    pub fn observe(&mut self, total_fingers: u32, now: Instant, window: Duration) -> bool {
        if self.last_total_fingers == Some(total_fingers) {
            return false;
        }

        let elapsed_ok = match self.last_play {
            Some(last) => now.saturating_duration_since(last) > window,
            None => true,
        };
        if !elapsed_ok {
            return false;
        }

        self.last_play = Some(now);
        self.last_total_fingers = Some(total_fingers);
        true
    }
}

/// Map an acted-on finger count to what should happen.
pub fn resolve(total_fingers: u32, songs: &SongMap) -> Trigger {
    if !(1..=MAX_SONGS).contains(&total_fingers) {
        return Trigger::Silence {
            fingers: total_fingers,
        };
    }

    match songs.get(total_fingers) {
        Some(path) => Trigger::Play {
            fingers: total_fingers,
            path: path.to_path_buf(),
        },
        None => Trigger::Unassigned {
            fingers: total_fingers,
        },
    }
}

/// Debounced finger-count to song dispatcher.
pub struct Dispatcher {
    songs: SongMap,
    window: Duration,
}

impl Dispatcher {
    pub fn new(songs: SongMap, window: Duration) -> Self {
        Self { songs, window }
    }

    /// Evaluate one frame. `None` means nothing to do this frame.
    pub fn dispatch(
        &self,
        state: &mut DispatchState,
        total_fingers: u32,
        now: Instant,
    ) -> Option<Trigger> {
        state
            .observe(total_fingers, now, self.window)
            .then(|| resolve(total_fingers, &self.songs))
    }
}
