use std::path::PathBuf;

/// What a firing dispatcher transition asks the loop to do
#[derive(Clone, Debug, PartialEq)]
pub enum Trigger {
    /// A song is assigned to this count
    Play { fingers: u32, path: PathBuf },
    /// Count is in range but no song file was found for it
    Unassigned { fingers: u32 },
    /// No fingers, or more than there are songs
    Silence { fingers: u32 },
}

/// Why the capture loop stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    QuitKey,
    WindowClosed,
    FrameReadFailed,
    Interrupted,
}
