use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Highest finger count that can have a song assigned.
pub const MAX_SONGS: u32 = 10;

/// Finger count to audio file lookup, built once at startup.
///
/// Paths are not checked for existence here; a file that disappears is
/// reported when it is first played.
#[derive(Debug, Default, Clone)]
pub struct SongMap {
    songs: BTreeMap<u32, PathBuf>,
}

impl SongMap {
    pub fn get(&self, fingers: u32) -> Option<&Path> {
        self.songs.get(&fingers).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_complete(&self) -> bool {
        self.songs.len() == MAX_SONGS as usize
    }

    pub fn counts(&self) -> impl Iterator<Item = u32> + '_ {
        self.songs.keys().copied()
    }
}

impl FromIterator<(u32, PathBuf)> for SongMap {
    fn from_iter<I: IntoIterator<Item = (u32, PathBuf)>>(iter: I) -> Self {
        Self {
            songs: iter.into_iter().collect(),
        }
    }
}

/// Recognised audio extensions, matched case-insensitively.
fn is_song_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "mp3" | "wav"))
        .unwrap_or(false)
}

/// Parse a base name such as `7`, `07` or `+7` into a finger count in `1..=10`.
fn song_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    let number: i64 = stem.parse().ok()?;
    (1..=MAX_SONGS as i64)
        .contains(&number)
        .then_some(number as u32)
}

/// Scan the immediate entries of `dir` for files named `1`..`10` with an
/// `.mp3` or `.wav` extension.
///
/// Anything else is skipped without comment. Entries are visited in name
/// order; when two files claim the same number the first one is kept.
pub fn load_song_map(dir: &Path) -> Result<SongMap> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read songs directory: {:?}", dir))?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                tracing::warn!("Cannot access entry in {}: {}", dir.display(), e);
                None
            }
        })
        .collect();
    entries.sort();

    let mut songs: BTreeMap<u32, PathBuf> = BTreeMap::new();
    for path in entries {
        if !is_song_extension(&path) {
            continue;
        }
        let Some(number) = song_number(&path) else {
            continue;
        };

        if let Some(existing) = songs.get(&number) {
            tracing::warn!(
                "Ignoring {} for {} fingers, already using {}",
                path.display(),
                number,
                existing.display()
            );
            continue;
        }

        tracing::debug!("song {} -> {}", number, path.display());
        songs.insert(number, path);
    }

    let map = SongMap { songs };
    tracing::debug!("Song counts: {:?}", map.counts().collect::<Vec<_>>());
    if !map.is_complete() {
        tracing::warn!(
            "Found {} of {} songs: you should have files named 1.mp3–10.mp3 in {}",
            map.len(),
            MAX_SONGS,
            dir.display()
        );
        let missing: Vec<u32> = (1..=MAX_SONGS).filter(|n| map.get(*n).is_none()).collect();
        tracing::warn!("No song for finger counts {:?}", missing);
    } else {
        tracing::info!("Loaded {} songs from {}", map.len(), dir.display());
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_only_numbered_audio_files_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["1.mp3", "2.wav", "notes.txt", "11.mp3", "abc.mp3"] {
            touch(dir.path(), name);
        }

        let map = load_song_map(dir.path()).unwrap();

        assert_eq!(map.counts().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(map.get(1), Some(dir.path().join("1.mp3").as_path()));
        assert_eq!(map.get(2), Some(dir.path().join("2.wav").as_path()));
        assert!(!map.is_complete());
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "3.MP3");
        touch(dir.path(), "4.Wav");
        touch(dir.path(), "5.ogg");

        let map = load_song_map(dir.path()).unwrap();
        assert_eq!(map.counts().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_out_of_range_names_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["0.mp3", "-1.mp3", "10.wav", "07.mp3", "+3.wav", "1.5.mp3", "mp3"] {
            touch(dir.path(), name);
        }

        let map = load_song_map(dir.path()).unwrap();
        assert_eq!(map.counts().collect::<Vec<_>>(), vec![3, 7, 10]);
    }

    #[test]
    fn test_complete_map() {
        let dir = tempfile::tempdir().unwrap();
        for n in 1..=10 {
            touch(dir.path(), &format!("{}.mp3", n));
        }

        let map = load_song_map(dir.path()).unwrap();
        assert!(map.is_complete());
        assert_eq!(map.get(10), Some(dir.path().join("10.mp3").as_path()));
    }

    #[test]
    fn test_duplicate_number_keeps_first_by_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "6.wav");
        touch(dir.path(), "6.mp3");

        let map = load_song_map(dir.path()).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(6), Some(dir.path().join("6.mp3").as_path()));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_song_map(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("Failed to read songs directory"));
    }
}
