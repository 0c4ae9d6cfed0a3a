use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use thiserror::Error;

const SOUND_EXTENSION: &str = ".mp3";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SoundError {
    #[error("invalid sound name")]
    InvalidName,
    #[error("sound `{0}` not found")]
    NotFound(String),
}

/// Normalize user input into a library file name (`Test.MP3 ` -> `test.mp3`).
///
/// Names that could escape the library directory are rejected.
pub fn normalize_sound_name(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let stem = lowered.strip_suffix(SOUND_EXTENSION).unwrap_or(&lowered).trim();

    if stem.is_empty() || stem.contains(['/', '\\']) || stem == ".." {
        return None;
    }

    Some(format!("{stem}{SOUND_EXTENSION}"))
}

/// Directory of playable `.mp3` clips.
#[derive(Clone, Debug)]
pub struct SoundLibrary {
    dir: PathBuf,
}

impl SoundLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn resolve(&self, raw: &str) -> Result<PathBuf, SoundError> {
        let file_name = normalize_sound_name(raw).ok_or(SoundError::InvalidName)?;
        let path = self.dir.join(&file_name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(SoundError::NotFound(file_name))
        }
    }

    /// Sorted file names of every clip in the library.
    pub fn list(&self) -> anyhow::Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("sounds folder `{}` not readable", self.dir.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if name.to_lowercase().ends_with(SOUND_EXTENSION) && entry.path().is_file() {
                names.push(name);
            }
        }

        names.sort_unstable();
        Ok(names)
    }
}
